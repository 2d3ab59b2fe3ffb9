use serde_json::{Value, json};
use tracing::info;

use super::handler::ApiContext;
use super::helpers;
use super::parsing::ApiRequest;
use crate::errors::ExamError;
use crate::utils::mime::content_type_for_key;

/// `PUT|POST /upload?key=<key>`: stores the raw body under `key`,
/// overwriting any existing object.
pub async fn upload_file(ctx: &ApiContext, request: &ApiRequest) -> Value {
    helpers::respond("upload_file", upload(ctx, request).await)
}

async fn upload(ctx: &ApiContext, request: &ApiRequest) -> Result<Value, ExamError> {
    ctx.authenticate(request)?;

    let key = request
        .query_param("key")
        .ok_or_else(|| ExamError::BadRequest("Missing key query parameter".to_string()))?;
    let body = request.body_bytes()?;

    ctx.blobs
        .put_object(key, body, content_type_for_key(key))
        .await?;

    info!(key = %key, "File uploaded");
    Ok(json!({ "message": "File uploaded successfully" }))
}

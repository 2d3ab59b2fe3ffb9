//! API Lambda handler - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - Request normalization (REST v1 and HTTP v2 payloads)
//! - CORS preflight
//! - Exam CRUD routes (delegated to `exams` module)
//! - File uploads (delegated to `upload` module)

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};

use super::auth::{Claims, TokenVerifier};
use super::parsing::ApiRequest;
use super::{exams, helpers, upload};
use crate::core::config::AppConfig;
use crate::core::secrets;
use crate::errors::ExamError;
use crate::infrastructure::aws::{DynamoExamStore, S3BlobStore};
use crate::store::{BlobStore, ExamStore};

/// Dependencies of the API handlers, built once per cold start.
#[derive(Clone)]
pub struct ApiContext {
    pub verifier: TokenVerifier,
    pub exams: Arc<dyn ExamStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl ApiContext {
    #[must_use]
    pub fn new(verifier: TokenVerifier, exams: Arc<dyn ExamStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            verifier,
            exams,
            blobs,
        }
    }

    /// Wires the AWS-backed stores and resolves the signing secret.
    ///
    /// # Errors
    ///
    /// Returns an error if no signing secret can be resolved.
    pub async fn from_config(config: &AppConfig) -> Result<Self, ExamError> {
        let secret = secrets::resolve_jwt_secret(config).await?;
        let shared = aws_config::from_env().load().await;

        Ok(Self::new(
            TokenVerifier::new(&secret),
            Arc::new(DynamoExamStore::from_shared(&shared, &config.exams_table)),
            Arc::new(S3BlobStore::from_shared(&shared, &config.uploads_bucket)),
        ))
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` if the request carries no valid token.
    pub fn authenticate(&self, request: &ApiRequest) -> Result<Claims, ExamError> {
        self.verifier
            .authenticate_header(request.header("Authorization"))
    }
}

/// Where a request goes, decided from method and path alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Preflight,
    ListExams,
    CreateExam,
    GetExam(String),
    UpdateExam(String),
    DeleteExam(String),
    Upload,
    MissingId,
    NotFound,
}

#[must_use]
pub fn route(request: &ApiRequest) -> Route {
    let method = request.method.as_str();
    if method == "OPTIONS" {
        return Route::Preflight;
    }

    let segments = request.segments();
    let path_id = request
        .path_parameters
        .get("id")
        .filter(|id| !id.is_empty())
        .cloned();

    if let Some(pos) = segments.iter().position(|s| s == "exams") {
        let tail = &segments[pos + 1..];
        let id = match tail {
            [] => path_id,
            [id] => path_id.or_else(|| Some(id.clone())),
            _ => return Route::NotFound,
        };

        return match (method, id) {
            ("GET", None) => Route::ListExams,
            ("POST", None) => Route::CreateExam,
            ("GET", Some(id)) => Route::GetExam(id),
            ("PUT", Some(id)) => Route::UpdateExam(id),
            ("DELETE", Some(id)) => Route::DeleteExam(id),
            ("PUT" | "DELETE", None) => Route::MissingId,
            _ => Route::NotFound,
        };
    }

    if segments.last().is_some_and(|s| s == "upload") && matches!(method, "PUT" | "POST") {
        return Route::Upload;
    }

    Route::NotFound
}

/// Routes one API Gateway payload to its handler and returns the envelope.
pub async fn handle_request(ctx: &ApiContext, payload: &Value) -> Value {
    let request = match ApiRequest::from_event(payload) {
        Ok(r) => r,
        Err(e) => {
            error!("Malformed API request: {}", e);
            return helpers::err_response(&e);
        }
    };

    let route = route(&request);
    info!(method = %request.method, path = %request.path, route = ?route, "Routing request");

    match route {
        Route::Preflight => helpers::create_response(200, &json!({})),
        Route::ListExams => exams::list_exams(ctx, &request).await,
        Route::CreateExam => exams::create_exam(ctx, &request).await,
        Route::GetExam(id) => exams::get_exam(ctx, &request, &id).await,
        Route::UpdateExam(id) => exams::update_exam(ctx, &request, &id).await,
        Route::DeleteExam(id) => exams::delete_exam(ctx, &request, &id).await,
        Route::Upload => upload::upload_file(ctx, &request).await,
        Route::MissingId => helpers::err_response(&ExamError::BadRequest(
            "Missing exam id in path".to_string(),
        )),
        Route::NotFound => helpers::err_response(&ExamError::NotFound(format!(
            "No route for {} {}",
            request.method, request.path
        ))),
    }
}

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails for request-level problems; those become error envelopes.
#[tracing::instrument(level = "info", skip(ctx, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(ctx: &ApiContext, event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(handle_request(ctx, &event.payload).await)
}

pub use self::function_handler as handler;

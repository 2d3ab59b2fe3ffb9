//! Authenticated CRUD handlers for exams.
//!
//! Each handler authenticates, parses the body when it has one, performs
//! exactly one store call and turns the outcome into an envelope. No store
//! call is made once authentication or parsing has failed.

use serde_json::{Value, json};
use tracing::info;

use super::handler::ApiContext;
use super::helpers;
use super::parsing::ApiRequest;
use crate::core::models::{Exam, ExamFields};
use crate::errors::ExamError;

/// `POST /exams`
pub async fn create_exam(ctx: &ApiContext, request: &ApiRequest) -> Value {
    helpers::respond("create_exam", create(ctx, request).await)
}

/// `GET /exams`
pub async fn list_exams(ctx: &ApiContext, request: &ApiRequest) -> Value {
    helpers::respond("list_exams", list(ctx, request).await)
}

/// `GET /exams/{id}`
pub async fn get_exam(ctx: &ApiContext, request: &ApiRequest, id: &str) -> Value {
    helpers::respond("get_exam", get(ctx, request, id).await)
}

/// `PUT /exams/{id}`
pub async fn update_exam(ctx: &ApiContext, request: &ApiRequest, id: &str) -> Value {
    helpers::respond("update_exam", update(ctx, request, id).await)
}

/// `DELETE /exams/{id}`
pub async fn delete_exam(ctx: &ApiContext, request: &ApiRequest, id: &str) -> Value {
    helpers::respond("delete_exam", delete(ctx, request, id).await)
}

async fn create(ctx: &ApiContext, request: &ApiRequest) -> Result<Exam, ExamError> {
    ctx.authenticate(request)?;
    let fields: ExamFields = request.json_body()?;

    let exam = Exam::new(fields);
    ctx.exams.put(&exam).await?;

    info!(id = %exam.id, "Exam created");
    Ok(exam)
}

async fn list(ctx: &ApiContext, request: &ApiRequest) -> Result<Vec<Exam>, ExamError> {
    ctx.authenticate(request)?;
    let exams = ctx.exams.scan().await?;
    info!(count = exams.len(), "Exams retrieved");
    Ok(exams)
}

async fn get(ctx: &ApiContext, request: &ApiRequest, id: &str) -> Result<Exam, ExamError> {
    ctx.authenticate(request)?;
    match ctx.exams.get(id).await? {
        Some(exam) => Ok(exam),
        None => {
            info!(id = %id, "Exam not found");
            Err(ExamError::NotFound(format!("Exam {id} not found")))
        }
    }
}

async fn update(
    ctx: &ApiContext,
    request: &ApiRequest,
    id: &str,
) -> Result<ExamFields, ExamError> {
    ctx.authenticate(request)?;
    let fields: ExamFields = request.json_body()?;

    let updated = ctx.exams.replace(id, &fields).await?;
    info!(id = %id, "Exam updated");
    Ok(updated)
}

async fn delete(ctx: &ApiContext, request: &ApiRequest, id: &str) -> Result<Value, ExamError> {
    ctx.authenticate(request)?;
    ctx.exams.delete(id).await?;
    info!(id = %id, "Exam deleted");
    Ok(json!({ "message": "Exam deleted" }))
}

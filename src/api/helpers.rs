//! Response envelope builders shared by every handler.
//!
//! Every response, success or failure, goes through [`create_response`] so the
//! CORS headers and body encoding never differ between routes.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::errors::ExamError;

/// The fixed permissive CORS header pair attached to every response.
#[must_use]
pub fn cors_headers() -> Value {
    json!({
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Credentials": "true"
    })
}

/// Wraps a status code and payload into `{ statusCode, headers, body }`,
/// with the payload serialized to JSON text.
#[must_use]
pub fn create_response<T: Serialize + ?Sized>(status_code: u16, body: &T) -> Value {
    match serde_json::to_string(body) {
        Ok(body) => json!({
            "statusCode": status_code,
            "headers": cors_headers(),
            "body": body
        }),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            json!({
                "statusCode": 500,
                "headers": cors_headers(),
                "body": json!({
                    "error": "serialization_error",
                    "details": e.to_string()
                })
                .to_string()
            })
        }
    }
}

/// Returns a response whose body is `{ "message": message }`.
#[must_use]
pub fn message_response(status_code: u16, message: &str) -> Value {
    create_response(status_code, &json!({ "message": message }))
}

/// Returns an error response carrying the machine-readable code and detail.
#[must_use]
pub fn err_response(err: &ExamError) -> Value {
    create_response(
        err.status_code(),
        &json!({ "error": err.code(), "details": err.detail() }),
    )
}

/// Converts a handler outcome into an envelope: 200 with the value, or the
/// error's own status.
#[must_use]
pub fn respond<T: Serialize>(operation: &str, result: Result<T, ExamError>) -> Value {
    match result {
        Ok(body) => create_response(200, &body),
        Err(e) => {
            error!(operation = %operation, code = e.code(), "Request failed: {}", e);
            err_response(&e)
        }
    }
}

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExamError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to access storage: {0}")]
    StoreFailure(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExamError {
    /// HTTP status code this error maps to at the handler boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ExamError::Unauthorized(_) => 401,
            ExamError::BadRequest(_) => 400,
            ExamError::NotFound(_) => 404,
            ExamError::StoreFailure(_) | ExamError::UnknownTask(_) | ExamError::Config(_) => 500,
        }
    }

    /// Machine-readable category placed in the `error` field of responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ExamError::Unauthorized(_) => "unauthorized",
            ExamError::BadRequest(_) => "bad_request",
            ExamError::NotFound(_) => "not_found",
            ExamError::StoreFailure(_) => "store_failure",
            ExamError::UnknownTask(_) => "unknown_task",
            ExamError::Config(_) => "config_error",
        }
    }

    /// Human-readable detail without the category prefix.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            ExamError::Unauthorized(m)
            | ExamError::BadRequest(m)
            | ExamError::NotFound(m)
            | ExamError::StoreFailure(m)
            | ExamError::UnknownTask(m)
            | ExamError::Config(m) => m,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ExamError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        ExamError::Unauthorized(error.to_string())
    }
}

// Every aws-sdk-* crate re-exports the same smithy SdkError, so this covers
// DynamoDB, S3, SQS and SSM alike.
impl<E, R> From<SdkError<E, R>> for ExamError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        ExamError::StoreFailure(DisplayErrorContext(error).to_string())
    }
}

//! Exams - serverless CRUD over a single `Exam` record type.
//!
//! This crate implements a two-Lambda architecture:
//! 1. An API Lambda that verifies bearer tokens and serves exam CRUD plus file uploads
//! 2. An Events Lambda that logs table changes, dispatches queued tasks and runs
//!    scheduled maintenance
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - DynamoDB for exam records and its stream for change logging
//! - S3 for uploaded files
//! - SQS for queued tasks
//! - jsonwebtoken for HS256 bearer tokens
//! - Tokio for async runtime
//!
//! Handlers never touch AWS clients directly; they receive the storage ports
//! from [`store`] through a context built once per cold start.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use exams::api::{ApiContext, auth::TokenVerifier};
//! use exams::store::{MemoryBlobStore, MemoryExamStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     exams::setup_logging();
//!
//!     let verifier = TokenVerifier::new("dummy_secret");
//!     let token = verifier.issue(&serde_json::Map::new())?;
//!     let ctx = ApiContext::new(
//!         verifier,
//!         Arc::new(MemoryExamStore::new()),
//!         Arc::new(MemoryBlobStore::new()),
//!     );
//!
//!     let response = exams::api::handle_request(
//!         &ctx,
//!         &json!({
//!             "httpMethod": "POST",
//!             "path": "/exams",
//!             "headers": { "Authorization": format!("Bearer {token}") },
//!             "body": json!({ "examSubject": "Math" }).to_string()
//!         }),
//!     )
//!     .await;
//!     println!("{response}");
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod events;
pub mod infrastructure;
pub mod store;
pub mod utils;

pub use errors::ExamError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`).
/// Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// exams::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

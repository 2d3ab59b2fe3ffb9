//! API Lambda handler and request processing

pub mod auth;
pub mod exams;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod upload;

// Re-export the main handler for convenience
pub use handler::{ApiContext, handle_request, handler};

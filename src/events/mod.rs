//! Events Lambda: change-stream logging, queued tasks and scheduled jobs

pub mod handler;
pub mod jobs;
pub mod queue;
pub mod stream;

// Re-export the main handler for convenience
pub use handler::{EventsContext, handle_event, handler};

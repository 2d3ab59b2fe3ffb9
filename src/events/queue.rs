//! SQS task dispatcher.
//!
//! Each message body is a [`TaskEnvelope`]. The `task` name is looked up in a
//! [`TaskRegistry`]; new task types are added by registering another
//! [`TaskAction`], never by touching the dispatch loop.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::api::parsing::v_str;
use crate::core::models::TaskEnvelope;
use crate::errors::ExamError;

pub const PROCESS_DATA: &str = "processData";
pub const SEND_NOTIFICATION: &str = "sendNotification";

/// One named unit of work triggered by a queued message.
#[async_trait]
pub trait TaskAction: Send + Sync {
    async fn run(&self, payload: &Map<String, Value>) -> anyhow::Result<()>;
}

/// Logs the `data` field of a `processData` task.
#[derive(Debug, Default)]
pub struct ProcessData;

#[async_trait]
impl TaskAction for ProcessData {
    async fn run(&self, payload: &Map<String, Value>) -> anyhow::Result<()> {
        info!(data = ?payload.get("data"), "Processing data");
        Ok(())
    }
}

/// Logs the `notificationDetails` field of a `sendNotification` task.
#[derive(Debug, Default)]
pub struct SendNotification;

#[async_trait]
impl TaskAction for SendNotification {
    async fn run(&self, payload: &Map<String, Value>) -> anyhow::Result<()> {
        info!(
            notification_details = ?payload.get("notificationDetails"),
            "Sending notification"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: usize,
    /// Malformed bodies and unknown task names.
    pub skipped: usize,
    /// Actions that ran and returned an error.
    pub failed: usize,
}

#[derive(Clone, Default)]
pub struct TaskRegistry {
    actions: HashMap<String, Arc<dyn TaskAction>>,
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("TaskRegistry").field("actions", &names).finish()
    }
}

impl TaskRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `processData` and `sendNotification` actions.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PROCESS_DATA, ProcessData);
        registry.register(SEND_NOTIFICATION, SendNotification);
        registry
    }

    /// Adds or replaces the action for `task`.
    pub fn register(&mut self, task: impl Into<String>, action: impl TaskAction + 'static) {
        self.actions.insert(task.into(), Arc::new(action));
    }

    #[must_use]
    pub fn contains(&self, task: &str) -> bool {
        self.actions.contains_key(task)
    }

    /// Runs the action registered for `envelope.task`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTask` when nothing is registered under that name, or
    /// the action's own error.
    pub async fn dispatch(&self, envelope: &TaskEnvelope) -> anyhow::Result<()> {
        let Some(action) = self.actions.get(&envelope.task) else {
            return Err(ExamError::UnknownTask(envelope.task.clone()).into());
        };
        action.run(&envelope.payload).await
    }

    /// Dispatches every message of an SQS batch in order. One bad message
    /// never stops the rest.
    pub async fn dispatch_batch(&self, payload: &Value) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        let records = payload
            .get("Records")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for record in records {
            let message_id = v_str(record, &["messageId"]).unwrap_or("unknown");

            let envelope = match parse_envelope(record) {
                Ok(envelope) => envelope,
                Err(e) => {
                    summary.skipped += 1;
                    warn!(message_id = %message_id, "Skipping malformed message: {}", e);
                    continue;
                }
            };

            info!(message_id = %message_id, task = %envelope.task, "Dispatching task");
            match self.dispatch(&envelope).await {
                Ok(()) => summary.dispatched += 1,
                Err(e) => match e.downcast_ref::<ExamError>() {
                    Some(ExamError::UnknownTask(task)) => {
                        summary.skipped += 1;
                        warn!(message_id = %message_id, task = %task, "Unknown task");
                    }
                    _ => {
                        summary.failed += 1;
                        error!(message_id = %message_id, task = %envelope.task, "Task failed: {:#}", e);
                    }
                },
            }
        }

        summary
    }
}

fn parse_envelope(record: &Value) -> Result<TaskEnvelope, ExamError> {
    let body = v_str(record, &["body"])
        .ok_or_else(|| ExamError::BadRequest("message has no body".to_string()))?;
    serde_json::from_str(body)
        .map_err(|e| ExamError::BadRequest(format!("invalid task envelope: {e}")))
}

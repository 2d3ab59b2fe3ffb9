use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};

use super::jobs::JobRunner;
use super::queue::TaskRegistry;
use super::stream;
use crate::api::helpers;
use crate::api::parsing::v_str;
use crate::core::config::AppConfig;
use crate::errors::ExamError;
use crate::infrastructure::aws::{DynamoExamStore, SqsTaskQueue};
use crate::store::{ExamStore, TaskQueue};

/// Dependencies of the event-driven handlers, built once per cold start.
#[derive(Clone)]
pub struct EventsContext {
    pub registry: TaskRegistry,
    pub exams: Arc<dyn ExamStore>,
    pub queue: Option<Arc<dyn TaskQueue>>,
    pub retention_days: Option<u32>,
}

impl EventsContext {
    pub async fn from_config(config: &AppConfig) -> Self {
        let shared = aws_config::from_env().load().await;
        let queue = config
            .notification_queue_url
            .as_ref()
            .map(|url| Arc::new(SqsTaskQueue::from_shared(&shared, url)) as Arc<dyn TaskQueue>);

        Self {
            registry: TaskRegistry::with_defaults(),
            exams: Arc::new(DynamoExamStore::from_shared(&shared, &config.exams_table)),
            queue,
            retention_days: config.cleanup_retention_days,
        }
    }

    #[must_use]
    pub fn job_runner(&self, today: NaiveDate) -> JobRunner {
        JobRunner::standard(
            Arc::clone(&self.exams),
            self.queue.clone(),
            self.retention_days,
            today,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StreamBatch,
    QueueBatch,
    Schedule,
    EmptyBatch,
    Unknown,
}

#[must_use]
pub fn classify(payload: &Value) -> EventKind {
    if let Some(records) = payload.get("Records").and_then(Value::as_array) {
        let Some(first) = records.first() else {
            return EventKind::EmptyBatch;
        };
        let source = v_str(first, &["eventSource"]).unwrap_or("");
        return match source {
            "aws:dynamodb" => EventKind::StreamBatch,
            "aws:sqs" => EventKind::QueueBatch,
            _ => EventKind::Unknown,
        };
    }

    if v_str(payload, &["source"]) == Some("aws.events")
        || v_str(payload, &["detail-type"]) == Some("Scheduled Event")
    {
        return EventKind::Schedule;
    }

    EventKind::Unknown
}

/// Runs the scheduled job sequence for `today` and builds the result envelope.
pub async fn run_scheduled(ctx: &EventsContext, today: NaiveDate) -> Value {
    match ctx.job_runner(today).run_all().await {
        Ok(count) => {
            info!(jobs = count, "Cron job executed successfully");
            helpers::message_response(200, "Cron job executed successfully")
        }
        Err(failure) => {
            error!("Error executing cron job: {}", failure);
            helpers::create_response(
                500,
                &json!({
                    "message": "Error executing cron job",
                    "error": failure.to_string()
                }),
            )
        }
    }
}

/// Routes one non-HTTP trigger to its ingester or the job runner.
pub async fn handle_event(ctx: &EventsContext, payload: &Value) -> Value {
    let kind = classify(payload);
    info!(kind = ?kind, "Events Lambda received event");

    match kind {
        EventKind::StreamBatch => {
            let summary = stream::log_stream_batch(payload);
            info!(processed = summary.processed, failed = summary.failed, "Stream batch logged");
            helpers::message_response(200, "Database trigger executed")
        }
        EventKind::QueueBatch => {
            let summary = ctx.registry.dispatch_batch(payload).await;
            info!(
                dispatched = summary.dispatched,
                skipped = summary.skipped,
                failed = summary.failed,
                "Message batch handled"
            );
            helpers::message_response(200, "Message handled")
        }
        EventKind::Schedule => run_scheduled(ctx, Utc::now().date_naive()).await,
        EventKind::EmptyBatch => helpers::message_response(200, "Nothing to process"),
        EventKind::Unknown => {
            error!("Unrecognized event payload: {}", payload);
            helpers::err_response(&ExamError::BadRequest(
                "Unrecognized event source".to_string(),
            ))
        }
    }
}

/// Lambda handler for the events entrypoint.
///
/// # Errors
///
/// Never fails; every outcome is reported through the returned envelope.
#[tracing::instrument(level = "info", skip(ctx, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(ctx: &EventsContext, event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(handle_event(ctx, &event.payload).await)
}

pub use self::function_handler as handler;

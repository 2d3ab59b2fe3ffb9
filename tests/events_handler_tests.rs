use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use exams::core::models::{Exam, ExamFields};
use exams::errors::ExamError;
use exams::events::handler::{EventKind, EventsContext, classify, handle_event, run_scheduled};
use exams::events::queue::TaskRegistry;
use exams::store::{ExamStore, MemoryExamStore};
use serde_json::{Value, json};

/// A store whose every call fails, standing in for an unreachable table.
struct BrokenStore;

#[async_trait]
impl ExamStore for BrokenStore {
    async fn put(&self, _exam: &Exam) -> Result<(), ExamError> {
        Err(ExamError::StoreFailure("unreachable".to_string()))
    }
    async fn scan(&self) -> Result<Vec<Exam>, ExamError> {
        Err(ExamError::StoreFailure("unreachable".to_string()))
    }
    async fn get(&self, _id: &str) -> Result<Option<Exam>, ExamError> {
        Err(ExamError::StoreFailure("unreachable".to_string()))
    }
    async fn replace(&self, _id: &str, _fields: &ExamFields) -> Result<ExamFields, ExamError> {
        Err(ExamError::StoreFailure("unreachable".to_string()))
    }
    async fn delete(&self, _id: &str) -> Result<(), ExamError> {
        Err(ExamError::StoreFailure("unreachable".to_string()))
    }
}

fn context(exams: Arc<dyn ExamStore>) -> EventsContext {
    EventsContext {
        registry: TaskRegistry::with_defaults(),
        exams,
        queue: None,
        retention_days: Some(30),
    }
}

fn body(response: &Value) -> Value {
    serde_json::from_str(response["body"].as_str().unwrap()).unwrap()
}

#[test]
fn test_classify_event_sources() {
    assert_eq!(
        classify(&json!({"Records": [{"eventSource": "aws:dynamodb"}]})),
        EventKind::StreamBatch
    );
    assert_eq!(
        classify(&json!({"Records": [{"eventSource": "aws:sqs"}]})),
        EventKind::QueueBatch
    );
    assert_eq!(
        classify(&json!({"source": "aws.events", "detail-type": "Scheduled Event"})),
        EventKind::Schedule
    );
    assert_eq!(classify(&json!({"Records": []})), EventKind::EmptyBatch);
    assert_eq!(classify(&json!({"hello": "world"})), EventKind::Unknown);
}

#[tokio::test]
async fn test_stream_and_queue_batches_return_200() {
    let ctx = context(Arc::new(MemoryExamStore::new()));

    let stream = handle_event(
        &ctx,
        &json!({"Records": [{"eventSource": "aws:dynamodb", "eventName": "BOGUS"}]}),
    )
    .await;
    assert_eq!(stream["statusCode"], 200);
    assert_eq!(body(&stream)["message"], "Database trigger executed");

    let queue = handle_event(
        &ctx,
        &json!({"Records": [{"eventSource": "aws:sqs", "body": "oops"}]}),
    )
    .await;
    assert_eq!(queue["statusCode"], 200);
    assert_eq!(body(&queue)["message"], "Message handled");
}

#[tokio::test]
async fn test_scheduled_run_reports_success() {
    let ctx = context(Arc::new(MemoryExamStore::new()));
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let response = run_scheduled(&ctx, today).await;
    assert_eq!(response["statusCode"], 200);
    assert_eq!(body(&response)["message"], "Cron job executed successfully");
}

#[tokio::test]
async fn test_scheduled_run_reports_failure_as_500() {
    let ctx = context(Arc::new(BrokenStore));
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let response = run_scheduled(&ctx, today).await;
    assert_eq!(response["statusCode"], 500);
    let body = body(&response);
    assert_eq!(body["message"], "Error executing cron job");
    assert!(body["error"].as_str().unwrap().starts_with("cleanupOldData failed"));
}

#[tokio::test]
async fn test_unknown_event_is_rejected() {
    let ctx = context(Arc::new(MemoryExamStore::new()));
    let response = handle_event(&ctx, &json!({"detail": {}})).await;
    assert_eq!(response["statusCode"], 400);
}

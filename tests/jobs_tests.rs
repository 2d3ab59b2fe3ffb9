use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use exams::core::models::{Exam, ExamFields};
use exams::errors::ExamError;
use exams::events::jobs::{JobRunner, MaintenanceJob};
use exams::store::{ExamStore, MemoryExamStore, MemoryTaskQueue, TaskQueue};
use serde_json::json;
use tokio::sync::Mutex;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn exam(id: &str, date: &str) -> Exam {
    Exam {
        id: id.to_string(),
        fields: ExamFields {
            exam_subject: Some(json!("Math")),
            exam_date: Some(json!(date)),
            ..ExamFields::default()
        },
    }
}

struct Step {
    name: &'static str,
    fail: bool,
    log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl MaintenanceJob for Step {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self) -> Result<(), ExamError> {
        self.log.lock().await.push(self.name);
        if self.fail {
            Err(ExamError::StoreFailure("scan timed out".to_string()))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn test_runner_stops_at_first_failure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let step = |name, fail| Step {
        name,
        fail,
        log: Arc::clone(&log),
    };
    let runner = JobRunner::new()
        .with_job(step("first", false))
        .with_job(step("second", true))
        .with_job(step("third", false));

    let failure = runner.run_all().await.unwrap_err();
    assert_eq!(failure.job, "second");
    assert_eq!(failure.completed, 1);
    assert_eq!(*log.lock().await, vec!["first", "second"]);
}

#[tokio::test]
async fn test_runner_reports_completed_jobs() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = JobRunner::new().with_job(Step {
        name: "only",
        fail: false,
        log: Arc::clone(&log),
    });
    assert_eq!(runner.run_all().await.unwrap(), 1);
}

#[tokio::test]
async fn test_standard_sequence_order() {
    let store = Arc::new(MemoryExamStore::new());
    let runner = JobRunner::standard(store, None, None, day(2024, 6, 1));
    assert_eq!(
        runner.job_names(),
        vec!["cleanupOldData", "sendScheduledNotifications"]
    );
}

#[tokio::test]
async fn test_cleanup_removes_only_expired_exams() {
    let store = Arc::new(MemoryExamStore::new());
    store.put(&exam("old", "2024-01-01")).await.unwrap();
    store.put(&exam("recent", "2024-05-25")).await.unwrap();
    store.put(&exam("undated", "sometime")).await.unwrap();

    let runner = JobRunner::standard(store.clone(), None, Some(30), day(2024, 6, 1));
    runner.run_all().await.unwrap();

    let ids: Vec<String> = store.scan().await.unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["recent", "undated"]);
}

#[tokio::test]
async fn test_cleanup_without_retention_keeps_everything() {
    let store = Arc::new(MemoryExamStore::new());
    store.put(&exam("old", "2000-01-01")).await.unwrap();

    JobRunner::standard(store.clone(), None, None, day(2024, 6, 1))
        .run_all()
        .await
        .unwrap();
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_notifications_queued_for_tomorrows_exams() {
    let store = Arc::new(MemoryExamStore::new());
    store.put(&exam("tomorrow", "2024-06-02")).await.unwrap();
    store.put(&exam("later", "2024-06-09")).await.unwrap();
    let queue = Arc::new(MemoryTaskQueue::new());

    JobRunner::standard(store, Some(queue.clone() as Arc<dyn TaskQueue>), None, day(2024, 6, 1))
        .run_all()
        .await
        .unwrap();

    let sent = queue.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].task, "sendNotification");
    assert_eq!(sent[0].payload["notificationDetails"]["id"], "tomorrow");
}

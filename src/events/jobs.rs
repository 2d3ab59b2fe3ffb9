//! Scheduled maintenance.
//!
//! Jobs run strictly in order and the first failure abandons the rest,
//! unlike the batch ingesters which skip bad records and keep going.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tracing::{error, info};

use super::queue::SEND_NOTIFICATION;
use crate::core::models::TaskEnvelope;
use crate::errors::ExamError;
use crate::store::{ExamStore, TaskQueue};

#[async_trait]
pub trait MaintenanceJob: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self) -> Result<(), ExamError>;
}

/// The job that stopped a run, and why.
#[derive(Debug)]
pub struct JobFailure {
    pub job: &'static str,
    pub completed: usize,
    pub error: ExamError,
}

impl std::fmt::Display for JobFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.job, self.error)
    }
}

#[derive(Default)]
pub struct JobRunner {
    jobs: Vec<Box<dyn MaintenanceJob>>,
}

impl JobRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_job(mut self, job: impl MaintenanceJob + 'static) -> Self {
        self.jobs.push(Box::new(job));
        self
    }

    /// The fixed nightly sequence: cleanup, then notifications.
    #[must_use]
    pub fn standard(
        store: Arc<dyn ExamStore>,
        queue: Option<Arc<dyn TaskQueue>>,
        retention_days: Option<u32>,
        today: NaiveDate,
    ) -> Self {
        Self::new()
            .with_job(CleanupOldData {
                store: Arc::clone(&store),
                retention_days,
                today,
            })
            .with_job(SendScheduledNotifications {
                store,
                queue,
                today,
            })
    }

    #[must_use]
    pub fn job_names(&self) -> Vec<&'static str> {
        self.jobs.iter().map(|j| j.name()).collect()
    }

    /// Runs every job in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing job and returns it; later jobs do not run.
    pub async fn run_all(&self) -> Result<usize, JobFailure> {
        for (completed, job) in self.jobs.iter().enumerate() {
            info!(job = job.name(), "Running maintenance job");
            if let Err(e) = job.run().await {
                error!(job = job.name(), "Maintenance job failed: {}", e);
                return Err(JobFailure {
                    job: job.name(),
                    completed,
                    error: e,
                });
            }
        }
        Ok(self.jobs.len())
    }
}

/// Deletes exams dated before `today - retention_days`. Without a retention
/// period it only logs. Exams without a parseable date are kept.
pub struct CleanupOldData {
    pub store: Arc<dyn ExamStore>,
    pub retention_days: Option<u32>,
    pub today: NaiveDate,
}

#[async_trait]
impl MaintenanceJob for CleanupOldData {
    fn name(&self) -> &'static str {
        "cleanupOldData"
    }

    async fn run(&self) -> Result<(), ExamError> {
        let Some(days) = self.retention_days else {
            info!("Cleaning up old data: no retention configured, nothing removed");
            return Ok(());
        };
        let cutoff = self
            .today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| ExamError::Config(format!("retention of {days} days is out of range")))?;

        let mut removed = 0usize;
        for exam in self.store.scan().await? {
            if exam.fields.exam_day().is_some_and(|day| day < cutoff) {
                self.store.delete(&exam.id).await?;
                removed += 1;
            }
        }

        info!(%cutoff, removed, "Cleaned up old exams");
        Ok(())
    }
}

/// Queues a `sendNotification` task for every exam taking place tomorrow.
/// Without a queue it only logs what would be sent.
pub struct SendScheduledNotifications {
    pub store: Arc<dyn ExamStore>,
    pub queue: Option<Arc<dyn TaskQueue>>,
    pub today: NaiveDate,
}

#[async_trait]
impl MaintenanceJob for SendScheduledNotifications {
    fn name(&self) -> &'static str {
        "sendScheduledNotifications"
    }

    async fn run(&self) -> Result<(), ExamError> {
        let Some(tomorrow) = self.today.succ_opt() else {
            return Ok(());
        };

        let upcoming: Vec<_> = self
            .store
            .scan()
            .await?
            .into_iter()
            .filter(|exam| exam.fields.exam_day() == Some(tomorrow))
            .collect();

        let Some(queue) = &self.queue else {
            info!(count = upcoming.len(), "Sending scheduled notifications: no queue configured");
            return Ok(());
        };

        for exam in &upcoming {
            let details = serde_json::to_value(exam)
                .map_err(|e| ExamError::StoreFailure(format!("exam serialize: {e}")))?;
            let task = TaskEnvelope::new(SEND_NOTIFICATION)
                .with("notificationDetails", details);
            queue.enqueue(&task).await?;
        }

        info!(count = upcoming.len(), %tomorrow, "Queued scheduled notifications");
        Ok(())
    }
}

//! Storage ports used by the handlers.
//!
//! Handlers only ever see these traits. The Lambda binaries bind them to the
//! AWS clients in [`crate::infrastructure::aws`]; tests bind them to the
//! in-memory versions in [`memory`].

use async_trait::async_trait;

use crate::core::models::{Exam, ExamFields, TaskEnvelope};
use crate::errors::ExamError;

pub mod memory;

pub use memory::{MemoryBlobStore, MemoryExamStore, MemoryTaskQueue};

/// Durable collection of exams keyed by `id`. Each call is one single-item
/// (or scan) operation against the backing store.
#[async_trait]
pub trait ExamStore: Send + Sync {
    async fn put(&self, exam: &Exam) -> Result<(), ExamError>;

    async fn scan(&self) -> Result<Vec<Exam>, ExamError>;

    async fn get(&self, id: &str) -> Result<Option<Exam>, ExamError>;

    /// Replaces every mutable field of `id`. Absent fields are removed.
    /// Returns the attributes that now hold a value.
    async fn replace(&self, id: &str, fields: &ExamFields) -> Result<ExamFields, ExamError>;

    /// Removes `id`. Succeeds whether or not the item existed.
    async fn delete(&self, id: &str) -> Result<(), ExamError>;
}

/// Object storage keyed by caller-supplied names.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), ExamError>;
}

/// Outbound side of the task queue.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, task: &TaskEnvelope) -> Result<(), ExamError>;
}

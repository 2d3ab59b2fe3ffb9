//! In-process implementations of the storage ports.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BlobStore, ExamStore, TaskQueue};
use crate::core::models::{Exam, ExamFields, TaskEnvelope};
use crate::errors::ExamError;

/// Exams held in a map ordered by id.
#[derive(Debug, Default)]
pub struct MemoryExamStore {
    items: RwLock<BTreeMap<String, ExamFields>>,
}

impl MemoryExamStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ExamStore for MemoryExamStore {
    async fn put(&self, exam: &Exam) -> Result<(), ExamError> {
        self.items
            .write()
            .await
            .insert(exam.id.clone(), exam.fields.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Exam>, ExamError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .map(|(id, fields)| Exam {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Exam>, ExamError> {
        Ok(self.items.read().await.get(id).map(|fields| Exam {
            id: id.to_string(),
            fields: fields.clone(),
        }))
    }

    async fn replace(&self, id: &str, fields: &ExamFields) -> Result<ExamFields, ExamError> {
        self.items
            .write()
            .await
            .insert(id.to_string(), fields.clone());
        Ok(fields.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ExamError> {
        self.items.write().await.remove(id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), ExamError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredBlob {
                body,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }
}

/// Records enqueued tasks in arrival order.
#[derive(Debug, Default)]
pub struct MemoryTaskQueue {
    sent: RwLock<Vec<TaskEnvelope>>,
}

impl MemoryTaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<TaskEnvelope> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl TaskQueue for MemoryTaskQueue {
    async fn enqueue(&self, task: &TaskEnvelope) -> Result<(), ExamError> {
        self.sent.write().await.push(task.clone());
        Ok(())
    }
}

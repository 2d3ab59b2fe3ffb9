use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;

use crate::core::models::TaskEnvelope;
use crate::errors::ExamError;
use crate::store::TaskQueue;

#[derive(Debug, Clone)]
pub struct SqsTaskQueue {
    client: SqsClient,
    queue_url: String,
}

impl SqsTaskQueue {
    #[must_use]
    pub fn new(client: SqsClient, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    #[must_use]
    pub fn from_shared(shared: &aws_config::SdkConfig, queue_url: impl Into<String>) -> Self {
        Self::new(SqsClient::new(shared), queue_url)
    }
}

#[async_trait]
impl TaskQueue for SqsTaskQueue {
    /// # Errors
    ///
    /// Returns an error if serialization fails or the message cannot be sent to SQS.
    async fn enqueue(&self, task: &TaskEnvelope) -> Result<(), ExamError> {
        let message_body = serde_json::to_string(task)
            .map_err(|e| ExamError::BadRequest(format!("Failed to serialize task: {e}")))?;

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message_body)
            .send()
            .await
            .map_err(|e| {
                ExamError::StoreFailure(format!(
                    "Failed to send message to SQS: {}",
                    aws_sdk_sqs::error::DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }
}

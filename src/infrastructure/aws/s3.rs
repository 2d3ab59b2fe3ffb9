use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use crate::errors::ExamError;
use crate::store::BlobStore;

#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
}

impl S3BlobStore {
    #[must_use]
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    #[must_use]
    pub fn from_shared(shared: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self::new(S3Client::new(shared), bucket)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), ExamError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await?;
        info!(bucket = %self.bucket, key = %key, size, "Stored object");
        Ok(())
    }
}

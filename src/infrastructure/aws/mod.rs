/// AWS services integration.
///
/// This module contains AWS service implementations:
/// - DynamoDB exam table
/// - S3 upload bucket
/// - SQS notification queue
pub mod attributes;
pub mod dynamo;
pub mod s3;
pub mod sqs;

pub use dynamo::DynamoExamStore;
pub use s3::S3BlobStore;
pub use sqs::SqsTaskQueue;

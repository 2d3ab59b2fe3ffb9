/// Infrastructure layer for external integrations.
///
/// This module contains the AWS-backed implementations of the storage ports
/// declared in [`crate::store`].
pub mod aws;

//! Hooks and traits for the remote collaborator
//!
//! The pipeline never talks HTTP itself. It hands encoded payloads to an
//! [`ImageUploader`]; the API client crate provides the real implementation
//! and tests provide in-memory ones.

use async_trait::async_trait;

use crate::error::UploadError;
use crate::models::{EncodedPayload, UploadedImageRef};

/// Sends one encoded image to durable storage.
///
/// Implementations make exactly one attempt per call and never retry.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, payload: &EncodedPayload) -> Result<UploadedImageRef, UploadError>;
}

#[async_trait]
impl<T: ImageUploader + ?Sized> ImageUploader for std::sync::Arc<T> {
    async fn upload(&self, payload: &EncodedPayload) -> Result<UploadedImageRef, UploadError> {
        (**self).upload(payload).await
    }
}

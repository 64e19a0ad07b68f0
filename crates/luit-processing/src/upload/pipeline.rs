//! Per-image pipeline: compress → encode → upload.
//!
//! Validation happens in the batch loop so that a rejected file can be skipped
//! without aborting the batch. Every step here is a suspension point and is
//! raced against the batch's cancellation token.

use std::future::Future;

use luit_core::models::{RawImageInput, UploadedImageRef};
use luit_core::{ImageUploader, PipelineConfig, PipelineError};
use tokio_util::sync::CancellationToken;

use crate::compression::ImageCompressor;
use crate::encoding::PayloadEncoder;

/// Await `fut` unless `cancel` fires first.
///
/// A cancelled blocking task keeps running to completion; its result is dropped.
pub async fn until_cancelled<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
        result = fut => result,
    }
}

/// Run one validated input through compress, encode and upload.
pub async fn process_image(
    input: &RawImageInput,
    config: &PipelineConfig,
    uploader: &dyn ImageUploader,
    cancel: &CancellationToken,
) -> Result<UploadedImageRef, PipelineError> {
    let processed = until_cancelled(cancel, ImageCompressor::compress(input, config)).await?;

    let payload = until_cancelled(cancel, PayloadEncoder::to_transport_text(&processed)).await?;
    drop(processed);

    let image = until_cancelled(cancel, async {
        uploader.upload(&payload).await.map_err(PipelineError::from)
    })
    .await?;

    tracing::info!(
        name = %input.name,
        url = %image.url,
        public_id = %image.public_id,
        "Image uploaded"
    );

    Ok(image)
}

//! Transport encoding: processed JPEG → base64 data URL.

use luit_core::models::{EncodedPayload, ProcessedImage};
use luit_core::PipelineError;

/// Payloads below this size are encoded inline instead of on the blocking pool.
const INLINE_ENCODE_LIMIT: usize = 64 * 1024;

pub struct PayloadEncoder;

impl PayloadEncoder {
    /// Convert a processed image into its transport text.
    ///
    /// Lossless: [`EncodedPayload::decode`] yields the exact bytes of `image`.
    pub async fn to_transport_text(image: &ProcessedImage) -> Result<EncodedPayload, PipelineError> {
        let content_type = image.content_type();

        let payload = if image.data.len() <= INLINE_ENCODE_LIMIT {
            EncodedPayload::encode(content_type, &image.data)
        } else {
            let data = image.data.clone();
            tokio::task::spawn_blocking(move || EncodedPayload::encode(content_type, &data))
                .await
                .map_err(|e| PipelineError::Read(format!("failed to read image data: {}", e)))?
        };

        tracing::debug!(
            name = %image.name,
            bytes = image.data.len(),
            encoded_len = payload.as_str().len(),
            "Encoded image payload"
        );

        Ok(payload)
    }
}

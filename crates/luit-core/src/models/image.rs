use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PipelineError;

/// Content type of every processed image.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Image as handed over by a capture device or file picker.
#[derive(Clone, Debug)]
pub struct RawImageInput {
    pub name: String,
    /// Declared MIME type; not checked against the actual bytes
    pub content_type: String,
    /// Declared size in bytes
    pub size: u64,
    pub data: Bytes,
}

impl RawImageInput {
    /// Create an input whose declared size is the length of `data`.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// Override the declared size (some sources report it separately from the bytes).
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

/// MIME type a file picker would declare for `path`, based on its extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Re-encoded JPEG produced by the compressor.
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

impl ProcessedImage {
    pub fn content_type(&self) -> &'static str {
        JPEG_CONTENT_TYPE
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Data-URL text (`data:<mime>;base64,<data>`) ready for a JSON body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    /// Encode `data` as a data URL with the given MIME type.
    pub fn encode(content_type: &str, data: &[u8]) -> Self {
        Self(format!(
            "data:{};base64,{}",
            content_type,
            general_purpose::STANDARD.encode(data)
        ))
    }

    /// Wrap text that is already a base64 data URL.
    pub fn from_data_url(text: impl Into<String>) -> Result<Self, PipelineError> {
        let text = text.into();
        Self::split(&text)?;
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// MIME type declared in the data URL header.
    pub fn content_type(&self) -> &str {
        Self::split(&self.0).map(|(ct, _)| ct).unwrap_or_default()
    }

    /// Decode back to the exact bytes that were encoded.
    pub fn decode(&self) -> Result<Vec<u8>, PipelineError> {
        let (_, data) = Self::split(&self.0)?;
        general_purpose::STANDARD
            .decode(data)
            .map_err(|e| PipelineError::Read(format!("invalid base64 payload: {}", e)))
    }

    fn split(text: &str) -> Result<(&str, &str), PipelineError> {
        let rest = text
            .strip_prefix("data:")
            .ok_or_else(|| PipelineError::Read("payload is not a data URL".to_string()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| PipelineError::Read("data URL has no payload".to_string()))?;
        let content_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| PipelineError::Read("data URL is not base64".to_string()))?;
        Ok((content_type, data))
    }
}

impl std::fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Payloads are megabytes long; show the header and length only.
        write!(
            f,
            "data:{};base64,<{} chars>",
            self.content_type(),
            self.0.len()
        )
    }
}

/// Stable reference to an image stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImageRef {
    pub url: String,
    pub public_id: String,
}

//! Image processor - decoding and metadata extraction

use crate::metadata::ImageMetadata;
use image::{DynamicImage, GenericImageView, ImageReader};
use luit_core::PipelineError;
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode the full image. The format is guessed from the bytes; the
    /// declared content type is ignored.
    pub fn decode(data: &[u8]) -> Result<(DynamicImage, ImageMetadata), PipelineError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| PipelineError::Encoding(format!("failed to read image: {}", e)))?;
        let format = reader
            .format()
            .map(|f| format!("{:?}", f))
            .unwrap_or_else(|| "unknown".to_string());
        let img = reader
            .decode()
            .map_err(|e| PipelineError::Encoding(format!("failed to decode image: {}", e)))?;

        let (width, height) = img.dimensions();
        let metadata = ImageMetadata {
            width,
            height,
            format,
            size_bytes: data.len() as u64,
        };

        Ok((img, metadata))
    }

    pub fn extract_metadata(data: &[u8]) -> Result<ImageMetadata, PipelineError> {
        Self::decode(data).map(|(_, metadata)| metadata)
    }

    pub fn get_dimensions(data: &[u8]) -> Option<(u32, u32)> {
        Self::extract_metadata(data)
            .ok()
            .map(|m| (m.width, m.height))
    }
}

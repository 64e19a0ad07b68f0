//! Configuration module
//!
//! Limits consumed by the image pipeline. Every value has a hardcoded default
//! and can be overridden from the environment.

use std::env;

const MAX_IMAGES: usize = 3;
const MAX_FILE_SIZE_MB: u64 = 10;
const MAX_WIDTH_OR_HEIGHT: u32 = 1920;
const JPEG_QUALITY: f32 = 0.8;

/// Bytes per mebibyte, used for the size ceiling.
pub const MIB: u64 = 1024 * 1024;

/// Content types accepted by the validator.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Image pipeline configuration
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Maximum number of images held by one form's working list
    pub max_images: usize,
    pub max_file_size_bytes: u64,
    /// Longest side (in pixels) of a processed image
    pub max_width_or_height: u32,
    /// JPEG quality factor in `(0.0, 1.0]`
    pub jpeg_quality: f32,
    pub allowed_content_types: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
            max_file_size_bytes: MAX_FILE_SIZE_MB * MIB,
            max_width_or_height: MAX_WIDTH_OR_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Build from environment: MAX_IMAGES, MAX_FILE_SIZE_MB, MAX_WIDTH_OR_HEIGHT,
    /// JPEG_QUALITY, ALLOWED_CONTENT_TYPES. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let max_images = match env::var("MAX_IMAGES") {
            Ok(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_IMAGES must be a valid number"))?,
            Err(_) => defaults.max_images,
        };

        let max_file_size_bytes = match env::var("MAX_FILE_SIZE_MB") {
            Ok(v) => parse_file_size_mb(&v)?,
            Err(_) => defaults.max_file_size_bytes,
        };

        let max_width_or_height = match env::var("MAX_WIDTH_OR_HEIGHT") {
            Ok(v) => v
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("MAX_WIDTH_OR_HEIGHT must be a valid number"))?,
            Err(_) => defaults.max_width_or_height,
        };

        let jpeg_quality = match env::var("JPEG_QUALITY") {
            Ok(v) => v
                .trim()
                .parse::<f32>()
                .map_err(|_| anyhow::anyhow!("JPEG_QUALITY must be a number between 0 and 1"))?,
            Err(_) => defaults.jpeg_quality,
        };

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_content_types);

        let config = Self {
            max_images,
            max_file_size_bytes,
            max_width_or_height,
            jpeg_quality,
            allowed_content_types,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_images == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGES must be at least 1"));
        }

        if self.max_width_or_height == 0 {
            return Err(anyhow::anyhow!("MAX_WIDTH_OR_HEIGHT must be at least 1"));
        }

        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            return Err(anyhow::anyhow!(
                "JPEG_QUALITY must be greater than 0 and at most 1 (got {})",
                self.jpeg_quality
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES cannot be empty"));
        }

        Ok(())
    }

    /// Quality on the 1-100 scale used by JPEG encoders.
    pub fn jpeg_quality_percent(&self) -> u8 {
        (self.jpeg_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Size ceiling in whole megabytes, as shown to users.
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size_bytes / MIB
    }
}

/// Parse a `MAX_FILE_SIZE_MB` value into bytes.
fn parse_file_size_mb(value: &str) -> Result<u64, anyhow::Error> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))?
        .checked_mul(MIB)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))
}

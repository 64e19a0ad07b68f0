use luit_core::config::MIB;
use luit_core::models::RawImageInput;
use luit_core::PipelineConfig;
use serde::Serialize;

/// Why a file was turned away before processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    InvalidType,
    TooLarge,
}

/// Validation errors for selected or captured images
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file type. Please upload JPEG, PNG, or WebP images.")]
    InvalidContentType { content_type: String },

    #[error("File too large. Maximum size is {}MB.", format_mb(.max))]
    FileTooLarge { size: u64, max: u64 },
}

impl ValidationError {
    pub fn reason(&self) -> RejectionReason {
        match self {
            ValidationError::InvalidContentType { .. } => RejectionReason::InvalidType,
            ValidationError::FileTooLarge { .. } => RejectionReason::TooLarge,
        }
    }
}

/// Whole megabytes when exact, otherwise up to two decimals ("0.5", "1.25").
fn format_mb(bytes: &u64) -> String {
    if *bytes % MIB == 0 {
        return (*bytes / MIB).to_string();
    }
    let mb = format!("{:.2}", *bytes as f64 / MIB as f64);
    mb.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Outcome of validating one input.
pub type ValidationResult = Result<(), ValidationError>;

/// Image file validator
///
/// Pure checks on the declared MIME type and size. Content is not inspected
/// here; undecodable data is caught later by the compressor.
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl ImageValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_content_types.clone(),
        )
    }

    /// Validate content type. The declared type must match an allowed type
    /// exactly; no trimming or case folding.
    pub fn validate_content_type(&self, content_type: &str) -> ValidationResult {
        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == content_type)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate file size. Only the upper bound is enforced; empty files pass.
    pub fn validate_file_size(&self, size: u64) -> ValidationResult {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate an input: type first, then size.
    pub fn validate(&self, input: &RawImageInput) -> ValidationResult {
        self.validate_content_type(&input.content_type)?;
        self.validate_file_size(input.size)?;
        Ok(())
    }
}

/// Validate `input` against `config`.
pub fn validate(input: &RawImageInput, config: &PipelineConfig) -> ValidationResult {
    ImageValidator::from_config(config).validate(input)
}

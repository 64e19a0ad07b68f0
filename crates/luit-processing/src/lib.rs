//! Luit Image Processing Library
//!
//! This crate turns captured or selected photos into uploaded image references:
//! validate, resize and re-encode as JPEG, encode for transport, upload.

pub mod metadata;

pub mod capture;
pub mod compression;
pub mod encoding;
pub mod image;
pub mod input;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use capture::{CaptureDevice, CaptureSession, CaptureStream};
pub use compression::{target_dimensions, ImageCompressor};
pub use encoding::PayloadEncoder;
pub use self::image::ImageProcessor;
pub use input::{load_input, load_input_within, load_inputs};
pub use metadata::ImageMetadata;
pub use upload::{process_image, BatchOutcome, BatchUploader, RejectedFile};
pub use validator::{validate, ImageValidator, RejectionReason, ValidationError, ValidationResult};

pub use tokio_util::sync::CancellationToken;

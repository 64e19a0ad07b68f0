//! Luit Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by the image pipeline, the API client and the CLI.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{
    CaptureError, ErrorMetadata, LogLevel, PipelineError, UploadError, GENERIC_UPLOAD_FAILURE,
};
pub use hooks::ImageUploader;

//! Error types module
//!
//! Failures of the image pipeline, split the way callers react to them:
//! validation problems are reported per file and the batch continues, while
//! processing, read and upload failures abort the whole batch call.

/// Message shown when a batch aborts and no better message is available.
pub const GENERIC_UPLOAD_FAILURE: &str = "Failed to upload images. Please try again.";

/// Fallback for upload failures without a server-supplied message.
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like cancellation
    Debug,
    /// Warning level - for remote failures outside our control
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be logged and presented to the user
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether re-initiating the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failure of the remote upload step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// Request never produced a usable HTTP response
    #[error("Upload failed: {0}")]
    Network(String),

    /// Server answered with an error status or `success: false`
    #[error("Upload rejected{}: {}", format_status(.status), .message.as_deref().unwrap_or(UPLOAD_FAILED))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },

    /// Response could not be interpreted (bad JSON, missing url or id)
    #[error("Upload failed: malformed response ({0})")]
    MalformedResponse(String),
}

fn format_status(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (status {})", code))
        .unwrap_or_default()
}

impl UploadError {
    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            UploadError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    /// Best available diagnostic: the server message, else the fixed fallback.
    pub fn user_message(&self) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| UPLOAD_FAILED.to_string())
    }
}

/// Failure that aborts the current batch call.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Decode, resize or re-encode could not produce output
    #[error("Image encoding error: {0}")]
    Encoding(String),

    /// Blob could not be read into its transport representation
    #[error("Read error: {0}")]
    Read(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ErrorMetadata for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Encoding(_) => "ENCODING_ERROR",
            PipelineError::Read(_) => "READ_ERROR",
            PipelineError::Upload(_) => "UPLOAD_ERROR",
            PipelineError::Cancelled => "CANCELLED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Nothing is retried automatically; these only hint that a manual retry may work.
        matches!(
            self,
            PipelineError::Upload(UploadError::Network(_)) | PipelineError::Cancelled
        )
    }

    fn client_message(&self) -> String {
        match self {
            PipelineError::Upload(err) => err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_UPLOAD_FAILURE.to_string()),
            PipelineError::Cancelled => "Upload cancelled".to_string(),
            PipelineError::Encoding(_) | PipelineError::Read(_) => {
                GENERIC_UPLOAD_FAILURE.to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::Cancelled => LogLevel::Debug,
            PipelineError::Upload(_) => LogLevel::Warn,
            PipelineError::Encoding(_) | PipelineError::Read(_) => LogLevel::Error,
        }
    }
}

/// Failure to acquire or use a capture device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("Camera access denied or unavailable: permission denied")]
    PermissionDenied,

    #[error("Camera access denied or unavailable: {0}")]
    Unavailable(String),

    #[error("Capture failed: {0}")]
    Frame(String),
}

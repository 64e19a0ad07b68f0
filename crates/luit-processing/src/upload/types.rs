//! Types for the batch upload pipeline.

use luit_core::models::{Notice, UploadedImageRef};
use luit_core::{ErrorMetadata, PipelineError};
use serde::Serialize;

use crate::validator::{RejectionReason, ValidationError};

/// A file turned away by the validator; the rest of the batch continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    pub name: String,
    pub reason: RejectionReason,
    pub message: String,
}

impl RejectedFile {
    pub fn new(name: impl Into<String>, error: &ValidationError) -> Self {
        Self {
            name: name.into(),
            reason: error.reason(),
            message: error.to_string(),
        }
    }
}

/// Result of one batch call.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Images appended to the working list by this call, in order
    pub uploaded: Vec<UploadedImageRef>,
    pub rejected: Vec<RejectedFile>,
    /// Files dropped because the working list had no room for them
    pub ignored: usize,
    pub cancelled: bool,
    /// Failure that aborted the batch, if any
    pub failure: Option<PipelineError>,
    pub notices: Vec<Notice>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && !self.cancelled
    }

    /// Derive the user-facing notices from what happened in the batch.
    pub(crate) fn build_notices(&mut self, max_images: usize) {
        let mut notices = Vec::new();

        if self.ignored > 0 {
            notices.push(Notice::warning(format!(
                "You can only upload {} images. {} file(s) ignored.",
                max_images, self.ignored
            )));
        }

        for rejected in &self.rejected {
            notices.push(Notice::warning(format!(
                "{} ({})",
                rejected.message, rejected.name
            )));
        }
        if !self.rejected.is_empty() {
            notices.push(Notice::warning(format!(
                "{} file(s) rejected.",
                self.rejected.len()
            )));
        }

        if let Some(failure) = &self.failure {
            notices.push(Notice::error(failure.client_message()));
        }

        self.notices = notices;
    }
}

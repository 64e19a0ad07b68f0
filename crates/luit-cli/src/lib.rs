use luit_core::models::{Notice, UploadedImageRef, WorkingList};
use luit_core::ErrorMetadata;
use luit_processing::{BatchOutcome, RejectedFile};
use serde::Serialize;

/// JSON view of a batch: the working list after the call plus what happened.
#[derive(Debug, Serialize)]
pub struct UploadSummary<'a> {
    pub images: &'a [UploadedImageRef],
    pub max_images: usize,
    pub uploaded: usize,
    pub rejected: &'a [RejectedFile],
    pub ignored: usize,
    pub cancelled: bool,
    pub notices: &'a [Notice],
}

impl<'a> UploadSummary<'a> {
    pub fn new(working: &'a WorkingList, outcome: &'a BatchOutcome) -> Self {
        Self {
            images: working.as_slice(),
            max_images: working.max_images(),
            uploaded: outcome.uploaded.len(),
            rejected: &outcome.rejected,
            ignored: outcome.ignored,
            cancelled: outcome.cancelled,
            notices: &outcome.notices,
        }
    }
}

/// Fail when an upload batch did not run to completion.
pub fn ensure_completed(outcome: &BatchOutcome) -> anyhow::Result<()> {
    if let Some(failure) = &outcome.failure {
        anyhow::bail!("{} ({})", failure.client_message(), failure.error_code());
    }
    if outcome.cancelled {
        anyhow::bail!("Upload cancelled");
    }
    Ok(())
}

/// Decide whether a report goes ahead after its image batch.
///
/// A failed image upload does not block the report; it is submitted with
/// whatever the working list holds. Only a cancelled batch stops it.
pub fn ensure_report_can_proceed(
    outcome: &BatchOutcome,
    working: &WorkingList,
) -> anyhow::Result<()> {
    if outcome.cancelled {
        anyhow::bail!("Upload cancelled, report not submitted");
    }
    if let Some(failure) = &outcome.failure {
        tracing::warn!(
            uploaded = working.len(),
            code = failure.error_code(),
            "Image upload failed, but the report will still be submitted"
        );
    }
    Ok(())
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

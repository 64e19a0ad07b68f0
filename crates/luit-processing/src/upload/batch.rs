//! Batch orchestration over the per-image pipeline.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use luit_core::models::{RawImageInput, WorkingList};
use luit_core::{ErrorMetadata, ImageUploader, LogLevel, PipelineConfig, PipelineError};
use tokio_util::sync::CancellationToken;

use super::pipeline::{process_image, until_cancelled};
use super::types::{BatchOutcome, RejectedFile};
use crate::input::load_input_within;
use crate::validator::ImageValidator;

/// Uploads the files of one user action into a caller-owned working list.
///
/// Images are processed strictly one after another: at most one decoded
/// bitmap and one request are in flight, and list order is submission order.
pub struct BatchUploader {
    config: PipelineConfig,
    validator: ImageValidator,
    uploader: Arc<dyn ImageUploader>,
}

impl BatchUploader {
    pub fn new(config: PipelineConfig, uploader: Arc<dyn ImageUploader>) -> Self {
        let validator = ImageValidator::from_config(&config);
        Self {
            config,
            validator,
            uploader,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Empty working list sized for this uploader's configuration.
    pub fn new_working_list(&self) -> WorkingList {
        WorkingList::new(self.config.max_images)
    }

    pub async fn upload_batch(
        &self,
        inputs: Vec<RawImageInput>,
        working: &mut WorkingList,
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        self.upload_batch_with(inputs, working, cancel, |_| {}).await
    }

    /// Process `inputs` into `working`, calling `on_change` after each append.
    ///
    /// Only the first `working.remaining()` inputs are considered. Validation
    /// failures skip the file; any later failure ends the call, keeping what
    /// was already appended.
    pub async fn upload_batch_with<F>(
        &self,
        inputs: Vec<RawImageInput>,
        working: &mut WorkingList,
        cancel: &CancellationToken,
        on_change: F,
    ) -> BatchOutcome
    where
        F: FnMut(&WorkingList) + Send,
    {
        let total = inputs.len();
        let sources = inputs.into_iter().map(|input| std::future::ready(Ok(input)));
        self.run(total, sources, working, cancel, on_change).await
    }

    /// Like [`BatchUploader::upload_batch_with`], reading files from disk.
    ///
    /// Files past the cap are never opened. Files over the size ceiling are
    /// rejected from their metadata without being read. A file that cannot be
    /// read aborts the batch with [`PipelineError::Read`].
    pub async fn upload_files_with<F>(
        &self,
        paths: &[PathBuf],
        working: &mut WorkingList,
        cancel: &CancellationToken,
        on_change: F,
    ) -> BatchOutcome
    where
        F: FnMut(&WorkingList) + Send,
    {
        let max_file_size = self.config.max_file_size_bytes;
        let sources = paths.iter().map(|path| async move {
            load_input_within(path, max_file_size)
                .await
                .map_err(|e| PipelineError::Read(format!("{:#}", e)))
        });
        self.run(paths.len(), sources, working, cancel, on_change).await
    }

    async fn run<I, Fut, F>(
        &self,
        total: usize,
        sources: I,
        working: &mut WorkingList,
        cancel: &CancellationToken,
        mut on_change: F,
    ) -> BatchOutcome
    where
        I: Iterator<Item = Fut>,
        Fut: Future<Output = Result<RawImageInput, PipelineError>>,
        F: FnMut(&WorkingList) + Send,
    {
        let mut outcome = BatchOutcome::default();
        let remaining = working.remaining();

        if total > remaining {
            outcome.ignored = total - remaining;
            tracing::warn!(
                selected = total,
                remaining = remaining,
                max_images = working.max_images(),
                "Image cap reached, ignoring extra files"
            );
        }

        for source in sources.take(remaining) {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let input = match until_cancelled(cancel, source).await {
                Ok(input) => input,
                Err(PipelineError::Cancelled) => {
                    outcome.cancelled = true;
                    break;
                }
                Err(e) => {
                    log_failure("<unread>", &e);
                    outcome.failure = Some(e);
                    break;
                }
            };

            if let Err(e) = self.validator.validate(&input) {
                tracing::info!(
                    name = %input.name,
                    content_type = %input.content_type,
                    size = input.size,
                    reason = ?e.reason(),
                    "Image rejected"
                );
                outcome.rejected.push(RejectedFile::new(&input.name, &e));
                continue;
            }

            match process_image(&input, &self.config, self.uploader.as_ref(), cancel).await {
                Ok(image) => {
                    if working.push(image.clone()) {
                        outcome.uploaded.push(image);
                        on_change(working);
                    }
                }
                Err(PipelineError::Cancelled) => {
                    outcome.cancelled = true;
                    break;
                }
                Err(e) => {
                    log_failure(&input.name, &e);
                    outcome.failure = Some(e);
                    break;
                }
            }
        }

        if outcome.cancelled {
            tracing::debug!(uploaded = outcome.uploaded.len(), "Batch cancelled");
        }

        outcome.build_notices(working.max_images());
        outcome
    }
}

fn log_failure(name: &str, error: &PipelineError) {
    match error.log_level() {
        LogLevel::Error => tracing::error!(
            name = %name,
            code = error.error_code(),
            error = %error,
            "Batch upload aborted"
        ),
        LogLevel::Warn => tracing::warn!(
            name = %name,
            code = error.error_code(),
            error = %error,
            "Batch upload aborted"
        ),
        LogLevel::Debug => tracing::debug!(
            name = %name,
            code = error.error_code(),
            error = %error,
            "Batch upload aborted"
        ),
    }
}

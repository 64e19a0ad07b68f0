//! File-picker entry point: local files as pipeline inputs.

use anyhow::{Context, Result};
use luit_core::models::{content_type_for_path, RawImageInput};
use std::path::Path;

/// Read `path` into a [`RawImageInput`], declaring its type from the extension.
pub async fn load_input(path: &Path) -> Result<RawImageInput> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(RawImageInput::new(file_name(path), content_type_for_path(path), data))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string()
}

/// Like [`load_input`], but a file larger than `max_file_size` is not read:
/// the returned input is empty and declares the size found on disk.
pub async fn load_input_within(path: &Path, max_file_size: u64) -> Result<RawImageInput> {
    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?
        .len();

    if size <= max_file_size {
        return load_input(path).await;
    }

    tracing::debug!(path = %path.display(), size = size, "Skipping read of oversized file");
    Ok(RawImageInput::new(file_name(path), content_type_for_path(path), Vec::new())
        .with_declared_size(size))
}

/// Read several files, preserving their order.
pub async fn load_inputs(paths: &[impl AsRef<Path>]) -> Result<Vec<RawImageInput>> {
    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        inputs.push(load_input(path.as_ref()).await?);
    }
    Ok(inputs)
}

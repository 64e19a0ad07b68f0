//! Upload pipeline: validate → compress → encode → upload.

pub mod batch;
pub mod pipeline;
pub mod types;

pub use batch::BatchUploader;
pub use pipeline::{process_image, until_cancelled};
pub use types::{BatchOutcome, RejectedFile};

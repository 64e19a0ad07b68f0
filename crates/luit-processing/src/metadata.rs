//! Image metadata types

use serde::Serialize;

/// Image metadata read while decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Detected container format (e.g. "Png"); "unknown" when not recognised
    pub format: String,
    pub size_bytes: u64,
}

impl ImageMetadata {
    pub fn longest_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

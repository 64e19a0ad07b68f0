//! Shared fixtures for the processing integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use luit_core::models::{EncodedPayload, RawImageInput, UploadedImageRef};
use luit_core::{ImageUploader, UploadError};
use tokio_util::sync::CancellationToken;

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn png_input(name: &str, width: u32, height: u32) -> RawImageInput {
    RawImageInput::new(name, "image/png", encoded(width, height, ImageFormat::Png))
}

pub fn jpeg_input(name: &str, width: u32, height: u32) -> RawImageInput {
    RawImageInput::new(name, "image/jpeg", encoded(width, height, ImageFormat::Jpeg))
}

/// What the next upload call does.
pub enum UploadStep {
    Succeed,
    NetworkError,
    Rejected(String),
    /// Fire the token, then never complete.
    CancelAndHang(CancellationToken),
}

/// In-memory uploader that records payloads and plays back a script.
///
/// Once the script runs out every call succeeds.
pub struct RecordingUploader {
    script: Mutex<VecDeque<UploadStep>>,
    payloads: Mutex<Vec<EncodedPayload>>,
}

impl RecordingUploader {
    pub fn succeeding() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(steps: Vec<UploadStep>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    pub fn payloads(&self) -> Vec<EncodedPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageUploader for RecordingUploader {
    async fn upload(&self, payload: &EncodedPayload) -> Result<UploadedImageRef, UploadError> {
        let call = {
            let mut payloads = self.payloads.lock().unwrap();
            payloads.push(payload.clone());
            payloads.len()
        };
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(UploadStep::Succeed);

        match step {
            UploadStep::Succeed => Ok(UploadedImageRef {
                url: format!("https://cdn.example.com/water_reports/{call}.jpg"),
                public_id: format!("luit/water_reports/{call}"),
            }),
            UploadStep::NetworkError => Err(UploadError::Network("connection reset".to_string())),
            UploadStep::Rejected(message) => Err(UploadError::Rejected {
                status: Some(400),
                message: Some(message),
            }),
            UploadStep::CancelAndHang(token) => {
                token.cancel();
                std::future::pending().await
            }
        }
    }
}

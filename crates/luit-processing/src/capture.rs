//! Camera capture sessions.
//!
//! A [`CaptureSession`] holds exclusive use of a device stream from
//! [`CaptureSession::start`] until the frame is captured, the user cancels, or
//! the session is dropped. The stream is stopped exactly once on every path.

use async_trait::async_trait;
use image::DynamicImage;
use luit_core::models::{RawImageInput, JPEG_CONTENT_TYPE};
use luit_core::{CaptureError, PipelineConfig};

use crate::compression::encode_jpeg;

/// Name given to captured frames.
pub const CAPTURED_FRAME_NAME: &str = "capture.jpg";

/// A camera or similar source that can be opened for live preview.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire the device. Fails with [`CaptureError::PermissionDenied`] or
    /// [`CaptureError::Unavailable`]; callers must not retry automatically.
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// A live, exclusively held device stream.
#[async_trait]
pub trait CaptureStream: Send {
    /// Grab the current frame.
    async fn grab_frame(&mut self) -> Result<DynamicImage, CaptureError>;

    /// Release the device. Called once by [`CaptureSession`].
    fn stop(&mut self);
}

/// Scoped acquisition of a capture device.
pub struct CaptureSession {
    stream: Option<Box<dyn CaptureStream>>,
    quality: u8,
}

impl CaptureSession {
    pub async fn start(
        device: &dyn CaptureDevice,
        config: &PipelineConfig,
    ) -> Result<Self, CaptureError> {
        let stream = device.open().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to acquire capture device");
            e
        })?;
        tracing::debug!("Capture device acquired");

        Ok(Self {
            stream: Some(stream),
            quality: config.jpeg_quality_percent(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Grab one frame, release the device and return the frame as a JPEG input.
    pub async fn capture(mut self) -> Result<RawImageInput, CaptureError> {
        let frame = match self.stream.as_mut() {
            Some(stream) => stream.grab_frame().await,
            None => Err(CaptureError::Unavailable("capture session already closed".to_string())),
        };
        // Device is released before encoding.
        self.release();

        let frame = frame?;
        let quality = self.quality;
        let data = tokio::task::spawn_blocking(move || encode_jpeg(&frame, quality))
            .await
            .map_err(|e| CaptureError::Frame(format!("encode task failed: {}", e)))?
            .map_err(|e| CaptureError::Frame(e.to_string()))?;

        Ok(RawImageInput::new(CAPTURED_FRAME_NAME, JPEG_CONTENT_TYPE, data))
    }

    /// Abandon the preview without capturing.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("Capture device released");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        stopped: AtomicUsize,
    }

    struct FakeCamera {
        counters: Arc<Counters>,
        deny: bool,
        fail_frame: bool,
    }

    struct FakeStream {
        counters: Arc<Counters>,
        fail_frame: bool,
    }

    #[async_trait]
    impl CaptureDevice for FakeCamera {
        async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
            if self.deny {
                return Err(CaptureError::PermissionDenied);
            }
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                counters: self.counters.clone(),
                fail_frame: self.fail_frame,
            }))
        }
    }

    #[async_trait]
    impl CaptureStream for FakeStream {
        async fn grab_frame(&mut self) -> Result<DynamicImage, CaptureError> {
            if self.fail_frame {
                return Err(CaptureError::Frame("sensor error".to_string()));
            }
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                64,
                48,
                Rgb([10, 20, 30]),
            )))
        }

        fn stop(&mut self) {
            self.counters.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn camera(deny: bool, fail_frame: bool) -> (FakeCamera, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        (
            FakeCamera {
                counters: counters.clone(),
                deny,
                fail_frame,
            },
            counters,
        )
    }

    #[tokio::test]
    async fn test_capture_releases_device_and_returns_jpeg() {
        let (device, counters) = camera(false, false);
        let session = CaptureSession::start(&device, &PipelineConfig::default())
            .await
            .unwrap();
        assert!(session.is_active());

        let input = session.capture().await.unwrap();
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
        assert_eq!(input.name, CAPTURED_FRAME_NAME);
        assert_eq!(input.content_type, "image/jpeg");
        assert_eq!(input.size, input.data.len() as u64);
        assert_eq!(
            image::guess_format(&input.data).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[tokio::test]
    async fn test_cancel_releases_device_once() {
        let (device, counters) = camera(false, false);
        let session = CaptureSession::start(&device, &PipelineConfig::default())
            .await
            .unwrap();
        session.cancel();
        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_device() {
        let (device, counters) = camera(false, false);
        {
            let _session = CaptureSession::start(&device, &PipelineConfig::default())
                .await
                .unwrap();
        }
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_frame_still_releases_device() {
        let (device, counters) = camera(false, true);
        let session = CaptureSession::start(&device, &PipelineConfig::default())
            .await
            .unwrap();
        let err = session.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::Frame(_)));
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_permission_denied_is_surfaced() {
        let (device, counters) = camera(true, false);
        let result = CaptureSession::start(&device, &PipelineConfig::default()).await;
        assert!(matches!(result, Err(CaptureError::PermissionDenied)));
        assert_eq!(counters.opened.load(Ordering::SeqCst), 0);
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 0);
    }
}

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use luit_core::models::{ProcessedImage, RawImageInput};
use luit_core::{PipelineConfig, PipelineError};

use crate::image::{ImageOrientation, ImageProcessor};

/// Dimensions after constraining the longest side to `max_width_or_height`.
///
/// Both sides are scaled by `max / max(width, height)` when the longest side
/// exceeds `max`; the longest side then becomes exactly `max` and the other is
/// rounded to the nearest pixel (at least 1). Images within bounds keep their
/// dimensions.
pub fn target_dimensions(width: u32, height: u32, max_width_or_height: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_width_or_height {
        return (width, height);
    }

    let scale = max_width_or_height as f64 / longest as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).max(1);

    if width >= height {
        (max_width_or_height, scaled(height))
    } else {
        (scaled(width), max_width_or_height)
    }
}

/// Encode as baseline JPEG at `quality` (1-100). Alpha is discarded.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, PipelineError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let estimated_size = (width as usize * height as usize) / 4;
    let mut buffer = Vec::with_capacity(estimated_size);
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| PipelineError::Encoding(format!("failed to encode JPEG: {}", e)))?;

    Ok(Bytes::from(buffer))
}

/// Resizes and re-encodes images before upload
pub struct ImageCompressor;

impl ImageCompressor {
    /// Decode `input`, clamp its longest side and re-encode as JPEG.
    ///
    /// Decoding and encoding are CPU-bound and run on the blocking pool; the
    /// caller suspends until they finish.
    pub async fn compress(
        input: &RawImageInput,
        config: &PipelineConfig,
    ) -> Result<ProcessedImage, PipelineError> {
        let data = input.data.clone();
        let name = input.name.clone();
        let max_width_or_height = config.max_width_or_height;
        let quality = config.jpeg_quality_percent();

        tokio::task::spawn_blocking(move || {
            Self::compress_bytes(&data, name, max_width_or_height, quality)
        })
        .await
        .map_err(|e| PipelineError::Encoding(format!("compression task failed: {}", e)))?
    }

    /// Synchronous core of [`ImageCompressor::compress`].
    pub fn compress_bytes(
        data: &[u8],
        name: String,
        max_width_or_height: u32,
        quality: u8,
    ) -> Result<ProcessedImage, PipelineError> {
        let (img, metadata) = ImageProcessor::decode(data)?;
        let img = ImageOrientation::apply_exif_orientation(img, data);
        let (original_width, original_height) = img.dimensions();
        let (width, height) =
            target_dimensions(original_width, original_height, max_width_or_height);

        let img = if (width, height) != (original_width, original_height) {
            tracing::debug!(
                original_width = original_width,
                original_height = original_height,
                width = width,
                height = height,
                "Resizing image"
            );
            img.resize_exact(width, height, FilterType::Triangle)
        } else {
            img
        };

        let encoded = encode_jpeg(&img, quality)?;
        let (width, height) = img.dimensions();

        tracing::debug!(
            name = %name,
            format = %metadata.format,
            original_bytes = metadata.size_bytes,
            compressed_bytes = encoded.len(),
            quality = quality,
            "Compressed image"
        );

        Ok(ProcessedImage {
            name,
            width,
            height,
            data: encoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
        ImageProcessor::get_dimensions(data).unwrap()
    }

    #[test]
    fn test_target_dimensions_within_bounds_unchanged() {
        for (w, h) in [(1, 1), (640, 480), (1920, 1080), (1080, 1920), (1920, 1920)] {
            assert_eq!(target_dimensions(w, h, 1920), (w, h));
        }
    }

    #[test]
    fn test_target_dimensions_clamps_longest_side() {
        assert_eq!(target_dimensions(3840, 2160, 1920), (1920, 1080));
        assert_eq!(target_dimensions(2160, 3840, 1920), (1080, 1920));
        assert_eq!(target_dimensions(4000, 4000, 1920), (1920, 1920));
        assert_eq!(target_dimensions(2500, 1001, 1920), (1920, 769));
    }

    #[test]
    fn test_target_dimensions_preserve_aspect_ratio() {
        for (w, h) in [(4032, 3024), (3000, 1234), (1921, 7), (5000, 2999), (1999, 4001)] {
            let (nw, nh) = target_dimensions(w, h, 1920);
            assert_eq!(nw.max(nh), 1920);

            let (long, short) = (w.max(h) as f64, w.min(h) as f64);
            let expected_short = short * 1920.0 / long;
            let actual_short = nw.min(nh) as f64;
            assert!(
                (expected_short - actual_short).abs() <= 1.0,
                "{}x{} -> {}x{}",
                w,
                h,
                nw,
                nh
            );
        }
    }

    #[test]
    fn test_target_dimensions_never_zero() {
        assert_eq!(target_dimensions(100_000, 1, 1920), (1920, 1));
    }

    #[test]
    fn test_compress_downscales_large_image() {
        let data = png_bytes(2400, 1600);
        let processed = ImageCompressor::compress_bytes(&data, "big.png".to_string(), 1920, 80)
            .unwrap();

        assert_eq!((processed.width, processed.height), (1920, 1280));
        assert_eq!(decoded_dimensions(&processed.data), (1920, 1280));
        assert_eq!(processed.content_type(), "image/jpeg");
        assert_eq!(processed.name, "big.png");
    }

    #[test]
    fn test_compress_keeps_small_image_dimensions() {
        let data = png_bytes(640, 427);
        let processed = ImageCompressor::compress_bytes(&data, "small.png".to_string(), 1920, 80)
            .unwrap();

        assert_eq!((processed.width, processed.height), (640, 427));
        assert_eq!(decoded_dimensions(&processed.data), (640, 427));
    }

    #[test]
    fn test_compress_outputs_jpeg_for_any_input() {
        let img = RgbaImage::from_pixel(50, 80, Rgba([0, 128, 255, 100]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();

        let processed =
            ImageCompressor::compress_bytes(&buffer, "alpha.png".to_string(), 1920, 80).unwrap();
        let format = image::guess_format(&processed.data).unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_compress_corrupt_data_fails_with_encoding_error() {
        let result =
            ImageCompressor::compress_bytes(b"\xff\xd8\xff garbage", "bad.jpg".to_string(), 1920, 80);
        assert!(matches!(result, Err(PipelineError::Encoding(_))));
    }

    #[test]
    fn test_lower_quality_gives_smaller_output() {
        let data = png_bytes(800, 600);
        let high =
            ImageCompressor::compress_bytes(&data, "a".to_string(), 1920, 95).unwrap();
        let low = ImageCompressor::compress_bytes(&data, "a".to_string(), 1920, 30).unwrap();
        assert!(low.size_bytes() < high.size_bytes());
    }

    #[tokio::test]
    async fn test_compress_async_uses_config() {
        let data = png_bytes(3000, 1000);
        let input = RawImageInput::new("wide.png", "image/png", data);
        let config = PipelineConfig {
            max_width_or_height: 600,
            ..Default::default()
        };

        let processed = ImageCompressor::compress(&input, &config).await.unwrap();
        assert_eq!((processed.width, processed.height), (600, 200));
    }

    #[test]
    fn test_compress_applies_exif_orientation_before_resizing() {
        use crate::image::orientation::tests::jpeg_with_orientation;

        let data = jpeg_with_orientation(40, 20, 6);
        let processed =
            ImageCompressor::compress_bytes(&data, "phone.jpg".to_string(), 1920, 80).unwrap();
        assert_eq!((processed.width, processed.height), (20, 40));
        assert_eq!(decoded_dimensions(&processed.data), (20, 40));

        // Longest side is clamped on the upright image.
        let data = jpeg_with_orientation(64, 32, 8);
        let processed =
            ImageCompressor::compress_bytes(&data, "phone.jpg".to_string(), 16, 80).unwrap();
        assert_eq!((processed.width, processed.height), (8, 16));
    }
}

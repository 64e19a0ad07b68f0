use image::{imageops, DynamicImage};
use std::io::Cursor;

/// Upright correction for camera photos.
///
/// Phones store pixels in sensor order and record the intended rotation in
/// the EXIF `Orientation` tag. Re-encoding drops EXIF, so the rotation has to
/// be baked into the pixels before the JPEG is written.
pub struct ImageOrientation;

impl ImageOrientation {
    /// EXIF orientation of `data`, 1 (upright) when absent or unreadable.
    pub fn read_exif_orientation(data: &[u8]) -> u32 {
        let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
            Ok(exif) => exif,
            Err(_) => return 1,
        };
        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .filter(|value| (1..=8).contains(value))
            .unwrap_or(1)
    }

    /// Rotation (degrees clockwise) and horizontal flip that make an image
    /// with the given orientation upright. The rotation is applied first.
    pub fn transforms_for(orientation: u32) -> (Option<u16>, bool, bool) {
        match orientation {
            2 => (None, true, false),
            3 => (Some(180), false, false),
            4 => (None, false, true),
            5 => (Some(90), true, false),
            6 => (Some(90), false, false),
            7 => (Some(270), true, false),
            8 => (Some(270), false, false),
            _ => (None, false, false),
        }
    }

    /// Apply the EXIF orientation found in `data` to the decoded `img`.
    pub fn apply_exif_orientation(img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        if orientation == 1 {
            return img;
        }
        tracing::debug!(orientation = orientation, "Applying EXIF orientation");
        Self::apply(img, orientation)
    }

    pub fn apply(img: DynamicImage, orientation: u32) -> DynamicImage {
        let (rotate, flip_h, flip_v) = Self::transforms_for(orientation);

        let img = match rotate {
            Some(90) => img.rotate90(),
            Some(180) => img.rotate180(),
            Some(270) => img.rotate270(),
            _ => img,
        };
        let img = if flip_h {
            DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()))
        } else {
            img
        };
        if flip_v {
            DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()))
        } else {
            img
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    /// JPEG of `width`x`height` carrying an EXIF APP1 segment with `orientation`.
    pub(crate) fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let jpeg = crate::compression::encode_jpeg(&img, 90).unwrap();

        // Big-endian TIFF header, one IFD entry: Orientation (0x0112), SHORT, count 1.
        let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        tiff.extend_from_slice(&[0x00, 0x01]);
        tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0x00, 0x00]);
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut app1 = b"Exif\0\0".to_vec();
        app1.extend_from_slice(&tiff);
        let length = (app1.len() + 2) as u16;

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    /// 3x2 image with a single red pixel at the top-left corner.
    fn marked_image() -> DynamicImage {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(img)
    }

    fn red_at(img: &DynamicImage) -> (u32, u32) {
        img.pixels()
            .find(|(_, _, p)| p.0[0] == 255)
            .map(|(x, y, _)| (x, y))
            .unwrap()
    }

    #[test]
    fn test_upright_is_unchanged() {
        let img = ImageOrientation::apply(marked_image(), 1);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(red_at(&img), (0, 0));
    }

    #[test]
    fn test_rotations_swap_dimensions() {
        for orientation in [5, 6, 7, 8] {
            let img = ImageOrientation::apply(marked_image(), orientation);
            assert_eq!(img.dimensions(), (2, 3), "orientation {}", orientation);
        }
        for orientation in [2, 3, 4] {
            let img = ImageOrientation::apply(marked_image(), orientation);
            assert_eq!(img.dimensions(), (3, 2), "orientation {}", orientation);
        }
    }

    #[test]
    fn test_corner_positions() {
        // Where the stored top-left pixel ends up once upright.
        let expected = [
            (2, (2, 0)),
            (3, (2, 1)),
            (4, (0, 1)),
            (5, (0, 0)),
            (6, (1, 0)),
            (7, (1, 2)),
            (8, (0, 2)),
        ];
        for (orientation, position) in expected {
            let img = ImageOrientation::apply(marked_image(), orientation);
            assert_eq!(red_at(&img), position, "orientation {}", orientation);
        }
    }

    #[test]
    fn test_missing_exif_reads_as_upright() {
        assert_eq!(ImageOrientation::read_exif_orientation(b"not an image"), 1);
        assert_eq!(ImageOrientation::transforms_for(42), (None, false, false));
    }

    #[test]
    fn test_reads_orientation_from_exif_segment() {
        let data = jpeg_with_orientation(40, 20, 6);
        assert_eq!(ImageOrientation::read_exif_orientation(&data), 6);

        let data = jpeg_with_orientation(40, 20, 3);
        assert_eq!(ImageOrientation::read_exif_orientation(&data), 3);
    }

    #[test]
    fn test_out_of_range_exif_value_reads_as_upright() {
        let data = jpeg_with_orientation(40, 20, 9);
        assert_eq!(ImageOrientation::read_exif_orientation(&data), 1);
    }

    #[test]
    fn test_apply_exif_orientation_rotates_decoded_image() {
        let data = jpeg_with_orientation(40, 20, 6);
        let img = image::load_from_memory(&data).unwrap();
        assert_eq!(img.dimensions(), (40, 20));

        let upright = ImageOrientation::apply_exif_orientation(img, &data);
        assert_eq!(upright.dimensions(), (20, 40));
    }
}

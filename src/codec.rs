//! Decode of caller-supplied image bytes and encode of finished rasters.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, RgbImage};

use crate::error::PhotoSheetError;

/// JPEG quality used for downloads, matching the editor's export setting.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.95;

/// Decode input bytes (JPEG, PNG, or WebP) into a `DynamicImage`.
pub fn decode_image(input: &[u8]) -> Result<DynamicImage, PhotoSheetError> {
    let decoded =
        image::load_from_memory(input).map_err(|e| PhotoSheetError::Decode(e.to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(PhotoSheetError::ZeroDimensions);
    }
    Ok(decoded)
}

/// Encode an RGB raster as JPEG at the given quality (0.0 to 1.0).
pub fn encode_jpeg(image: &RgbImage, quality: f32) -> Result<Vec<u8>, PhotoSheetError> {
    if !(0.0..=1.0).contains(&quality) {
        return Err(PhotoSheetError::InvalidQuality(quality));
    }
    let mut buffer = Vec::new();
    let quality_percent = (quality * 100.0).round() as u8;
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_percent);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PhotoSheetError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode an RGB raster as lossless PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, PhotoSheetError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PhotoSheetError::Encode(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
        img
    }

    #[test]
    fn jpeg_round_trip_preserves_dimensions() {
        let img = gradient(120, 160);
        let bytes = encode_jpeg(&img, 0.95).unwrap();
        assert_eq!(bytes[0], 0xFF);
        assert_eq!(bytes[1], 0xD8);
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 160));
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let img = gradient(60, 80);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = decode_image(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.as_raw(), img.as_raw());
    }

    #[test]
    fn quality_outside_range_is_rejected() {
        let img = gradient(10, 10);
        assert!(matches!(
            encode_jpeg(&img, 1.5),
            Err(PhotoSheetError::InvalidQuality(_))
        ));
        assert!(encode_jpeg(&img, -0.1).is_err());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(PhotoSheetError::Decode(_))
        ));
    }
}

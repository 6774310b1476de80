//! PNG encoding for export.
//!
//! The composite is always written losslessly with the `image` crate's PNG
//! encoder, keeping the alpha channel.

use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode RGBA8 pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn encode_png_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Encode an RGBA image to PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    encode_png_rgba(image.as_raw(), image.width(), image.height())
}

/// Wrap PNG bytes in a `data:` URL, for showing the result in a new page.
pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_basic() {
        let img = RgbaImage::from_pixel(20, 10, image::Rgba([10, 20, 30, 255]));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, image::Rgba([1, 2, 3, 4]));
        img.put_pixel(2, 1, image::Rgba([250, 128, 7, 255]));

        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data() {
        let result = encode_png_rgba(&[0u8; 10], 2, 2);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 16,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_encode_png_zero_width() {
        let result = encode_png_rgba(&[], 0, 100);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_zero_height() {
        let result = encode_png_rgba(&[], 100, 0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_data_url_prefix() {
        let url = png_data_url(&PNG_SIGNATURE);
        assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");
    }
}

//! Raster decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};

use super::{DecodeError, Orientation};

/// Decode image bytes of any supported format into RGBA8.
///
/// EXIF orientation is applied for JPEG input so the photo appears upright,
/// the way a browser `<img>` would show it.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for no bytes, `DecodeError::InvalidFormat`
/// when the format cannot be guessed and `DecodeError::CorruptedFile` when
/// decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if format == ImageFormat::Jpeg {
        apply_orientation(img, extract_orientation(bytes))
    } else {
        img
    };

    Ok(img.into_rgba8())
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

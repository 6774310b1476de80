//! Image decoding for uploads and bundled assets.
//!
//! This module provides functionality for:
//! - Filtering picked files by MIME type (non-images are ignored)
//! - Decoding PNG, JPEG, GIF, WebP and BMP bytes to RGBA8
//! - Applying EXIF orientation to JPEG photos
//!
//! # Architecture
//!
//! The host page reads the picked or dropped file into bytes and hands them
//! over together with the browser-reported MIME type. All decoding is
//! synchronous and single-threaded within WASM.

mod raster;
mod types;

use image::RgbaImage;

pub use raster::{decode_image, extract_orientation};
pub use types::{AssetKind, DecodeError, Orientation};

/// True for any `image/*` MIME type.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim()
        .split_once('/')
        .is_some_and(|(top, sub)| top.eq_ignore_ascii_case("image") && !sub.is_empty())
}

/// Decode a user upload, rejecting files the browser did not flag as images.
///
/// # Errors
///
/// `DecodeError::NotAnImage` when `mime` is not `image/*`; callers drop
/// the upload without telling the user. Other errors come from
/// [`decode_image`].
pub fn decode_upload(bytes: &[u8], mime: &str) -> Result<RgbaImage, DecodeError> {
    if !is_image_mime(mime) {
        return Err(DecodeError::NotAnImage {
            mime: mime.to_string(),
        });
    }
    decode_image(bytes)
}

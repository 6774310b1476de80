//! WASM-compatible wrapper types for exported images.
//!
//! This module provides JavaScript-friendly types that wrap the core Stickerlay
//! types, handling the conversion between Rust and JavaScript representations.

use stickerlay_core::export::ExportedImage;
use wasm_bindgen::prelude::*;

/// A finished composite for JavaScript.
///
/// # Memory Management
///
/// The PNG bytes live in WASM memory. `png()` copies them into a JavaScript
/// `Uint8Array`, ready to be wrapped in a `Blob` for download.
#[wasm_bindgen]
pub struct JsExportedImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

#[wasm_bindgen]
impl JsExportedImage {
    /// Output width in pixels (the background's native width)
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels (the background's native height)
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.png.len()
    }

    /// Returns the encoded PNG as a Uint8Array copy.
    pub fn png(&self) -> Vec<u8> {
        self.png.clone()
    }

    /// `data:image/png;base64,...` for previews on mobile browsers.
    pub fn data_url(&self) -> String {
        stickerlay_core::png_data_url(&self.png)
    }
}

impl From<ExportedImage> for JsExportedImage {
    fn from(image: ExportedImage) -> Self {
        Self {
            width: image.width,
            height: image.height,
            png: image.png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickerlay_core::encode::PNG_SIGNATURE;

    #[test]
    fn test_from_exported_image() {
        let exported = ExportedImage {
            png: PNG_SIGNATURE.to_vec(),
            width: 640,
            height: 480,
        };
        let js = JsExportedImage::from(exported);
        assert_eq!(js.width(), 640);
        assert_eq!(js.height(), 480);
        assert_eq!(js.byte_length(), 8);
        assert_eq!(js.png(), PNG_SIGNATURE.to_vec());
    }

    #[test]
    fn test_data_url() {
        let js = JsExportedImage::from(ExportedImage {
            png: PNG_SIGNATURE.to_vec(),
            width: 1,
            height: 1,
        });
        assert_eq!(js.data_url(), "data:image/png;base64,iVBORw0KGgo=");
    }
}

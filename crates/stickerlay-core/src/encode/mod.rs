//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding the composite to lossless PNG
//! - Wrapping PNG bytes in a `data:` URL for the mobile preview page
//!
//! # Examples
//!
//! ```ignore
//! use stickerlay_core::encode::encode_png;
//!
//! let img = image::RgbaImage::new(100, 100);
//! let png = encode_png(&img).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod png;

pub use png::{encode_png, encode_png_rgba, png_data_url, EncodeError, PNG_SIGNATURE};

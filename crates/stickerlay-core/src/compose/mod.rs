//! Flattening background, sticker and watermark into one raster.
//!
//! # Draw Order
//!
//! 1. Background at its native resolution
//! 2. Sticker, translated to the projected center, rotated, then drawn
//!    centered at the projected size
//! 3. Watermark in the bottom-right corner at fixed opacity
//!
//! The output always has the background's dimensions.

mod blend;
mod overlay;
mod watermark;

use image::RgbaImage;
use thiserror::Error;

use crate::config::WatermarkConfig;
use crate::decode::AssetKind;
use crate::projection::OverlayPlacement;

pub use overlay::draw_overlay;
pub use watermark::{draw_watermark, watermark_rect, WatermarkRect};

/// Errors that stop a composite from being drawn.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// One of the inputs has no pixels, so there is nothing to draw on or with.
    #[error("Cannot draw with an empty {0} image")]
    EmptyImage(AssetKind),
}

/// Render the final composite.
///
/// # Errors
///
/// Returns `ComposeError::EmptyImage` when any input has a zero dimension.
pub fn composite(
    background: &RgbaImage,
    overlay: &RgbaImage,
    watermark: &RgbaImage,
    placement: &OverlayPlacement,
    watermark_config: &WatermarkConfig,
) -> Result<RgbaImage, ComposeError> {
    for (kind, image) in [
        (AssetKind::Background, background),
        (AssetKind::Overlay, overlay),
        (AssetKind::Watermark, watermark),
    ] {
        if image.width() == 0 || image.height() == 0 {
            return Err(ComposeError::EmptyImage(kind));
        }
    }

    let mut canvas = background.clone();
    draw_overlay(&mut canvas, overlay, placement);
    draw_watermark(&mut canvas, watermark, watermark_config);
    Ok(canvas)
}

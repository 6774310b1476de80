//! Drawing the rotated, scaled sticker onto the canvas.
//!
//! # Algorithm
//!
//! A sticker larger than its drawn edge is first downscaled so bilinear
//! sampling does not alias; a smaller one is sampled as-is, so memory stays
//! bounded by the source image however large the placement gets. The
//! rotation then uses inverse mapping: for each canvas
//! pixel inside the rotated square's bounding box, rotate back into the
//! sticker's local frame and sample there.
//!
//! For a clockwise rotation θ about the center `(cx, cy)` (y down):
//! ```text
//! u =  (x - cx) * cos θ + (y - cy) * sin θ
//! v = -(x - cx) * sin θ + (y - cy) * cos θ
//! ```
//! `(u, v)` inside `[-size/2, size/2]²` lands on the sticker.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::projection::OverlayPlacement;

use super::blend::{blend_over, sample_bilinear};

/// Draw `overlay` onto `canvas` at `placement`.
///
/// The overlay is stretched to a `placement.size` square, matching a canvas
/// `drawImage(img, -s/2, -s/2, s, s)` after translate and rotate. Parts that
/// fall outside the canvas are clipped.
pub fn draw_overlay(canvas: &mut RgbaImage, overlay: &RgbaImage, placement: &OverlayPlacement) {
    let size = placement.size;
    if !(size.is_finite() && size > 0.0) || overlay.width() == 0 || overlay.height() == 0 {
        return;
    }
    let (canvas_w, canvas_h) = canvas.dimensions();
    if canvas_w == 0 || canvas_h == 0 {
        return;
    }

    // Saturating cast: huge placements just skip the downscale
    let edge = (size.round() as u32).max(1);
    let (src_w, src_h) = overlay.dimensions();
    let target = (edge.min(src_w), edge.min(src_h));
    let resized;
    let texture = if target == (src_w, src_h) {
        overlay
    } else {
        resized = imageops::resize(overlay, target.0, target.1, FilterType::Triangle);
        &resized
    };
    let texels_x = texture.width() as f64 / size;
    let texels_y = texture.height() as f64 / size;

    let angle = placement.rotation_radians();
    let (sin, cos) = angle.sin_cos();
    let half = size / 2.0;
    let (cx, cy) = (placement.center.x, placement.center.y);

    // Bounding box of the rotated square, clipped to the canvas
    let extent = half * (cos.abs() + sin.abs());
    let x_start = (cx - extent).floor().max(0.0) as u32;
    let y_start = (cy - extent).floor().max(0.0) as u32;
    let x_end = (cx + extent).ceil().min(canvas_w as f64).max(0.0) as u32;
    let y_end = (cy + extent).ceil().min(canvas_h as f64).max(0.0) as u32;

    for py in y_start..y_end {
        for px in x_start..x_end {
            // Sample at pixel centers
            let dx = px as f64 + 0.5 - cx;
            let dy = py as f64 + 0.5 - cy;

            let u = dx * cos + dy * sin + half;
            let v = -dx * sin + dy * cos + half;
            if u < 0.0 || v < 0.0 || u > size || v > size {
                continue;
            }

            let src = sample_bilinear(texture, u * texels_x - 0.5, v * texels_y - 0.5);
            blend_over(canvas.get_pixel_mut(px, py), src, 1.0);
        }
    }
}

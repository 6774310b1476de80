//! Fixed bottom-right watermark.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::config::WatermarkConfig;

use super::blend::{blend_over, premultiplied};

/// Where the watermark lands on the output canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Compute the watermark rectangle for a canvas.
///
/// Width is `size_ratio` of the canvas' smaller side, height follows the
/// watermark's aspect ratio, and the rectangle sits `margin_ratio` of the
/// smaller side away from the bottom and right edges.
pub fn watermark_rect(
    canvas: (u32, u32),
    watermark: (u32, u32),
    config: &WatermarkConfig,
) -> WatermarkRect {
    let (canvas_w, canvas_h) = canvas;
    let (mark_w, mark_h) = watermark;
    let min_side = canvas_w.min(canvas_h) as f64;

    let width = (min_side * config.size_ratio).round().max(1.0);
    let height = if mark_w == 0 {
        width
    } else {
        (width * mark_h as f64 / mark_w as f64).round().max(1.0)
    };
    let margin = (min_side * config.margin_ratio).round();

    WatermarkRect {
        x: canvas_w as i64 - width as i64 - margin as i64,
        y: canvas_h as i64 - height as i64 - margin as i64,
        width: width as u32,
        height: height as u32,
    }
}

/// Blend the watermark into the bottom-right corner at the configured opacity.
pub fn draw_watermark(canvas: &mut RgbaImage, watermark: &RgbaImage, config: &WatermarkConfig) {
    if watermark.width() == 0 || watermark.height() == 0 {
        return;
    }
    let opacity = config.opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return;
    }

    let rect = watermark_rect(canvas.dimensions(), watermark.dimensions(), config);
    let scaled = imageops::resize(watermark, rect.width, rect.height, FilterType::Lanczos3);
    let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);

    for (mx, my, pixel) in scaled.enumerate_pixels() {
        let x = rect.x + mx as i64;
        let y = rect.y + my as i64;
        if x < 0 || y < 0 || x >= canvas_w || y >= canvas_h {
            continue;
        }
        blend_over(
            canvas.get_pixel_mut(x as u32, y as u32),
            premultiplied(pixel),
            opacity,
        );
    }
}

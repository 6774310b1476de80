//! Pixel sampling and alpha blending.
//!
//! Sampling works on premultiplied alpha so that transparent texels do not
//! bleed their (meaningless) color into neighbours during interpolation.

use image::{Rgba, RgbaImage};

/// A premultiplied RGBA color with channels in `[0, 1]`.
pub(crate) type Premul = [f32; 4];

/// Premultiplied form of a straight RGBA pixel.
#[inline]
pub(crate) fn premultiplied(pixel: &Rgba<u8>) -> Premul {
    let a = pixel[3] as f32 / 255.0;
    [
        pixel[0] as f32 / 255.0 * a,
        pixel[1] as f32 / 255.0 * a,
        pixel[2] as f32 / 255.0 * a,
        a,
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// Coordinates are in source pixel space with pixel centers on integers.
/// Coordinates outside the image are clamped to the edge texels.
pub(crate) fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Premul {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return [0.0; 4];
    }

    let x = x.clamp(0.0, (w - 1) as f64);
    let y = y.clamp(0.0, (h - 1) as f64);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    // Fractional distances
    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let p00 = premultiplied(image.get_pixel(x0, y0));
    let p10 = premultiplied(image.get_pixel(x1, y0));
    let p01 = premultiplied(image.get_pixel(x0, y1));
    let p11 = premultiplied(image.get_pixel(x1, y1));

    let mut result = [0.0f32; 4];
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    result
}

/// Composite a premultiplied source over `dst` ("source-over"), scaling the
/// source by `opacity`.
pub(crate) fn blend_over(dst: &mut Rgba<u8>, src: Premul, opacity: f32) {
    let sa = src[3] * opacity;
    if sa <= 0.0 {
        return;
    }
    let d = premultiplied(dst);
    let inv = 1.0 - sa;

    let out_a = sa + d[3] * inv;
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let premul = src[i] * opacity + d[i] * inv;
        out[i] = (premul / out_a * 255.0).clamp(0.0, 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;
    *dst = Rgba(out);
}

//! The overlay transform record.
//!
//! [`OverlayTransform`] is the only piece of long-lived editor state. Its
//! fields are private: every change goes through [`OverlayTransform::apply`],
//! which merges a [`TransformUpdate`] and re-establishes the invariants
//!
//! - `scale` lies in the configured [`ScaleBounds`] (default `[0.1, 10]`)
//! - `rotation` lies in `[0, 360)` degrees
//!
//! # Coordinate System
//!
//! - `x`/`y` are the overlay's top-left corner in display pixels
//! - Scaling and rotation happen about the overlay's center, like CSS
//!   `transform-origin: center`
//! - Positive rotation is clockwise on screen (y grows downward)

use serde::{Deserialize, Serialize};

use crate::config::ScaleBounds;
use crate::geometry::Point;

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize an angle difference in degrees to `(-180, 180]`.
///
/// Used for two-finger rotation so that crossing the ±180° seam of `atan2`
/// yields a small delta instead of a full turn.
pub fn normalize_delta(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let mut delta = degrees % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

/// Clamp a scale to the default `[0.1, 10]` range.
pub fn clamp_scale(scale: f64) -> f64 {
    ScaleBounds::default().clamp(scale)
}

/// A partial update to an [`OverlayTransform`]. `None` fields are left as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
}

impl TransformUpdate {
    pub fn translate_to(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Default::default()
        }
    }

    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn with_rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    pub fn scale_and_rotation(scale: f64, rotation: f64) -> Self {
        Self {
            scale: Some(scale),
            rotation: Some(rotation),
            ..Default::default()
        }
    }
}

/// Position, uniform scale and rotation of the overlay in display space.
///
/// Deserialized values go through [`OverlayTransform::apply`] with default
/// bounds, so a stored transform can never carry an out-of-range scale or an
/// unnormalized rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransformUpdate")]
pub struct OverlayTransform {
    x: f64,
    y: f64,
    scale: f64,
    rotation: f64,
    #[serde(skip)]
    bounds: ScaleBounds,
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            bounds: ScaleBounds::default(),
        }
    }
}

impl From<TransformUpdate> for OverlayTransform {
    fn from(update: TransformUpdate) -> Self {
        let mut transform = Self::new();
        transform.apply(update);
        transform
    }
}

impl OverlayTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity transform positioned at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        let mut transform = Self::default();
        transform.apply(TransformUpdate::translate_to(Point::new(x, y)));
        transform
    }

    /// Identity transform that clamps scale to custom bounds.
    pub fn with_bounds(bounds: ScaleBounds) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation in degrees, always in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    /// Merge a partial update, clamping scale and wrapping rotation.
    ///
    /// Non-finite values are dropped field by field so a bad event sample
    /// can never poison the record.
    pub fn apply(&mut self, update: TransformUpdate) {
        if let Some(x) = update.x.filter(|v| v.is_finite()) {
            self.x = x;
        }
        if let Some(y) = update.y.filter(|v| v.is_finite()) {
            self.y = y;
        }
        if let Some(scale) = update.scale.filter(|v| v.is_finite()) {
            self.scale = self.bounds.clamp(scale);
        }
        if let Some(rotation) = update.rotation.filter(|v| v.is_finite()) {
            self.rotation = normalize_rotation(rotation);
        }
    }

    /// Display-space center for an overlay with the given unscaled footprint.
    ///
    /// Scaling and rotation are about the center, so the center depends only
    /// on the origin and footprint.
    pub fn center(&self, footprint: f64) -> Point {
        Point::new(self.x + footprint / 2.0, self.y + footprint / 2.0)
    }

    /// CSS `transform` value that renders the overlay at display scale.
    ///
    /// The element is expected to be `footprint` pixels square, absolutely
    /// positioned at the container's top-left with `transform-origin: center`.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}deg) scale({})",
            self.x, self.y, self.rotation, self.scale
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_rotation_always_in_range(deg in -1.0e6f64..1.0e6) {
            let r = normalize_rotation(deg);
            prop_assert!((0.0..360.0).contains(&r), "rotation {} out of range", r);
        }

        #[test]
        fn prop_delta_always_in_half_open_range(deg in -1.0e6f64..1.0e6) {
            let d = normalize_delta(deg);
            prop_assert!(d > -180.0 && d <= 180.0, "delta {} out of range", d);
        }

        #[test]
        fn prop_apply_keeps_invariants(scale in -100.0f64..100.0, rotation in -5000.0f64..5000.0) {
            let mut t = OverlayTransform::new();
            t.apply(TransformUpdate::scale_and_rotation(scale, rotation));
            prop_assert!((0.1..=10.0).contains(&t.scale()));
            prop_assert!((0.0..360.0).contains(&t.rotation()));
        }
    }
}

//! Projection from display space to original image space.
//!
//! The background is shown in its container with a "cover" fit: scaled
//! uniformly until it fills the container, with the overflow cropped equally
//! on both sides of the long axis. The overlay transform lives in container
//! (display) pixels; export needs it in the background's native pixels.
//!
//! # Algorithm
//!
//! ```text
//! image aspect > container aspect  (height-fit, crop left/right)
//!   displayed_h = container_h
//!   displayed_w = container_h * image_aspect
//!   offset      = ((displayed_w - container_w) / 2, 0)
//! otherwise                         (width-fit, crop top/bottom)
//!   displayed_w = container_w
//!   displayed_h = container_w / image_aspect
//!   offset      = (0, (displayed_h - container_h) / 2)
//!
//! factor      = natural / displayed           (per axis)
//! center_orig = (center_display + offset) * factor
//! size_orig   = footprint * scale * factor_x
//! ```

use thiserror::Error;

use crate::geometry::{Point, Size};
use crate::transform::OverlayTransform;

/// Errors from projecting a transform.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// A size was zero, negative or not finite.
    #[error("Invalid dimensions for {what}: {width}x{height}")]
    InvalidDimensions {
        what: &'static str,
        width: f64,
        height: f64,
    },

    /// The overlay footprint was zero, negative or not finite.
    #[error("Invalid overlay footprint: {0}")]
    InvalidFootprint(f64),
}

/// Result of fitting the background into its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Size of the scaled background before cropping, in display pixels.
    pub displayed: Size,
    /// Amount cropped off the left/top edge, in display pixels.
    pub offset: Point,
    /// Original pixels per displayed pixel, horizontally.
    pub scale_x: f64,
    /// Original pixels per displayed pixel, vertically.
    pub scale_y: f64,
}

impl CoverFit {
    /// Fit an image of `natural` size into `container` with cover semantics.
    pub fn compute(natural: Size, container: Size) -> Result<Self, ProjectionError> {
        if !natural.is_drawable() {
            return Err(ProjectionError::InvalidDimensions {
                what: "background",
                width: natural.width,
                height: natural.height,
            });
        }
        if !container.is_drawable() {
            return Err(ProjectionError::InvalidDimensions {
                what: "container",
                width: container.width,
                height: container.height,
            });
        }

        let image_aspect = natural.aspect_ratio();
        let (displayed, offset) = if image_aspect > container.aspect_ratio() {
            let displayed = Size::new(container.height * image_aspect, container.height);
            let offset = Point::new((displayed.width - container.width) / 2.0, 0.0);
            (displayed, offset)
        } else {
            let displayed = Size::new(container.width, container.width / image_aspect);
            let offset = Point::new(0.0, (displayed.height - container.height) / 2.0);
            (displayed, offset)
        };

        Ok(Self {
            displayed,
            offset,
            scale_x: natural.width / displayed.width,
            scale_y: natural.height / displayed.height,
        })
    }

    /// Map a container-space point to original image pixels.
    pub fn to_original(&self, point: Point) -> Point {
        Point::new(
            (point.x + self.offset.x) * self.scale_x,
            (point.y + self.offset.y) * self.scale_y,
        )
    }
}

/// Overlay placement in original image pixels, ready to rasterize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    /// Center of the overlay.
    pub center: Point,
    /// Edge length of the (square) overlay.
    pub size: f64,
    /// Clockwise rotation in degrees, `[0, 360)`.
    pub rotation: f64,
}

impl OverlayPlacement {
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }
}

/// Project a display-space transform onto the background's native pixels.
///
/// # Arguments
///
/// * `transform` - Overlay transform in container pixels
/// * `natural` - Background size in its own pixels
/// * `container` - Rendered container size in display pixels
/// * `footprint` - Unscaled on-screen overlay edge length
pub fn project_overlay(
    transform: &OverlayTransform,
    natural: Size,
    container: Size,
    footprint: f64,
) -> Result<OverlayPlacement, ProjectionError> {
    if !(footprint.is_finite() && footprint > 0.0) {
        return Err(ProjectionError::InvalidFootprint(footprint));
    }
    let fit = CoverFit::compute(natural, container)?;

    Ok(OverlayPlacement {
        center: fit.to_original(transform.center(footprint)),
        size: footprint * transform.scale() * fit.scale_x,
        rotation: transform.rotation(),
    })
}

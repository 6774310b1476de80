//! Discrete controls: step buttons, wheel scaling and press-and-hold rotation.
//!
//! Like the gesture interpreter these helpers only compute
//! [`TransformUpdate`]s; the caller applies them.

use serde::{Deserialize, Serialize};

use crate::transform::{OverlayTransform, TransformUpdate};

/// Which way a step button pushes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    Increase,
    Decrease,
}

impl StepDirection {
    pub fn sign(self) -> f64 {
        match self {
            StepDirection::Increase => 1.0,
            StepDirection::Decrease => -1.0,
        }
    }

    /// `Increase` for positive values, `Decrease` for negative, `None` for zero/NaN.
    pub fn from_sign(value: f64) -> Option<Self> {
        if value > 0.0 {
            Some(StepDirection::Increase)
        } else if value < 0.0 {
            Some(StepDirection::Decrease)
        } else {
            None
        }
    }
}

/// Rotate by one `step` (degrees) in `direction`. Wrapping happens on apply.
pub fn rotate_step(
    transform: &OverlayTransform,
    direction: StepDirection,
    step: f64,
) -> TransformUpdate {
    TransformUpdate::with_rotation(transform.rotation() + direction.sign() * step)
}

/// Scale by one `step` in `direction`. Clamping happens on apply.
pub fn scale_step(
    transform: &OverlayTransform,
    direction: StepDirection,
    step: f64,
) -> TransformUpdate {
    TransformUpdate::with_scale(transform.scale() + direction.sign() * step)
}

/// One wheel tick. Wheel up (negative `delta_y`) grows the overlay.
pub fn wheel_step(transform: &OverlayTransform, delta_y: f64, step: f64) -> Option<TransformUpdate> {
    let direction = match StepDirection::from_sign(delta_y)? {
        StepDirection::Increase => StepDirection::Decrease,
        StepDirection::Decrease => StepDirection::Increase,
    };
    Some(scale_step(transform, direction, step))
}

/// Press-and-hold repeater for continuous rotation.
///
/// The first step is taken by the caller on press; afterwards every whole
/// `interval_ms` that passes yields one more step until the repeater is
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldRepeat {
    direction: StepDirection,
    interval_ms: f64,
    last_tick_ms: f64,
}

impl HoldRepeat {
    pub fn start(direction: StepDirection, interval_ms: u32, now_ms: f64) -> Self {
        Self {
            direction,
            interval_ms: f64::from(interval_ms.max(1)),
            last_tick_ms: now_ms,
        }
    }

    pub fn direction(&self) -> StepDirection {
        self.direction
    }

    /// Number of steps due at `now_ms`. Consumes them.
    ///
    /// A clock that runs backwards yields zero steps.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let elapsed = now_ms - self.last_tick_ms;
        if elapsed.is_nan() || elapsed < self.interval_ms {
            return 0;
        }
        let steps = (elapsed / self.interval_ms).floor();
        self.last_tick_ms += steps * self.interval_ms;
        steps as u32
    }
}

//! Editor and export configuration.
//!
//! A single [`ComposerConfig`] carries every tunable constant used by the
//! gesture interpreter, the discrete controls and the compositor. The defaults
//! match the shipped sticker page; the host page may override any subset of
//! fields by passing a partial object (missing fields fall back to defaults).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed on-screen edge length of the overlay before scaling, in display pixels.
pub const DEFAULT_FOOTPRINT: f64 = 96.0;

/// Smallest allowed overlay scale.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed overlay scale.
pub const MAX_SCALE: f64 = 10.0;

/// Degrees added per rotate button click or hold tick.
pub const DEFAULT_ROTATION_STEP: f64 = 1.0;

/// Scale added per scale button click.
pub const DEFAULT_SCALE_STEP: f64 = 0.2;

/// Scale added per wheel tick.
pub const DEFAULT_WHEEL_STEP: f64 = 0.1;

/// Interval between press-and-hold rotation ticks.
pub const DEFAULT_HOLD_INTERVAL_MS: u32 = 50;

/// Delay before a touch turns into a drag under [`TouchPolicy::LongPress`].
pub const DEFAULT_LONG_PRESS_MS: u32 = 500;

/// Inclusive bounds for the overlay scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
        }
    }
}

impl ScaleBounds {
    /// Clamp a scale into the bounds. Non-finite values collapse to `min`.
    ///
    /// Never panics, even for inverted bounds; `max` wins in that case.
    pub fn clamp(self, scale: f64) -> f64 {
        if !scale.is_finite() {
            return self.min;
        }
        scale.max(self.min).min(self.max)
    }

    fn validate(self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min) || !positive(self.max) || self.min > self.max {
            return Err(ConfigError::InvalidScaleBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// A configuration value the editor cannot work with.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid scale bounds: min {min}, max {max} (need 0 < min <= max)")]
    InvalidScaleBounds { min: f64, max: f64 },

    #[error("Invalid overlay footprint: {0} (must be positive)")]
    InvalidFootprint(f64),

    #[error("Invalid {field}: {value}")]
    InvalidStep { field: &'static str, value: f64 },

    #[error("Invalid watermark {field}: {value}")]
    InvalidWatermark { field: &'static str, value: f64 },
}

/// How a single touch turns into a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TouchPolicy {
    /// The overlay follows the finger as soon as it lands.
    #[default]
    Immediate,
    /// The finger must rest for `delay_ms` before dragging starts.
    LongPress { delay_ms: u32 },
}

impl TouchPolicy {
    /// Long-press policy with the default 500 ms gate.
    pub fn long_press() -> Self {
        TouchPolicy::LongPress {
            delay_ms: DEFAULT_LONG_PRESS_MS,
        }
    }
}

/// Watermark placement in the exported image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Watermark width as a fraction of the smaller output dimension.
    pub size_ratio: f64,
    /// Margin from the bottom-right corner as a fraction of the smaller output dimension.
    pub margin_ratio: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            size_ratio: 0.15,
            margin_ratio: 0.02,
            opacity: 0.8,
        }
    }
}

/// Complete configuration for a sticker editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Unscaled overlay edge length in display pixels.
    pub footprint: f64,
    pub scale_bounds: ScaleBounds,
    pub rotation_step: f64,
    pub scale_step: f64,
    pub wheel_step: f64,
    pub hold_interval_ms: u32,
    pub touch_policy: TouchPolicy,
    pub watermark: WatermarkConfig,
    /// File name suggested for desktop downloads.
    pub file_name: String,
}

impl ComposerConfig {
    /// Check values that would break the session or the export.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.footprint.is_finite() && self.footprint > 0.0) {
            return Err(ConfigError::InvalidFootprint(self.footprint));
        }
        self.scale_bounds.validate()?;

        for (field, value) in [
            ("rotation step", self.rotation_step),
            ("scale step", self.scale_step),
            ("wheel step", self.wheel_step),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidStep { field, value });
            }
        }

        let watermark = &self.watermark;
        let opacity = f64::from(watermark.opacity);
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::InvalidWatermark {
                field: "opacity",
                value: opacity,
            });
        }
        for (field, value) in [
            ("size ratio", watermark.size_ratio),
            ("margin ratio", watermark.margin_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidWatermark { field, value });
            }
        }
        Ok(())
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            footprint: DEFAULT_FOOTPRINT,
            scale_bounds: ScaleBounds::default(),
            rotation_step: DEFAULT_ROTATION_STEP,
            scale_step: DEFAULT_SCALE_STEP,
            wheel_step: DEFAULT_WHEEL_STEP,
            hold_interval_ms: DEFAULT_HOLD_INTERVAL_MS,
            touch_policy: TouchPolicy::default(),
            watermark: WatermarkConfig::default(),
            file_name: "sticker-photo.png".to_string(),
        }
    }
}

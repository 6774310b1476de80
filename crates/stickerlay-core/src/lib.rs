//! Stickerlay Core - Sticker overlay editing library
//!
//! This crate provides the core functionality for Stickerlay: turning pointer,
//! wheel and button input into an overlay transform, projecting that
//! transform from the on-screen preview onto the full-resolution photo, and
//! rendering the flattened PNG with a corner watermark.
//!
//! The crate has no browser dependencies. Timers, DOM events and delivery of
//! the exported file are handled by the `stickerlay-wasm` bindings.

pub mod assets;
pub mod compose;
pub mod config;
pub mod controls;
pub mod decode;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod gesture;
pub mod projection;
pub mod session;
pub mod transform;

pub use assets::{AssetSet, ReadyAssets};
pub use config::{ComposerConfig, ConfigError, ScaleBounds, TouchPolicy, WatermarkConfig};
pub use controls::{HoldRepeat, StepDirection};
pub use decode::{decode_image, decode_upload, is_image_mime, AssetKind, DecodeError};
pub use encode::{encode_png, png_data_url, EncodeError};
pub use export::{export_composite, Delivery, ExportError, ExportedImage};
pub use geometry::{Point, Size};
pub use gesture::{GestureEvent, GestureInterpreter, GesturePhase, PointerKind, PointerSample};
pub use projection::{project_overlay, CoverFit, OverlayPlacement, ProjectionError};
pub use session::StickerSession;
pub use transform::{clamp_scale, normalize_delta, normalize_rotation, OverlayTransform, TransformUpdate};

//! Gesture interpretation: turning pointer streams into transform updates.
//!
//! The interpreter is a small state machine driven by how many pointers are
//! down:
//!
//! ```text
//!            down (mouse/pen, or touch + Immediate)
//!   Idle ───────────────────────────────────────────▶ Dragging
//!    │  down (touch + LongPress)                        ▲  │
//!    └──────────▶ Pending ──── tick past delay ─────────┘  │ second down
//!                    │ second down                         ▼
//!                    └────────────────────────────────▶ Pinching
//!
//!   Pinching ── one pointer up ──▶ Dragging (re-anchored on the survivor)
//!   any      ── last pointer up ─▶ Idle
//! ```
//!
//! The interpreter never mutates the transform itself. It reads the current
//! [`OverlayTransform`](crate::transform::OverlayTransform) and returns a
//! [`TransformUpdate`](crate::transform::TransformUpdate) for the caller to
//! apply, so every change still flows through the single setter.

mod interpreter;
mod pointer;

pub use interpreter::{GestureInterpreter, GesturePhase};
pub use pointer::{GestureEvent, PointerKind, PointerSample};

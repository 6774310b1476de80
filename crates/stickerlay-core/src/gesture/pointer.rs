//! Pointer samples and the events fed to the gesture interpreter.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Input device behind a pointer, mirroring the DOM `pointerType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Parse a DOM `pointerType` string. Unknown values are treated as mouse.
    pub fn from_dom(value: &str) -> Self {
        match value {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

/// One pointer position in display space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Raw input consumed by [`super::GestureInterpreter::handle`].
///
/// Timestamps are milliseconds on any monotonic clock (the browser passes
/// `performance.now()`); only differences between them matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Down {
        sample: PointerSample,
        kind: PointerKind,
        at_ms: f64,
    },
    Move {
        sample: PointerSample,
    },
    Up {
        id: i32,
    },
    /// The platform took the pointer away (scroll, focus loss, `pointerleave`).
    Cancel {
        id: i32,
    },
    /// Clock tick used to release a pending long-press.
    Tick {
        at_ms: f64,
    },
}

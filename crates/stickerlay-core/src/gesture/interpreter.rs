//! The gesture state machine.

use crate::config::{ScaleBounds, TouchPolicy};
use crate::geometry::Point;
use crate::transform::{normalize_delta, normalize_rotation, OverlayTransform, TransformUpdate};

use super::pointer::{GestureEvent, PointerKind, PointerSample};

/// Finger spreads below this distance cannot define a pinch ratio.
const MIN_PINCH_DISTANCE: f64 = 1e-6;

/// Coarse view of the interpreter state, for UI feedback and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Pending,
    Dragging,
    Pinching,
}

/// Snapshot taken when the second pointer lands.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchAnchor {
    first_id: i32,
    second_id: i32,
    initial_distance: f64,
    initial_angle: f64,
    initial_scale: f64,
    initial_rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    Idle,
    /// A touch is resting, waiting for the long-press gate.
    Pending {
        pointer: PointerSample,
        deadline_ms: f64,
    },
    Dragging {
        pointer_id: i32,
        /// Pointer position minus overlay origin at the moment of anchoring.
        offset: Point,
    },
    Pinching(PinchAnchor),
}

impl GestureState {
    fn phase(&self) -> GesturePhase {
        match self {
            GestureState::Idle => GesturePhase::Idle,
            GestureState::Pending { .. } => GesturePhase::Pending,
            GestureState::Dragging { .. } => GesturePhase::Dragging,
            GestureState::Pinching(_) => GesturePhase::Pinching,
        }
    }
}

/// Converts pointer events into [`TransformUpdate`]s.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    policy: TouchPolicy,
    bounds: ScaleBounds,
    /// Tracked pointers in landing order. Never more than two.
    pointers: Vec<PointerSample>,
    state: GestureState,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(TouchPolicy::default(), ScaleBounds::default())
    }
}

impl GestureInterpreter {
    pub fn new(policy: TouchPolicy, bounds: ScaleBounds) -> Self {
        Self {
            policy,
            bounds,
            pointers: Vec::with_capacity(2),
            state: GestureState::Idle,
        }
    }

    pub fn policy(&self) -> TouchPolicy {
        self.policy
    }

    /// Change the touch policy. Takes effect on the next pointer down.
    pub fn set_policy(&mut self, policy: TouchPolicy) {
        self.policy = policy;
    }

    pub fn phase(&self) -> GesturePhase {
        self.state.phase()
    }

    /// Number of pointers currently tracked (0, 1 or 2).
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// When a pending long-press will turn into a drag, if one is pending.
    pub fn pending_deadline(&self) -> Option<f64> {
        match self.state {
            GestureState::Pending { deadline_ms, .. } => Some(deadline_ms),
            _ => None,
        }
    }

    /// Drop every pointer and accumulator.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.transition(GestureState::Idle);
    }

    /// Feed one event. Returns the update to apply to `transform`, if any.
    pub fn handle(
        &mut self,
        event: GestureEvent,
        transform: &OverlayTransform,
    ) -> Option<TransformUpdate> {
        match event {
            GestureEvent::Down {
                sample,
                kind,
                at_ms,
            } => {
                self.pointer_down(sample, kind, at_ms, transform);
                None
            }
            GestureEvent::Move { sample } => self.pointer_move(sample),
            GestureEvent::Up { id } | GestureEvent::Cancel { id } => {
                self.pointer_up(id, transform);
                None
            }
            GestureEvent::Tick { at_ms } => {
                self.tick(at_ms, transform);
                None
            }
        }
    }

    fn pointer_down(
        &mut self,
        sample: PointerSample,
        kind: PointerKind,
        at_ms: f64,
        transform: &OverlayTransform,
    ) {
        if self.pointers.iter().any(|p| p.id == sample.id) || self.pointers.len() >= 2 {
            return;
        }
        self.pointers.push(sample);

        match self.pointers.len() {
            1 => match (kind, self.policy) {
                (PointerKind::Touch, TouchPolicy::LongPress { delay_ms }) => {
                    self.transition(GestureState::Pending {
                        pointer: sample,
                        deadline_ms: at_ms + f64::from(delay_ms),
                    });
                }
                _ => self.anchor_drag(sample, transform),
            },
            _ => self.anchor_pinch(transform),
        }
    }

    fn pointer_move(&mut self, sample: PointerSample) -> Option<TransformUpdate> {
        let tracked = self.pointers.iter_mut().find(|p| p.id == sample.id)?;
        *tracked = sample;

        match self.state {
            GestureState::Idle => None,
            GestureState::Pending {
                pointer,
                deadline_ms,
            } => {
                if pointer.id == sample.id {
                    self.state = GestureState::Pending {
                        pointer: sample,
                        deadline_ms,
                    };
                }
                None
            }
            GestureState::Dragging { pointer_id, offset } => {
                if pointer_id != sample.id {
                    return None;
                }
                let origin = sample.position().offset_from(offset);
                Some(TransformUpdate::translate_to(origin))
            }
            GestureState::Pinching(anchor) => self.pinch_update(&anchor),
        }
    }

    fn pointer_up(&mut self, id: i32, transform: &OverlayTransform) {
        let Some(index) = self.pointers.iter().position(|p| p.id == id) else {
            return;
        };
        self.pointers.remove(index);

        match self.pointers.first().copied() {
            None => self.transition(GestureState::Idle),
            Some(survivor) => match self.state {
                // Re-anchor on the remaining finger so the overlay stays put
                GestureState::Pinching(_) => self.anchor_drag(survivor, transform),
                GestureState::Dragging { pointer_id, .. } if pointer_id != survivor.id => {
                    self.anchor_drag(survivor, transform)
                }
                _ => {}
            },
        }
    }

    fn tick(&mut self, at_ms: f64, transform: &OverlayTransform) {
        if let GestureState::Pending {
            pointer,
            deadline_ms,
        } = self.state
        {
            if at_ms >= deadline_ms {
                self.anchor_drag(pointer, transform);
            }
        }
    }

    fn anchor_drag(&mut self, sample: PointerSample, transform: &OverlayTransform) {
        self.transition(GestureState::Dragging {
            pointer_id: sample.id,
            offset: sample.position().offset_from(transform.origin()),
        });
    }

    fn anchor_pinch(&mut self, transform: &OverlayTransform) {
        let (first, second) = match self.pointers.as_slice() {
            [first, second] => (*first, *second),
            _ => return,
        };
        let (a, b) = (first.position(), second.position());
        self.transition(GestureState::Pinching(PinchAnchor {
            first_id: first.id,
            second_id: second.id,
            initial_distance: a.distance_to(b),
            initial_angle: a.angle_to(b),
            initial_scale: transform.scale(),
            initial_rotation: transform.rotation(),
        }));
    }

    fn pinch_update(&self, anchor: &PinchAnchor) -> Option<TransformUpdate> {
        let first = self.pointers.iter().find(|p| p.id == anchor.first_id)?;
        let second = self.pointers.iter().find(|p| p.id == anchor.second_id)?;
        let (a, b) = (first.position(), second.position());

        let scale = if anchor.initial_distance > MIN_PINCH_DISTANCE {
            self.bounds
                .clamp(anchor.initial_scale * (a.distance_to(b) / anchor.initial_distance))
        } else {
            anchor.initial_scale
        };
        let delta = normalize_delta(a.angle_to(b) - anchor.initial_angle);
        let rotation = normalize_rotation(anchor.initial_rotation + delta);

        Some(TransformUpdate::scale_and_rotation(scale, rotation))
    }

    fn transition(&mut self, next: GestureState) {
        let (from, to) = (self.state.phase(), next.phase());
        if from != to {
            tracing::debug!(?from, ?to, pointers = self.pointers.len(), "gesture phase change");
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: i32, x: f64, y: f64) -> GestureEvent {
        GestureEvent::Down {
            sample: PointerSample::new(id, x, y),
            kind: PointerKind::Touch,
            at_ms: 0.0,
        }
    }

    fn down_at(id: i32, x: f64, y: f64, at_ms: f64) -> GestureEvent {
        GestureEvent::Down {
            sample: PointerSample::new(id, x, y),
            kind: PointerKind::Touch,
            at_ms,
        }
    }

    fn mv(id: i32, x: f64, y: f64) -> GestureEvent {
        GestureEvent::Move {
            sample: PointerSample::new(id, x, y),
        }
    }

    /// Feed an event and apply the result, the way the session does.
    fn feed(g: &mut GestureInterpreter, t: &mut OverlayTransform, event: GestureEvent) {
        if let Some(update) = g.handle(event, t) {
            t.apply(update);
        }
    }

    #[test]
    fn test_single_pointer_drag_keeps_grab_offset() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::at(100.0, 100.0);

        feed(&mut g, &mut t, down(1, 120.0, 130.0));
        assert_eq!(g.phase(), GesturePhase::Dragging);

        feed(&mut g, &mut t, mv(1, 220.0, 80.0));
        assert_eq!(t.origin(), Point::new(200.0, 50.0));
    }

    #[test]
    fn test_mouse_drag_is_immediate_under_long_press() {
        let mut g = GestureInterpreter::new(TouchPolicy::long_press(), ScaleBounds::default());
        let mut t = OverlayTransform::new();

        let event = GestureEvent::Down {
            sample: PointerSample::new(1, 10.0, 10.0),
            kind: PointerKind::Mouse,
            at_ms: 0.0,
        };
        feed(&mut g, &mut t, event);
        assert_eq!(g.phase(), GesturePhase::Dragging);
    }

    #[test]
    fn test_long_press_gates_drag() {
        let mut g = GestureInterpreter::new(TouchPolicy::long_press(), ScaleBounds::default());
        let mut t = OverlayTransform::at(0.0, 0.0);

        feed(&mut g, &mut t, down_at(1, 10.0, 10.0, 1000.0));
        assert_eq!(g.phase(), GesturePhase::Pending);
        assert_eq!(g.pending_deadline(), Some(1500.0));

        // Moving before the gate does not move the overlay
        feed(&mut g, &mut t, mv(1, 40.0, 40.0));
        assert_eq!(t.origin(), Point::new(0.0, 0.0));

        feed(&mut g, &mut t, GestureEvent::Tick { at_ms: 1499.0 });
        assert_eq!(g.phase(), GesturePhase::Pending);

        feed(&mut g, &mut t, GestureEvent::Tick { at_ms: 1500.0 });
        assert_eq!(g.phase(), GesturePhase::Dragging);

        // Anchored at the finger's latest position: no jump, then follows
        assert_eq!(t.origin(), Point::new(0.0, 0.0));
        feed(&mut g, &mut t, mv(1, 50.0, 45.0));
        assert_eq!(t.origin(), Point::new(10.0, 5.0));
    }

    #[test]
    fn test_long_press_released_early_never_drags() {
        let mut g = GestureInterpreter::new(TouchPolicy::long_press(), ScaleBounds::default());
        let mut t = OverlayTransform::new();

        feed(&mut g, &mut t, down_at(1, 10.0, 10.0, 0.0));
        feed(&mut g, &mut t, GestureEvent::Up { id: 1 });
        assert_eq!(g.phase(), GesturePhase::Idle);
        feed(&mut g, &mut t, GestureEvent::Tick { at_ms: 10_000.0 });
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_second_touch_during_pending_pinches() {
        let mut g = GestureInterpreter::new(TouchPolicy::long_press(), ScaleBounds::default());
        let mut t = OverlayTransform::new();

        feed(&mut g, &mut t, down(1, 0.0, 0.0));
        feed(&mut g, &mut t, down(2, 100.0, 0.0));
        assert_eq!(g.phase(), GesturePhase::Pinching);
        assert_eq!(g.pending_deadline(), None);
    }

    #[test]
    fn test_pinch_scales_by_distance_ratio() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::new();
        t.apply(TransformUpdate::with_scale(1.5));

        feed(&mut g, &mut t, down(1, 100.0, 100.0));
        feed(&mut g, &mut t, down(2, 200.0, 100.0));
        feed(&mut g, &mut t, mv(2, 300.0, 100.0));

        assert!((t.scale() - 3.0).abs() < 1e-9);
        assert!(t.rotation().abs() < 1e-9);
    }

    #[test]
    fn test_pinch_does_not_translate() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::at(40.0, 60.0);

        feed(&mut g, &mut t, down(1, 100.0, 100.0));
        feed(&mut g, &mut t, down(2, 200.0, 100.0));
        feed(&mut g, &mut t, mv(1, 50.0, 150.0));
        feed(&mut g, &mut t, mv(2, 260.0, 20.0));

        assert_eq!(t.origin(), Point::new(40.0, 60.0));
    }

    #[test]
    fn test_pinch_scale_clamped() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::new();

        feed(&mut g, &mut t, down(1, 0.0, 0.0));
        feed(&mut g, &mut t, down(2, 10.0, 0.0));
        feed(&mut g, &mut t, mv(2, 10_000.0, 0.0));
        assert_eq!(t.scale(), 10.0);

        feed(&mut g, &mut t, mv(2, 0.001, 0.0));
        assert_eq!(t.scale(), 0.1);
    }

    #[test]
    fn test_pinch_rotation_crosses_seam_continuously() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::new();
        t.apply(TransformUpdate::with_rotation(10.0));

        // Second finger at 170° from the first
        let a = 170f64.to_radians();
        feed(&mut g, &mut t, down(1, 0.0, 0.0));
        feed(&mut g, &mut t, down(2, 100.0 * a.cos(), 100.0 * a.sin()));

        // Move it to -170°: a 20° clockwise turn
        let b = (-170f64).to_radians();
        feed(&mut g, &mut t, mv(2, 100.0 * b.cos(), 100.0 * b.sin()));

        assert!((t.rotation() - 30.0).abs() < 1e-9, "rotation {}", t.rotation());
    }

    #[test]
    fn test_pinch_rotation_wraps_below_zero() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::new();

        feed(&mut g, &mut t, down(1, 0.0, 0.0));
        feed(&mut g, &mut t, down(2, 100.0, 0.0));
        // Counter-clockwise quarter turn (y up on screen)
        feed(&mut g, &mut t, mv(2, 0.0, -100.0));

        assert!((t.rotation() - 270.0).abs() < 1e-9, "rotation {}", t.rotation());
    }

    #[test]
    fn test_degenerate_pinch_keeps_scale() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::new();
        t.apply(TransformUpdate::with_scale(2.0));

        feed(&mut g, &mut t, down(1, 50.0, 50.0));
        feed(&mut g, &mut t, down(2, 50.0, 50.0));
        feed(&mut g, &mut t, mv(2, 150.0, 50.0));

        assert_eq!(t.scale(), 2.0);
    }

    #[test]
    fn test_two_to_one_does_not_jump() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::at(100.0, 100.0);

        feed(&mut g, &mut t, down(1, 110.0, 110.0));
        feed(&mut g, &mut t, down(2, 210.0, 110.0));
        feed(&mut g, &mut t, mv(2, 260.0, 150.0));
        let before = t;

        // Lift the first finger; the second one keeps dragging
        feed(&mut g, &mut t, GestureEvent::Up { id: 1 });
        assert_eq!(g.phase(), GesturePhase::Dragging);
        assert_eq!(t, before);

        // A move to the same spot must not shift the overlay
        feed(&mut g, &mut t, mv(2, 260.0, 150.0));
        assert_eq!(t.origin(), before.origin());

        // Further movement translates by exactly the finger delta
        feed(&mut g, &mut t, mv(2, 270.0, 145.0));
        assert_eq!(t.origin(), Point::new(110.0, 95.0));
        assert_eq!(t.scale(), before.scale());
        assert_eq!(t.rotation(), before.rotation());
    }

    #[test]
    fn test_lifting_second_finger_re_anchors_on_first() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::at(0.0, 0.0);

        feed(&mut g, &mut t, down(1, 10.0, 10.0));
        feed(&mut g, &mut t, down(2, 50.0, 10.0));
        feed(&mut g, &mut t, GestureEvent::Up { id: 2 });
        assert_eq!(g.phase(), GesturePhase::Dragging);

        feed(&mut g, &mut t, mv(1, 15.0, 20.0));
        assert_eq!(t.origin(), Point::new(5.0, 10.0));
    }

    #[test]
    fn test_all_up_resets() {
        let mut g = GestureInterpreter::default();
        let t = OverlayTransform::new();

        g.handle(down(1, 0.0, 0.0), &t);
        g.handle(down(2, 10.0, 0.0), &t);
        g.handle(GestureEvent::Up { id: 1 }, &t);
        g.handle(GestureEvent::Cancel { id: 2 }, &t);

        assert_eq!(g.phase(), GesturePhase::Idle);
        assert_eq!(g.active_pointers(), 0);
    }

    #[test]
    fn test_third_pointer_ignored() {
        let mut g = GestureInterpreter::default();
        let mut t = OverlayTransform::new();

        feed(&mut g, &mut t, down(1, 0.0, 0.0));
        feed(&mut g, &mut t, down(2, 100.0, 0.0));
        feed(&mut g, &mut t, down(3, 500.0, 500.0));
        assert_eq!(g.active_pointers(), 2);

        feed(&mut g, &mut t, mv(3, 900.0, 900.0));
        assert_eq!(t.scale(), 1.0);

        // Lifting the ignored pointer changes nothing
        feed(&mut g, &mut t, GestureEvent::Up { id: 3 });
        assert_eq!(g.phase(), GesturePhase::Pinching);
    }

    #[test]
    fn test_move_of_unknown_pointer_ignored() {
        let mut g = GestureInterpreter::default();
        let t = OverlayTransform::new();
        assert!(g.handle(mv(9, 1.0, 1.0), &t).is_none());
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut g = GestureInterpreter::default();
        let t = OverlayTransform::new();
        g.handle(down(1, 0.0, 0.0), &t);
        g.reset();
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert_eq!(g.active_pointers(), 0);
    }
}

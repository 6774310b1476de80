//! One editing session: the transform plus everything that mutates it.
//!
//! Every input path (pointer gestures, step buttons, wheel, press-and-hold)
//! produces a [`TransformUpdate`] and funnels it through
//! [`OverlayTransform::apply`], so the scale and rotation invariants hold no
//! matter which control moved the overlay last.
//!
//! Each mutating method returns `true` when the transform actually changed,
//! so a binding can skip re-rendering on no-op events.

use crate::assets::AssetSet;
use crate::config::ComposerConfig;
use crate::controls::{self, HoldRepeat, StepDirection};
use crate::export::{export_composite, ExportError, ExportedImage};
use crate::geometry::{Point, Size};
use crate::gesture::{GestureEvent, GestureInterpreter, GesturePhase, PointerKind, PointerSample};
use crate::transform::{OverlayTransform, TransformUpdate};

#[derive(Debug, Clone)]
pub struct StickerSession {
    config: ComposerConfig,
    transform: OverlayTransform,
    gestures: GestureInterpreter,
    hold: Option<HoldRepeat>,
}

impl Default for StickerSession {
    fn default() -> Self {
        Self::new(ComposerConfig::default())
    }
}

impl StickerSession {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            transform: OverlayTransform::with_bounds(config.scale_bounds),
            gestures: GestureInterpreter::new(config.touch_policy, config.scale_bounds),
            hold: None,
            config,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn transform(&self) -> &OverlayTransform {
        &self.transform
    }

    pub fn phase(&self) -> GesturePhase {
        self.gestures.phase()
    }

    /// Deadline of a pending long-press, for scheduling the promotion timer.
    pub fn pending_deadline(&self) -> Option<f64> {
        self.gestures.pending_deadline()
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    /// Place the overlay in the middle of a container of the given size.
    pub fn center_in(&mut self, container: Size) -> bool {
        let footprint = self.config.footprint;
        let origin = Point::new(
            (container.width - footprint) / 2.0,
            (container.height - footprint) / 2.0,
        );
        self.apply(TransformUpdate::translate_to(origin))
    }

    /// CSS `transform` for the on-screen overlay element.
    pub fn css_transform(&self) -> String {
        self.transform.css_transform()
    }

    pub fn pointer_down(&mut self, sample: PointerSample, kind: PointerKind, at_ms: f64) -> bool {
        self.feed(GestureEvent::Down {
            sample,
            kind,
            at_ms,
        })
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> bool {
        self.feed(GestureEvent::Move { sample })
    }

    pub fn pointer_up(&mut self, id: i32) -> bool {
        self.feed(GestureEvent::Up { id })
    }

    pub fn pointer_cancel(&mut self, id: i32) -> bool {
        self.feed(GestureEvent::Cancel { id })
    }

    /// Clock tick; promotes a pending long-press once its delay has passed.
    pub fn tick(&mut self, at_ms: f64) -> bool {
        self.feed(GestureEvent::Tick { at_ms })
    }

    pub fn wheel(&mut self, delta_y: f64) -> bool {
        match controls::wheel_step(&self.transform, delta_y, self.config.wheel_step) {
            Some(update) => self.apply(update),
            None => false,
        }
    }

    pub fn rotate_step(&mut self, direction: StepDirection) -> bool {
        let update = controls::rotate_step(&self.transform, direction, self.config.rotation_step);
        self.apply(update)
    }

    pub fn scale_step(&mut self, direction: StepDirection) -> bool {
        let update = controls::scale_step(&self.transform, direction, self.config.scale_step);
        self.apply(update)
    }

    /// Begin press-and-hold rotation. The first step happens immediately.
    pub fn hold_start(&mut self, direction: StepDirection, now_ms: f64) -> bool {
        self.hold = Some(HoldRepeat::start(
            direction,
            self.config.hold_interval_ms,
            now_ms,
        ));
        self.rotate_step(direction)
    }

    /// Apply every rotation step that has come due since the last call.
    pub fn hold_advance(&mut self, now_ms: f64) -> bool {
        let Some(hold) = self.hold.as_mut() else {
            return false;
        };
        let steps = hold.advance(now_ms);
        let direction = hold.direction();

        let mut changed = false;
        for _ in 0..steps {
            changed |= self.rotate_step(direction);
        }
        changed
    }

    pub fn hold_stop(&mut self) {
        self.hold = None;
    }

    /// Forget in-flight gestures and any held button. The transform stays.
    pub fn reset_gestures(&mut self) {
        self.gestures.reset();
        self.hold = None;
    }

    /// Render the composite for the current transform.
    ///
    /// # Errors
    ///
    /// See [`export_composite`].
    pub fn export(&self, assets: &AssetSet, container: Size) -> Result<ExportedImage, ExportError> {
        export_composite(assets, &self.transform, container, &self.config)
    }

    fn feed(&mut self, event: GestureEvent) -> bool {
        match self.gestures.handle(event, &self.transform) {
            Some(update) => self.apply(update),
            None => false,
        }
    }

    fn apply(&mut self, update: TransformUpdate) -> bool {
        let before = self.transform;
        self.transform.apply(update);
        self.transform != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TouchPolicy;

    fn touch(id: i32, x: f64, y: f64) -> PointerSample {
        PointerSample::new(id, x, y)
    }

    #[test]
    fn test_center_in_container() {
        let mut session = StickerSession::default();
        assert!(session.center_in(Size::new(500.0, 500.0)));
        assert_eq!(session.transform().origin(), Point::new(202.0, 202.0));
        assert_eq!(session.transform().center(96.0), Point::new(250.0, 250.0));
    }

    #[test]
    fn test_drag_moves_overlay() {
        let mut session = StickerSession::default();
        assert!(!session.pointer_down(touch(1, 10.0, 10.0), PointerKind::Mouse, 0.0));
        assert!(session.pointer_move(touch(1, 40.0, 25.0)));
        assert_eq!(session.transform().origin(), Point::new(30.0, 15.0));

        session.pointer_up(1);
        assert_eq!(session.phase(), GesturePhase::Idle);
        assert!(!session.pointer_move(touch(1, 90.0, 90.0)));
    }

    #[test]
    fn test_pinch_then_lift_does_not_jump() {
        let mut session = StickerSession::default();
        session.pointer_down(touch(1, 100.0, 100.0), PointerKind::Touch, 0.0);
        session.pointer_down(touch(2, 200.0, 100.0), PointerKind::Touch, 0.0);
        assert_eq!(session.phase(), GesturePhase::Pinching);

        session.pointer_move(touch(2, 300.0, 100.0));
        assert!((session.transform().scale() - 2.0).abs() < 1e-9);

        session.pointer_up(2);
        let origin = session.transform().origin();
        assert_eq!(session.phase(), GesturePhase::Dragging);

        // Surviving finger moves by (5, 5): overlay follows by the same amount
        session.pointer_move(touch(1, 105.0, 105.0));
        assert_eq!(session.transform().origin(), Point::new(origin.x + 5.0, origin.y + 5.0));
    }

    #[test]
    fn test_long_press_gate() {
        let config = ComposerConfig {
            touch_policy: TouchPolicy::long_press(),
            ..Default::default()
        };
        let mut session = StickerSession::new(config);

        session.pointer_down(touch(1, 10.0, 10.0), PointerKind::Touch, 1000.0);
        assert_eq!(session.pending_deadline(), Some(1500.0));
        assert!(!session.pointer_move(touch(1, 50.0, 50.0)));
        assert!(!session.tick(1200.0));
        assert_eq!(session.phase(), GesturePhase::Pending);

        session.tick(1500.0);
        assert_eq!(session.phase(), GesturePhase::Dragging);
        assert!(session.pointer_move(touch(1, 60.0, 70.0)));
        assert_eq!(session.transform().origin(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_buttons_and_wheel() {
        let mut session = StickerSession::default();
        assert!(session.rotate_step(StepDirection::Decrease));
        assert_eq!(session.transform().rotation(), 359.0);

        assert!(session.scale_step(StepDirection::Increase));
        assert!((session.transform().scale() - 1.2).abs() < 1e-9);

        assert!(session.wheel(-120.0));
        assert!((session.transform().scale() - 1.3).abs() < 1e-9);
        assert!(!session.wheel(0.0));
    }

    #[test]
    fn test_scale_stops_at_bounds() {
        let mut session = StickerSession::default();
        for _ in 0..10 {
            session.scale_step(StepDirection::Decrease);
        }
        assert_eq!(session.transform().scale(), 0.1);
        assert!(!session.scale_step(StepDirection::Decrease));
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let config: ComposerConfig =
            serde_json::from_str(r#"{"scale_bounds":{"min":5.0,"max":1.0}}"#).unwrap();
        let mut session = StickerSession::new(config);
        session.wheel(-1.0);
        session.scale_step(StepDirection::Increase);
        assert_eq!(session.transform().scale(), 1.0);
    }

    #[test]
    fn test_hold_repeats_until_stopped() {
        let mut session = StickerSession::default();
        assert!(session.hold_start(StepDirection::Increase, 0.0));
        assert_eq!(session.transform().rotation(), 1.0);

        assert!(!session.hold_advance(30.0));
        assert!(session.hold_advance(120.0));
        assert_eq!(session.transform().rotation(), 3.0);

        session.hold_stop();
        assert!(!session.is_holding());
        assert!(!session.hold_advance(1000.0));
        assert_eq!(session.transform().rotation(), 3.0);
    }

    #[test]
    fn test_reset_gestures_keeps_transform() {
        let mut session = StickerSession::default();
        session.pointer_down(touch(1, 0.0, 0.0), PointerKind::Touch, 0.0);
        session.pointer_move(touch(1, 20.0, 20.0));
        session.hold_start(StepDirection::Decrease, 0.0);

        session.reset_gestures();

        assert_eq!(session.phase(), GesturePhase::Idle);
        assert!(!session.is_holding());
        assert_eq!(session.transform().origin(), Point::new(20.0, 20.0));
        assert_eq!(session.transform().rotation(), 359.0);
    }

    #[test]
    fn test_export_without_assets_fails() {
        let session = StickerSession::default();
        let err = session
            .export(&AssetSet::new(), Size::new(100.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, ExportError::AssetsNotLoaded { .. }));
    }
}

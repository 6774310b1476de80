//! The `StickerEditor` object handed to JavaScript.
//!
//! The host page forwards DOM events (pointer, wheel, button presses) and
//! file bytes; the editor answers with the overlay's CSS transform and, on
//! export, the finished PNG.
//!
//! # Timers
//!
//! Press-and-hold rotation and the optional long-press gate are driven by
//! `gloo` timers owned by the editor. Dropping a handle cancels its timer, so
//! releasing a button, cancelling a touch or disposing the editor can never
//! leave a callback running. Timer callbacks report changes through the
//! `on_change` callback; direct method calls report them through their
//! return value instead, since JavaScript cannot re-enter the editor while
//! one of its methods is running.
//!
//! # Example
//!
//! ```typescript
//! import init, { StickerEditor } from '@stickerlay/wasm';
//!
//! await init();
//! const editor = new StickerEditor();
//! editor.load_overlay(stickerBytes);
//! editor.load_watermark(watermarkBytes);
//! editor.set_on_change(() => (sticker.style.transform = editor.css_transform()));
//!
//! stage.addEventListener('pointermove', (e) => {
//!   if (editor.pointer_move(e.pointerId, e.offsetX, e.offsetY)) {
//!     sticker.style.transform = editor.css_transform();
//!   }
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::{Interval, Timeout};
use stickerlay_core::{
    decode, AssetKind, AssetSet, ComposerConfig, Delivery, GesturePhase, PointerKind,
    PointerSample, Size, StepDirection, StickerSession,
};
use wasm_bindgen::prelude::*;

use crate::types::JsExportedImage;

struct EditorState {
    session: StickerSession,
    assets: AssetSet,
    on_change: Option<js_sys::Function>,
}

type SharedState = Rc<RefCell<EditorState>>;

/// Interactive sticker editor.
#[wasm_bindgen]
pub struct StickerEditor {
    state: SharedState,
    hold_timer: Option<Interval>,
    long_press_timer: Option<Timeout>,
}

#[wasm_bindgen]
impl StickerEditor {
    /// Create an editor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> StickerEditor {
        Self::from_config(ComposerConfig::default())
    }

    /// Create an editor from a (possibly partial) configuration object.
    ///
    /// Missing fields take their defaults; `undefined` or `null` gives the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not match the configuration shape
    /// or holds values the editor cannot use (inverted scale bounds, a
    /// non-positive footprint, opacity outside `[0, 1]`).
    pub fn with_config(config: JsValue) -> Result<StickerEditor, JsValue> {
        let config: ComposerConfig = if config.is_undefined() || config.is_null() {
            ComposerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?;
        Ok(Self::from_config(config))
    }

    /// Register the function called after timer-driven transform changes.
    pub fn set_on_change(&mut self, callback: Option<js_sys::Function>) {
        self.state.borrow_mut().on_change = callback;
    }

    /// Load the user's photo.
    ///
    /// Returns `false` without error when `mime` is not an image type, so a
    /// stray PDF or text file is simply ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes claim to be an image but cannot be decoded.
    pub fn load_background(&mut self, bytes: &[u8], mime: &str) -> Result<bool, JsValue> {
        match decode::decode_upload(bytes, mime) {
            Ok(image) => {
                tracing::info!(
                    width = image.width(),
                    height = image.height(),
                    "Background loaded"
                );
                self.state
                    .borrow_mut()
                    .assets
                    .set(AssetKind::Background, image);
                Ok(true)
            }
            Err(decode::DecodeError::NotAnImage { mime }) => {
                tracing::debug!(%mime, "Ignoring non-image upload");
                Ok(false)
            }
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// Load the bundled sticker image.
    pub fn load_overlay(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.load_bundled(AssetKind::Overlay, bytes)
    }

    /// Load the bundled watermark image.
    pub fn load_watermark(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.load_bundled(AssetKind::Watermark, bytes)
    }

    /// True once the photo, sticker and watermark have all loaded.
    pub fn is_ready(&self) -> bool {
        self.state.borrow().assets.ready().is_ok()
    }

    /// Move the sticker to the middle of the preview container.
    pub fn center_in(&mut self, container_width: f64, container_height: f64) -> bool {
        self.state
            .borrow_mut()
            .session
            .center_in(Size::new(container_width, container_height))
    }

    /// Forward a `pointerdown`. `pointer_type` is the DOM `pointerType`.
    pub fn pointer_down(&mut self, id: i32, x: f64, y: f64, pointer_type: &str) -> bool {
        let (changed, deadline) = {
            let mut state = self.state.borrow_mut();
            let changed = state.session.pointer_down(
                PointerSample::new(id, x, y),
                PointerKind::from_dom(pointer_type),
                now_ms(),
            );
            (changed, state.session.pending_deadline())
        };
        if let Some(deadline) = deadline {
            self.schedule_long_press(deadline);
        }
        changed
    }

    pub fn pointer_move(&mut self, id: i32, x: f64, y: f64) -> bool {
        self.state
            .borrow_mut()
            .session
            .pointer_move(PointerSample::new(id, x, y))
    }

    pub fn pointer_up(&mut self, id: i32) -> bool {
        let changed = self.state.borrow_mut().session.pointer_up(id);
        self.drop_stale_long_press();
        changed
    }

    /// Forward `pointercancel` or `pointerleave` on the stage.
    ///
    /// A held rotate button is untouched; its own release goes to `hold_stop`.
    pub fn pointer_cancel(&mut self, id: i32) -> bool {
        let changed = self.state.borrow_mut().session.pointer_cancel(id);
        self.drop_stale_long_press();
        changed
    }

    /// Forward a `wheel` event's `deltaY`.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        self.state.borrow_mut().session.wheel(delta_y)
    }

    /// One rotation click. Positive `sign` rotates clockwise.
    pub fn rotate_step(&mut self, sign: f64) -> bool {
        match StepDirection::from_sign(sign) {
            Some(direction) => self.state.borrow_mut().session.rotate_step(direction),
            None => false,
        }
    }

    /// One scale click. Positive `sign` enlarges.
    pub fn scale_step(&mut self, sign: f64) -> bool {
        match StepDirection::from_sign(sign) {
            Some(direction) => self.state.borrow_mut().session.scale_step(direction),
            None => false,
        }
    }

    /// Start rotating continuously while a button is held.
    ///
    /// One step is applied right away; further steps arrive through
    /// `on_change` every hold interval until `hold_stop`.
    pub fn hold_start(&mut self, sign: f64) -> bool {
        let Some(direction) = StepDirection::from_sign(sign) else {
            return false;
        };
        let (changed, interval_ms) = {
            let mut state = self.state.borrow_mut();
            let changed = state.session.hold_start(direction, now_ms());
            (changed, state.session.config().hold_interval_ms.max(1))
        };

        let state = self.state.clone();
        self.hold_timer = Some(Interval::new(interval_ms, move || {
            let changed = state.borrow_mut().session.hold_advance(now_ms());
            if changed {
                notify(&state);
            }
        }));
        changed
    }

    /// Stop press-and-hold rotation (`pointerup`, `pointerleave`, blur).
    pub fn hold_stop(&mut self) {
        self.hold_timer = None;
        self.state.borrow_mut().session.hold_stop();
    }

    /// CSS `transform` value for the sticker element.
    pub fn css_transform(&self) -> String {
        self.state.borrow().session.css_transform()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.state.borrow().session.transform().x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.state.borrow().session.transform().y()
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.state.borrow().session.transform().scale()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.state.borrow().session.transform().rotation()
    }

    /// Current gesture phase: `idle`, `pending`, `dragging` or `pinching`.
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        phase_name(self.state.borrow().session.phase()).to_string()
    }

    /// Render the composite at the photo's native resolution.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message suitable for `alert()`. The detailed
    /// cause is logged to the developer console.
    pub fn export_png(
        &self,
        container_width: f64,
        container_height: f64,
    ) -> Result<JsExportedImage, JsValue> {
        let state = self.state.borrow();
        state
            .session
            .export(&state.assets, Size::new(container_width, container_height))
            .map(JsExportedImage::from)
            .map_err(|e| JsValue::from_str(e.user_message()))
    }

    /// How to hand the export to the user for this browser.
    ///
    /// Returns `{ kind: "download", file_name }` or `{ kind: "preview" }`.
    pub fn delivery(&self, user_agent: &str) -> Result<JsValue, JsValue> {
        let file_name = self.state.borrow().session.config().file_name.clone();
        serde_wasm_bindgen::to_value(&Delivery::for_user_agent(user_agent, &file_name))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Cancel timers and forget in-flight gestures. Call when the editor
    /// is torn down.
    pub fn dispose(&mut self) {
        self.cancel_timers();
        let mut state = self.state.borrow_mut();
        state.session.reset_gestures();
        state.on_change = None;
    }
}

impl Default for StickerEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StickerEditor {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

impl StickerEditor {
    fn from_config(config: ComposerConfig) -> Self {
        tracing::debug!(touch_policy = ?config.touch_policy, footprint = config.footprint, "Editor created");
        Self {
            state: Rc::new(RefCell::new(EditorState {
                session: StickerSession::new(config),
                assets: AssetSet::new(),
                on_change: None,
            })),
            hold_timer: None,
            long_press_timer: None,
        }
    }

    fn load_bundled(&mut self, kind: AssetKind, bytes: &[u8]) -> Result<(), JsValue> {
        let image = decode::decode_image(bytes).map_err(|e| {
            tracing::error!(%kind, error = %e, "Failed to decode bundled image");
            JsValue::from_str(&e.to_string())
        })?;
        tracing::debug!(%kind, width = image.width(), height = image.height(), "Asset loaded");
        self.state.borrow_mut().assets.set(kind, image);
        Ok(())
    }

    /// Arm the timeout that turns a resting touch into a drag.
    fn schedule_long_press(&mut self, deadline_ms: f64) {
        let state = self.state.clone();
        let delay = delay_until(deadline_ms, now_ms());
        self.long_press_timer = Some(Timeout::new(delay, move || {
            // Tick at the deadline itself so timer jitter cannot undershoot it
            let changed = state.borrow_mut().session.tick(deadline_ms);
            if changed {
                notify(&state);
            }
        }));
    }

    fn drop_stale_long_press(&mut self) {
        if self.state.borrow().session.pending_deadline().is_none() {
            self.long_press_timer = None;
        }
    }

    fn cancel_timers(&mut self) {
        self.hold_timer = None;
        self.long_press_timer = None;
    }
}

fn notify(state: &SharedState) {
    // Release the borrow before calling out; the callback reads the editor
    let callback = state.borrow().on_change.clone();
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            tracing::warn!(error = ?e, "on_change callback threw");
        }
    }
}

/// Milliseconds from the page's high-resolution clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Whole milliseconds to wait before `deadline_ms`, never negative.
fn delay_until(deadline_ms: f64, now_ms: f64) -> u32 {
    let remaining = (deadline_ms - now_ms).ceil();
    if remaining.is_finite() && remaining > 0.0 {
        remaining.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

fn phase_name(phase: GesturePhase) -> &'static str {
    match phase {
        GesturePhase::Idle => "idle",
        GesturePhase::Pending => "pending",
        GesturePhase::Dragging => "dragging",
        GesturePhase::Pinching => "pinching",
    }
}


/// WASM-specific tests that require JsValue, timers or the browser clock.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let pixels = color.repeat((width * height) as usize);
        stickerlay_core::encode::encode_png_rgba(&pixels, width, height).unwrap()
    }

    fn loaded_editor() -> StickerEditor {
        let mut editor = StickerEditor::new();
        assert!(editor
            .load_background(&png_bytes(200, 100, [255, 255, 255, 255]), "image/png")
            .unwrap());
        editor.load_overlay(&png_bytes(8, 8, [255, 0, 0, 255])).unwrap();
        editor.load_watermark(&png_bytes(4, 2, [0, 0, 0, 255])).unwrap();
        editor
    }

    #[wasm_bindgen_test]
    fn test_non_image_upload_is_ignored() {
        let mut editor = StickerEditor::new();
        assert!(!editor.load_background(b"%PDF", "application/pdf").unwrap());
        assert!(!editor.is_ready());
    }

    #[wasm_bindgen_test]
    fn test_config_from_js() {
        let config = js_sys::JSON::parse(r#"{"footprint": 50, "file_name": "x.png"}"#).unwrap();
        let mut editor = StickerEditor::with_config(config).unwrap();
        editor.center_in(100.0, 100.0);
        assert_eq!(editor.x(), 25.0);

        let bad = js_sys::JSON::parse(r#"{"footprint": "big"}"#).unwrap();
        assert!(StickerEditor::with_config(bad).is_err());

        let inverted = js_sys::JSON::parse(r#"{"scale_bounds": {"min": 5, "max": 1}}"#).unwrap();
        let err = StickerEditor::with_config(inverted).err().unwrap();
        assert!(err.as_string().unwrap().contains("scale bounds"));

        let opaque = js_sys::JSON::parse(r#"{"watermark": {"opacity": 2}}"#).unwrap();
        assert!(StickerEditor::with_config(opaque).is_err());
        assert!(StickerEditor::with_config(JsValue::UNDEFINED).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_drag_and_css() {
        let mut editor = StickerEditor::new();
        editor.pointer_down(1, 10.0, 10.0, "mouse");
        assert_eq!(editor.phase(), "dragging");
        assert!(editor.pointer_move(1, 30.0, 50.0));
        editor.pointer_up(1);
        assert_eq!(editor.css_transform(), "translate(20px, 40px) rotate(0deg) scale(1)");
    }

    #[wasm_bindgen_test]
    fn test_export_requires_assets() {
        let editor = StickerEditor::new();
        let err = editor.export_png(100.0, 100.0).err().unwrap();
        assert!(err.as_string().unwrap().contains("loading"));
    }

    #[wasm_bindgen_test]
    fn test_export_png() {
        let mut editor = loaded_editor();
        assert!(editor.is_ready());
        editor.center_in(200.0, 100.0);

        let exported = editor.export_png(200.0, 100.0).unwrap();
        assert_eq!(exported.width(), 200);
        assert_eq!(exported.height(), 100);
        assert!(exported.data_url().starts_with("data:image/png;base64,"));
    }

    #[wasm_bindgen_test]
    fn test_stage_cancel_keeps_button_hold() {
        let mut editor = StickerEditor::new();
        editor.pointer_down(1, 10.0, 10.0, "touch");
        assert!(editor.hold_start(1.0));

        editor.pointer_cancel(1);
        assert_eq!(editor.phase(), "idle");
        assert!(editor.hold_timer.is_some());

        editor.hold_stop();
        assert!(editor.hold_timer.is_none());
    }

    #[wasm_bindgen_test]
    fn test_hold_and_dispose() {
        let mut editor = StickerEditor::new();
        assert!(editor.hold_start(-1.0));
        assert_eq!(editor.rotation(), 359.0);
        editor.dispose();
        assert!(editor.hold_timer.is_none());
        assert_eq!(editor.phase(), "idle");
    }
}

//! Stickerlay WASM - WebAssembly bindings for Stickerlay
//!
//! This crate exposes the stickerlay-core editor to the host page's
//! JavaScript. The page owns the DOM (file input, preview container, buttons)
//! and forwards events; this crate owns the overlay state, the browser
//! timers, logging and the export.
//!
//! # Module Structure
//!
//! - `editor` - The `StickerEditor` object: input handling, timers, export
//! - `types` - WASM-compatible wrapper types for exported images
//!
//! # Usage
//!
//! ```typescript
//! import init, { StickerEditor, delivery_for_user_agent } from '@stickerlay/wasm';
//!
//! await init();
//! const editor = new StickerEditor();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (editor.load_background(bytes, file.type)) {
//!   editor.center_in(stage.clientWidth, stage.clientHeight);
//! }
//!
//! try {
//!   const image = editor.export_png(stage.clientWidth, stage.clientHeight);
//!   const delivery = editor.delivery(navigator.userAgent);
//! } catch (message) {
//!   alert(message);
//! }
//! ```

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Layer;
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;

mod editor;
mod types;

pub use editor::StickerEditor;
pub use types::JsExportedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Panic messages go to the browser console instead of "unreachable"
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(LevelFilter::INFO);

    // A second init (e.g. hot reload) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Whether a picked file should be treated as a photo, by MIME type.
#[wasm_bindgen]
pub fn is_image_file(mime: &str) -> bool {
    stickerlay_core::is_image_mime(mime)
}

/// Pick download or preview delivery without an editor instance.
///
/// Returns `{ kind: "download", file_name }` or `{ kind: "preview" }`.
#[wasm_bindgen]
pub fn delivery_for_user_agent(user_agent: &str, file_name: &str) -> Result<JsValue, JsValue> {
    let delivery = stickerlay_core::Delivery::for_user_agent(user_agent, file_name);
    serde_wasm_bindgen::to_value(&delivery).map_err(|e| JsValue::from_str(&e.to_string()))
}

//! Export pipeline: readiness check, projection, compositing, PNG encoding.
//!
//! Also decides how the host page should hand the file to the user. Desktop
//! browsers get a download; mobile browsers, where programmatic downloads
//! are unreliable, get a preview the user can long-press to save.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetSet;
use crate::compose::{composite, ComposeError};
use crate::config::ComposerConfig;
use crate::decode::AssetKind;
use crate::encode::{encode_png, png_data_url, EncodeError};
use crate::geometry::Size;
use crate::projection::{project_overlay, ProjectionError};
use crate::transform::OverlayTransform;

/// User-agent fragments that mark a mobile browser.
const MOBILE_UA_TOKENS: [&str; 9] = [
    "Android",
    "iPhone",
    "iPad",
    "iPod",
    "Mobile",
    "webOS",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// Errors that abort an export. No partial output is produced.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Some images have not finished loading.
    #[error("Images not loaded yet: {}", list_kinds(.missing))]
    AssetsNotLoaded { missing: Vec<AssetKind> },

    #[error("Projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Compositing failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

fn list_kinds(kinds: &[AssetKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExportError {
    /// Short text suitable for an alert. Detail stays in `Display`.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::AssetsNotLoaded { .. } => {
                "Images are still loading. Please wait a moment and try again."
            }
            _ => "Sorry, the image could not be created. Please try again.",
        }
    }
}

/// A finished composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ExportedImage {
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

/// How the host page should deliver the exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delivery {
    /// Trigger a file download with this name.
    Download { file_name: String },
    /// Open the image for viewing so the user can save it manually.
    Preview,
}

impl Delivery {
    /// Pick a delivery method from the browser's user-agent string.
    pub fn for_user_agent(user_agent: &str, file_name: &str) -> Self {
        if is_mobile_user_agent(user_agent) {
            Delivery::Preview
        } else {
            Delivery::Download {
                file_name: file_name.to_string(),
            }
        }
    }
}

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_UA_TOKENS
        .iter()
        .any(|token| user_agent.contains(token))
}

/// Render the composite at the background's native resolution.
///
/// # Arguments
///
/// * `assets` - Background, overlay and watermark images
/// * `transform` - Overlay transform in container pixels
/// * `container` - Rendered size of the preview container
/// * `config` - Footprint and watermark settings
///
/// # Errors
///
/// Returns `ExportError::AssetsNotLoaded` while any image is missing, and
/// wraps projection, compositing and encoding failures.
pub fn export_composite(
    assets: &AssetSet,
    transform: &OverlayTransform,
    container: Size,
    config: &ComposerConfig,
) -> Result<ExportedImage, ExportError> {
    let result = render(assets, transform, container, config);
    match &result {
        Ok(image) => tracing::info!(
            width = image.width,
            height = image.height,
            bytes = image.png.len(),
            "Exported composite"
        ),
        Err(e) => tracing::error!(error = %e, "Export failed"),
    }
    result
}

fn render(
    assets: &AssetSet,
    transform: &OverlayTransform,
    container: Size,
    config: &ComposerConfig,
) -> Result<ExportedImage, ExportError> {
    let ready = assets
        .ready()
        .map_err(|missing| ExportError::AssetsNotLoaded { missing })?;

    let natural = Size::from_pixels(ready.background.width(), ready.background.height());
    let placement = project_overlay(transform, natural, container, config.footprint)?;
    tracing::debug!(
        x = placement.center.x,
        y = placement.center.y,
        size = placement.size,
        rotation = placement.rotation,
        "Projected overlay"
    );

    let canvas = composite(
        ready.background,
        ready.overlay,
        ready.watermark,
        &placement,
        &config.watermark,
    )?;
    let png = encode_png(&canvas)?;

    Ok(ExportedImage {
        png,
        width: canvas.width(),
        height: canvas.height(),
    })
}

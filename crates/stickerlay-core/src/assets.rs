//! The three images an export needs, and whether they have arrived.

use image::RgbaImage;

use crate::decode::AssetKind;
use crate::geometry::Size;

/// Slots for the uploaded photo and the two bundled images.
///
/// Each slot is filled once its image finishes loading. Replacing the
/// background with a new upload is allowed; the old one is dropped.
#[derive(Debug, Clone, Default)]
pub struct AssetSet {
    background: Option<RgbaImage>,
    overlay: Option<RgbaImage>,
    watermark: Option<RgbaImage>,
}

/// All three images, borrowed once they are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct ReadyAssets<'a> {
    pub background: &'a RgbaImage,
    pub overlay: &'a RgbaImage,
    pub watermark: &'a RgbaImage,
}

impl AssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decoded image in its slot.
    pub fn set(&mut self, kind: AssetKind, image: RgbaImage) {
        let slot = match kind {
            AssetKind::Background => &mut self.background,
            AssetKind::Overlay => &mut self.overlay,
            AssetKind::Watermark => &mut self.watermark,
        };
        *slot = Some(image);
    }

    pub fn get(&self, kind: AssetKind) -> Option<&RgbaImage> {
        match kind {
            AssetKind::Background => self.background.as_ref(),
            AssetKind::Overlay => self.overlay.as_ref(),
            AssetKind::Watermark => self.watermark.as_ref(),
        }
    }

    pub fn clear(&mut self, kind: AssetKind) {
        match kind {
            AssetKind::Background => self.background = None,
            AssetKind::Overlay => self.overlay = None,
            AssetKind::Watermark => self.watermark = None,
        }
    }

    pub fn is_loaded(&self, kind: AssetKind) -> bool {
        self.get(kind).is_some()
    }

    /// Natural size of the uploaded photo, if any.
    pub fn background_size(&self) -> Option<Size> {
        self.background
            .as_ref()
            .map(|img| Size::from_pixels(img.width(), img.height()))
    }

    /// Slots still waiting for their image, in draw order.
    pub fn missing(&self) -> Vec<AssetKind> {
        [AssetKind::Background, AssetKind::Overlay, AssetKind::Watermark]
            .into_iter()
            .filter(|kind| !self.is_loaded(*kind))
            .collect()
    }

    /// Borrow all three images, or list the missing ones.
    pub fn ready(&self) -> Result<ReadyAssets<'_>, Vec<AssetKind>> {
        match (&self.background, &self.overlay, &self.watermark) {
            (Some(background), Some(overlay), Some(watermark)) => Ok(ReadyAssets {
                background,
                overlay,
                watermark,
            }),
            _ => Err(self.missing()),
        }
    }
}

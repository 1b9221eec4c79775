//! Source image types.
//!
//! A [`SourceImage`] is the decoded cover art handed to the engine. It is
//! immutable once decoded and owned by the render call that uses it.

use image::RgbaImage;

use crate::error::{WallpaperError, WallpaperResult};

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Decoded cover art in RGBA format.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,

    /// Display name reported by the resolver (album or track title).
    display_name: Option<String>,
}

impl SourceImage {
    /// Wraps an already decoded pixel buffer.
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            display_name: None,
        }
    }

    /// Decodes encoded image bytes (PNG, JPEG, ...) into a source image.
    ///
    /// Fails with [`WallpaperError::ImageDecode`] if the bytes are corrupt,
    /// in an unsupported format, or decode to an empty image.
    pub fn decode(bytes: &[u8]) -> WallpaperResult<Self> {
        let pixels = image::load_from_memory(bytes)
            .map_err(|e| WallpaperError::image_decode(format!("failed to decode cover: {e}")))?
            .to_rgba8();

        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(WallpaperError::image_decode("cover decoded to an empty image"));
        }

        Ok(Self::new(pixels))
    }

    /// Attaches a display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.pixels.width(), self.pixels.height())
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels)
    }
}

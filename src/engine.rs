//! The wallpaper pipeline.
//!
//! [`render`] is a pure function: the same source and parameters always
//! produce the same bytes, nothing is cached and nothing is kept between
//! calls. Callers re-run it whenever any input changes.
//!
//! ```text
//! source ──► dominant color ──► background ──► cover in rounded window ──► result
//!    │          (gradient)          ▲
//!    └──────────────────────────────┘ (frosted)
//! ```

use image::RgbaImage;

use crate::background::{WallpaperMode, generate_background};
use crate::color::{DominantColor, extract_dominant_color};
use crate::compositor::{CoverShadow, composite_cover};
use crate::device::DeviceProfile;
use crate::error::{WallpaperError, WallpaperResult};
use crate::geometry::{CoverGeometry, CoverPlacement};
use crate::source::{SizePx, SourceImage};

/// Every parameter that affects the output, besides the source image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderRequest {
    pub mode: WallpaperMode,
    pub device: DeviceProfile,
    pub geometry: CoverGeometry,
    /// Drop shadow under the cover. Off unless set.
    pub shadow: Option<CoverShadow>,
}

impl RenderRequest {
    pub fn new(mode: WallpaperMode, device: DeviceProfile, geometry: CoverGeometry) -> Self {
        Self {
            mode,
            device,
            geometry,
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, shadow: CoverShadow) -> Self {
        self.shadow = Some(shadow);
        self
    }
}

/// A finished wallpaper.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionResult {
    image: RgbaImage,
    placement: CoverPlacement,
    dominant_color: Option<DominantColor>,
}

impl CompositionResult {
    /// The wallpaper pixels, exactly the device resolution.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Raw RGBA bytes, row-major, for clipboard placement.
    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.image.width(), self.image.height())
    }

    /// Where the cover ended up after clamping.
    pub fn placement(&self) -> &CoverPlacement {
        &self.placement
    }

    /// The color the gradient was built from. `None` in frosted mode.
    pub fn dominant_color(&self) -> Option<DominantColor> {
        self.dominant_color
    }
}

/// Renders a wallpaper without a drop shadow.
pub fn render(
    source: &SourceImage,
    mode: &WallpaperMode,
    device: &DeviceProfile,
    geometry: &CoverGeometry,
) -> WallpaperResult<CompositionResult> {
    render_request(source, &RenderRequest::new(*mode, *device, *geometry))
}

/// Renders a wallpaper for a full parameter set.
///
/// Fails with [`WallpaperError::ImageDecode`] for an empty source. Geometry
/// that does not fit the device is clamped, never rejected.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(device = request.device.name, mode = request.mode.name())
)]
pub fn render_request(
    source: &SourceImage,
    request: &RenderRequest,
) -> WallpaperResult<CompositionResult> {
    if source.dimensions().is_empty() {
        return Err(WallpaperError::image_decode("source image has no pixels"));
    }

    let device = &request.device;
    let placement = request.geometry.placement(device);
    if placement.clamped {
        tracing::debug!(
            requested = ?request.geometry,
            size = placement.size,
            y = placement.y,
            corner_radius = placement.corner_radius,
            "cover geometry clamped"
        );
    }

    let dominant_color = request
        .mode
        .needs_dominant_color()
        .then(|| extract_dominant_color(source));
    if let Some(color) = dominant_color {
        tracing::debug!(r = color.r, g = color.g, b = color.b, "dominant color");
    }

    tracing::debug!(
        x = placement.x,
        y = placement.y,
        bottom = placement.bottom(),
        "cover placed"
    );

    let background = generate_background(&request.mode, source, dominant_color, device)?;
    let image = composite_cover(background, source, &placement, request.shadow.as_ref())?;

    tracing::debug!(width = image.width(), height = image.height(), "wallpaper rendered");
    Ok(CompositionResult {
        image,
        placement,
        dominant_color,
    })
}

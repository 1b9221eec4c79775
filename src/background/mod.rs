//! Background synthesis.
//!
//! Two mutually exclusive modes fill the frame behind the cover:
//!
//! - [`WallpaperMode::Gradient`] ramps the dominant color from a lighter
//!   tint at the top to a darker shade at the bottom.
//! - [`WallpaperMode::Frosted`] blows the cover itself up to fill the frame,
//!   blurs it beyond recognition, flips it and darkens it.
//!
//! Both produce a fully opaque raster with exactly the device dimensions.

pub mod frosted;
pub mod gradient;

pub use frosted::{FrostedConfig, cover_scale, scaled_backdrop_size};
pub use gradient::{GradientConfig, GradientStop, MAX_GRADIENT_STEPS, gradient_stops};

use image::RgbaImage;

use crate::color::DominantColor;
use crate::device::DeviceProfile;
use crate::error::WallpaperResult;
use crate::source::SourceImage;

/// Background style, with the parameters that only make sense for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallpaperMode {
    Gradient(GradientConfig),
    Frosted(FrostedConfig),
}

impl WallpaperMode {
    /// Gradient mode with default parameters.
    pub fn gradient() -> Self {
        Self::Gradient(GradientConfig::default())
    }

    /// Frosted mode with default parameters.
    pub fn frosted() -> Self {
        Self::Frosted(FrostedConfig::default())
    }

    /// True if this mode needs the dominant color of the cover.
    pub fn needs_dominant_color(&self) -> bool {
        matches!(self, Self::Gradient(_))
    }

    /// Short lowercase name, used in logs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gradient(_) => "gradient",
            Self::Frosted(_) => "frosted",
        }
    }
}

impl Default for WallpaperMode {
    fn default() -> Self {
        Self::gradient()
    }
}

/// What a background is derived from.
#[derive(Debug, Clone, Copy)]
pub enum BackgroundInput<'a> {
    /// Gradient mode input.
    Color(DominantColor),
    /// Frosted mode input.
    Image(&'a SourceImage),
}

/// Renders the background for `mode` at the profile's resolution.
///
/// The dominant color is only computed when the mode asks for it, and
/// `dominant` lets a caller that already has one skip the extraction.
pub fn generate_background(
    mode: &WallpaperMode,
    source: &SourceImage,
    dominant: Option<DominantColor>,
    profile: &DeviceProfile,
) -> WallpaperResult<RgbaImage> {
    let input = match mode {
        WallpaperMode::Gradient(_) => BackgroundInput::Color(
            dominant.unwrap_or_else(|| crate::color::extract_dominant_color(source)),
        ),
        WallpaperMode::Frosted(_) => BackgroundInput::Image(source),
    };
    render_background(mode, input, profile)
}

/// Renders a background from an explicit input.
///
/// A mismatched input (an image for gradient mode, a color for frosted
/// mode) is bridged rather than rejected: the color is extracted from the
/// image, or a flat frame of the color is used as the frosted source.
pub fn render_background(
    mode: &WallpaperMode,
    input: BackgroundInput<'_>,
    profile: &DeviceProfile,
) -> WallpaperResult<RgbaImage> {
    let size = profile.size();
    match (mode, input) {
        (WallpaperMode::Gradient(config), BackgroundInput::Color(base)) => {
            Ok(gradient::render_gradient(base, config, size))
        }
        (WallpaperMode::Gradient(config), BackgroundInput::Image(source)) => {
            let base = crate::color::extract_dominant_color(source);
            Ok(gradient::render_gradient(base, config, size))
        }
        (WallpaperMode::Frosted(config), BackgroundInput::Image(source)) => {
            frosted::render_frosted(source, config, size)
        }
        (WallpaperMode::Frosted(config), BackgroundInput::Color(base)) => {
            let flat = SourceImage::new(RgbaImage::from_pixel(
                1,
                1,
                image::Rgba([base.r, base.g, base.b, 255]),
            ));
            frosted::render_frosted(&flat, config, size)
        }
    }
}

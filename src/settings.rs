//! Serializable wallpaper parameters.
//!
//! [`WallpaperSettings`] is the document a front end edits: a device name,
//! the background mode with its parameters, the three cover controls and an
//! optional drop shadow. It converts to a [`RenderRequest`] for the engine.
//!
//! # Example
//!
//! ```
//! use cover_wallpaper::{ModeSettings, WallpaperSettings};
//!
//! let settings = WallpaperSettings::new()
//!     .with_device("iPhone 16")
//!     .with_mode(ModeSettings::frosted());
//!
//! let json = settings.to_json().unwrap();
//! let restored = WallpaperSettings::from_json(&json).unwrap();
//! assert_eq!(restored, settings);
//!
//! let request = restored.to_request().unwrap();
//! assert_eq!(request.device.width, 1179);
//! ```

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::background::{FrostedConfig, GradientConfig, WallpaperMode};
use crate::compositor::CoverShadow;
use crate::device::DeviceProfile;
use crate::engine::RenderRequest;
use crate::error::WallpaperResult;
use crate::geometry::CoverGeometry;

// ============================================================================
// Mode Settings
// ============================================================================

/// Parameters for gradient mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct GradientSettings {
    /// Number of intervals in the color ramp.
    pub steps: usize,
}

impl Default for GradientSettings {
    fn default() -> Self {
        Self {
            steps: GradientConfig::default().steps,
        }
    }
}

/// Parameters for frosted mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct FrostedSettings {
    /// Blur standard deviation in pixels.
    pub blur_radius: f32,
    /// Opacity of the darkening mask (0.0-1.0).
    pub mask_opacity: f32,
}

impl Default for FrostedSettings {
    fn default() -> Self {
        let config = FrostedConfig::default();
        Self {
            blur_radius: config.blur_radius,
            mask_opacity: config.mask_opacity,
        }
    }
}

/// Serializable version of [`WallpaperMode`].
///
/// Tagged by a `kind` field:
///
/// ```json
/// { "kind": "frosted", "blurRadius": 200.0, "maskOpacity": 0.4 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ModeSettings {
    Gradient(GradientSettings),
    Frosted(FrostedSettings),
}

impl ModeSettings {
    pub fn gradient() -> Self {
        Self::Gradient(GradientSettings::default())
    }

    pub fn frosted() -> Self {
        Self::Frosted(FrostedSettings::default())
    }
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self::gradient()
    }
}

impl From<WallpaperMode> for ModeSettings {
    fn from(mode: WallpaperMode) -> Self {
        match mode {
            WallpaperMode::Gradient(config) => Self::Gradient(GradientSettings {
                steps: config.steps,
            }),
            WallpaperMode::Frosted(config) => Self::Frosted(FrostedSettings {
                blur_radius: config.blur_radius,
                mask_opacity: config.mask_opacity,
            }),
        }
    }
}

impl From<ModeSettings> for WallpaperMode {
    fn from(settings: ModeSettings) -> Self {
        match settings {
            ModeSettings::Gradient(s) => Self::Gradient(GradientConfig::new(s.steps)),
            ModeSettings::Frosted(s) => {
                Self::Frosted(FrostedConfig::new(s.blur_radius, s.mask_opacity))
            }
        }
    }
}

// ============================================================================
// Shadow Settings
// ============================================================================

/// Serializable version of [`CoverShadow`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ShadowSettings {
    /// RGBA shadow color.
    pub color: [u8; 4],
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        CoverShadow::default().into()
    }
}

impl From<CoverShadow> for ShadowSettings {
    fn from(shadow: CoverShadow) -> Self {
        Self {
            color: shadow.color.0,
            blur: shadow.blur,
            offset_x: shadow.offset_x,
            offset_y: shadow.offset_y,
        }
    }
}

impl From<ShadowSettings> for CoverShadow {
    fn from(settings: ShadowSettings) -> Self {
        Self {
            color: Rgba(settings.color),
            blur: settings.blur.max(0.0),
            offset_x: settings.offset_x,
            offset_y: settings.offset_y,
        }
    }
}

// ============================================================================
// WallpaperSettings
// ============================================================================

/// Every user-facing wallpaper parameter.
///
/// Missing fields take their defaults, so `{}` is a valid document.
///
/// # JSON Format
///
/// ```json
/// {
///   "device": "iPhone 16",
///   "mode": { "kind": "gradient", "steps": 10 },
///   "coverSize": 900,
///   "coverPosition": 1100,
///   "cornerRadius": 40
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct WallpaperSettings {
    /// Device profile name, matched case-insensitively.
    pub device: String,

    pub mode: ModeSettings,

    /// Edge length of the cover in pixels (600-1200).
    pub cover_size: u32,

    /// Distance of the cover from the top of the frame, in pixels.
    pub cover_position: u32,

    /// Corner radius of the cover window in pixels (0-200).
    pub corner_radius: u32,

    /// Drop shadow. `None` means no shadow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowSettings>,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        let geometry = CoverGeometry::default();
        Self {
            device: DeviceProfile::default().name.to_string(),
            mode: ModeSettings::default(),
            cover_size: geometry.size,
            cover_position: geometry.position_y,
            corner_radius: geometry.corner_radius,
            shadow: None,
        }
    }
}

impl WallpaperSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_mode(mut self, mode: ModeSettings) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_geometry(mut self, geometry: CoverGeometry) -> Self {
        self.cover_size = geometry.size;
        self.cover_position = geometry.position_y;
        self.corner_radius = geometry.corner_radius;
        self
    }

    pub fn with_shadow(mut self, shadow: ShadowSettings) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// The cover controls as given, before any clamping.
    pub fn geometry(&self) -> CoverGeometry {
        CoverGeometry::new(self.cover_size, self.corner_radius, self.cover_position)
    }

    /// Resolves the settings into engine parameters.
    ///
    /// Fails only for an unknown device. Cover controls are clamped into
    /// their ranges, and the position is clamped so the cover fits the frame.
    pub fn to_request(&self) -> WallpaperResult<RenderRequest> {
        let device = DeviceProfile::lookup(&self.device)?;
        let geometry = self.geometry().within_controls(&device);
        let mut request = RenderRequest::new(self.mode.into(), device, geometry);
        request.shadow = self.shadow.map(CoverShadow::from);
        Ok(request)
    }

    /// Serializes the settings to a JSON string.
    pub fn to_json(&self) -> WallpaperResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the settings to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> WallpaperResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes settings from a JSON string.
    pub fn from_json(json: &str) -> WallpaperResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&RenderRequest> for WallpaperSettings {
    fn from(request: &RenderRequest) -> Self {
        Self {
            device: request.device.name.to_string(),
            mode: request.mode.into(),
            cover_size: request.geometry.size,
            cover_position: request.geometry.position_y,
            corner_radius: request.geometry.corner_radius,
            shadow: request.shadow.map(ShadowSettings::from),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

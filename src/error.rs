//! Error type shared by every stage of the wallpaper pipeline.

pub type WallpaperResult<T> = Result<T, WallpaperError>;

#[derive(thiserror::Error, Debug)]
pub enum WallpaperError {
    /// The source image bytes could not be turned into pixels.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// The album art lookup failed before the engine was invoked.
    #[error("resolution error: {0}")]
    Resolution(String),

    #[error("unknown device profile: {0}")]
    UnknownDevice(String),

    #[error("no source image loaded")]
    NoSource,

    /// The raster backend refused a surface or path.
    #[error("render error: {0}")]
    Render(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

impl WallpaperError {
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    pub fn unknown_device(name: impl Into<String>) -> Self {
        Self::UnknownDevice(name.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WallpaperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

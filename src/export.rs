//! Encoding and writing finished wallpapers.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::engine::CompositionResult;
use crate::error::{WallpaperError, WallpaperResult};

/// File name used when the caller does not pick one.
pub const DEFAULT_FILE_NAME: &str = "iphone-wallpaper.png";

const JPEG_QUALITY: u8 = 92;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    /// Lossless RGBA.
    #[default]
    Png,
    /// Lossy RGB. Alpha is dropped; wallpapers are opaque anyway.
    Jpeg,
}

impl ExportFormat {
    /// Matches a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Infers the format from a path. A path without an extension is PNG.
    pub fn from_path(path: &Path) -> WallpaperResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None => Ok(Self::Png),
            Some(ext) => Self::from_extension(ext).ok_or_else(|| {
                WallpaperError::export(format!("unsupported output extension: .{ext}"))
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        })
    }
}

/// Encodes a wallpaper into `format` bytes.
pub fn encode(result: &CompositionResult, format: ExportFormat) -> WallpaperResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => result
            .image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| WallpaperError::export(format!("PNG encoding failed: {e}")))?,
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(result.image().clone()).into_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(|e| WallpaperError::export(format!("JPEG encoding failed: {e}")))?
        }
    }
    Ok(bytes)
}

/// Sink for finished wallpapers.
pub trait Exporter {
    fn export(&self, result: &CompositionResult) -> WallpaperResult<()>;
}

/// Writes wallpapers to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExporter {
    path: PathBuf,
    format: ExportFormat,
}

impl Default for FileExporter {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE_NAME),
            format: ExportFormat::Png,
        }
    }
}

impl FileExporter {
    /// Writes to `path`, with the format taken from its extension.
    pub fn new(path: impl Into<PathBuf>) -> WallpaperResult<Self> {
        let path = path.into();
        let format = ExportFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Overrides the inferred format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }
}

impl Exporter for FileExporter {
    fn export(&self, result: &CompositionResult) -> WallpaperResult<()> {
        let bytes = encode(result, self.format)?;
        fs::write(&self.path, &bytes).map_err(|e| {
            WallpaperError::export(format!("cannot write {}: {e}", self.path.display()))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            format = %self.format,
            bytes = bytes.len(),
            "wallpaper exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::WallpaperMode;
    use crate::device::DeviceProfile;
    use crate::engine::render;
    use crate::geometry::CoverGeometry;
    use crate::source::SourceImage;
    use image::{Rgba, RgbaImage};

    fn wallpaper() -> CompositionResult {
        let source = SourceImage::new(RgbaImage::from_pixel(16, 16, Rgba([200, 40, 90, 255])));
        render(
            &source,
            &WallpaperMode::gradient(),
            &DeviceProfile::new("tiny", 30, 60),
            &CoverGeometry::new(20, 4, 20),
        )
        .unwrap()
    }

    #[test]
    fn formats_from_extensions() {
        assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::from_extension("jpeg"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("gif"), None);

        assert_eq!(ExportFormat::from_path(Path::new("out/a.JPG")).unwrap(), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("wallpaper")).unwrap(), ExportFormat::Png);
        assert!(matches!(
            ExportFormat::from_path(Path::new("a.webp")).unwrap_err(),
            WallpaperError::Export(_)
        ));
    }

    #[test]
    fn png_decodes_back_to_same_pixels() {
        let result = wallpaper();
        let bytes = encode(&result, ExportFormat::Png).unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(&decoded, result.image());
    }

    #[test]
    fn jpeg_keeps_dimensions() {
        let result = wallpaper();
        let bytes = encode(&result, ExportFormat::Jpeg).unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (30, 60));
    }

    #[test]
    fn default_exporter_targets_png_file() {
        let exporter = FileExporter::default();
        assert_eq!(exporter.path(), Path::new(DEFAULT_FILE_NAME));
        assert_eq!(exporter.format(), ExportFormat::Png);
    }

    #[test]
    fn file_exporter_writes_file() {
        let dir = std::env::temp_dir().join(format!("cover-wallpaper-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wall.jpg");

        let exporter = FileExporter::new(&path).unwrap();
        assert_eq!(exporter.format(), ExportFormat::Jpeg);
        exporter.export(&wallpaper()).unwrap();

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (30, 60));

        let bad = FileExporter::new(dir.join("missing-dir").join("wall.png")).unwrap();
        assert!(matches!(bad.export(&wallpaper()).unwrap_err(), WallpaperError::Export(_)));

        fs::remove_dir_all(&dir).unwrap();
    }
}

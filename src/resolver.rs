//! Album art resolution.
//!
//! The engine never touches the network. A resolver turns a content URL
//! into encoded image bytes before the engine runs; failures surface as
//! [`WallpaperError::Resolution`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WallpaperError, WallpaperResult};
use crate::source::SourceImage;

const URI_PREFIX: &str = "spotify:album:";
const ALBUM_SEGMENT: &str = "album";

/// Encoded cover art plus the album name, as returned by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArt {
    pub image_bytes: Vec<u8>,
    pub display_name: Option<String>,
}

impl ResolvedArt {
    pub fn new(image_bytes: Vec<u8>) -> Self {
        Self {
            image_bytes,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Decodes the bytes, carrying the display name along.
    pub fn decode(&self) -> WallpaperResult<SourceImage> {
        let image = SourceImage::decode(&self.image_bytes)?;
        Ok(match &self.display_name {
            Some(name) => image.with_display_name(name.clone()),
            None => image,
        })
    }
}

/// Turns a content URL into cover art.
pub trait AlbumArtResolver: Send + Sync {
    fn resolve(&self, content_url: &str) -> WallpaperResult<ResolvedArt>;
}

/// Extracts the album id from a share URL or URI.
///
/// Accepts `https://open.spotify.com/album/<id>?si=...` (any host, query and
/// fragment ignored) and `spotify:album:<id>`. The id must be non-empty
/// ASCII alphanumeric.
pub fn parse_album_id(url: &str) -> WallpaperResult<&str> {
    let url = url.trim();
    let id = if let Some(id) = url.strip_prefix(URI_PREFIX) {
        id
    } else {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| WallpaperError::resolution(format!("unrecognized URL: {url}")))?;
        let path = rest.split(['?', '#']).next().unwrap_or_default();

        // first segment is the host
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).skip(1).collect();
        match segments.as_slice() {
            [.., ALBUM_SEGMENT, id] => *id,
            _ => {
                return Err(WallpaperError::resolution(format!(
                    "not an album URL: {url}"
                )));
            }
        }
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(WallpaperError::resolution(format!("invalid album id: {id:?}")));
    }
    Ok(id)
}

// ============================================================================
// File Resolver
// ============================================================================

/// Reads cover art from local disk.
///
/// Accepts `file://` URLs and plain paths. Relative paths are taken from
/// `base` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    base: Option<PathBuf>,
}

impl FileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn path_for(&self, content_url: &str) -> PathBuf {
        let raw = content_url.trim();
        let path = Path::new(raw.strip_prefix("file://").unwrap_or(raw));
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl AlbumArtResolver for FileResolver {
    fn resolve(&self, content_url: &str) -> WallpaperResult<ResolvedArt> {
        let path = self.path_for(content_url);
        tracing::debug!(path = %path.display(), "reading cover art");

        let bytes = fs::read(&path).map_err(|err| {
            WallpaperError::resolution(format!("cannot read {}: {err}", path.display()))
        })?;

        let art = ResolvedArt::new(bytes);
        Ok(match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => art.with_display_name(stem),
            None => art,
        })
    }
}

// ============================================================================
// Memory Resolver
// ============================================================================

/// Serves cover art from memory, keyed by album id.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    albums: HashMap<String, ResolvedArt>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, album_id: impl Into<String>, art: ResolvedArt) {
        self.albums.insert(album_id.into(), art);
    }

    pub fn with_album(mut self, album_id: impl Into<String>, art: ResolvedArt) -> Self {
        self.insert(album_id, art);
        self
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}

impl AlbumArtResolver for MemoryResolver {
    fn resolve(&self, content_url: &str) -> WallpaperResult<ResolvedArt> {
        let id = parse_album_id(content_url)?;
        self.albums
            .get(id)
            .cloned()
            .ok_or_else(|| WallpaperError::resolution(format!("unknown album: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(6, 6, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn parses_share_urls() {
        assert_eq!(
            parse_album_id("https://open.spotify.com/album/4m2880jivSbbyEGAKfITCa?si=abc123").unwrap(),
            "4m2880jivSbbyEGAKfITCa"
        );
        assert_eq!(
            parse_album_id("https://open.spotify.com/intl-de/album/1ATL5GLyefJaxhQzSPVrLX").unwrap(),
            "1ATL5GLyefJaxhQzSPVrLX"
        );
        assert_eq!(
            parse_album_id("  https://open.spotify.com/album/abc/#top ").unwrap(),
            "abc"
        );
        assert_eq!(parse_album_id("spotify:album:XYZ09").unwrap(), "XYZ09");
    }

    #[test]
    fn rejects_malformed_urls() {
        for url in [
            "",
            "open.spotify.com/album/abc",
            "https://open.spotify.com/track/abc",
            "https://open.spotify.com/album/",
            "https://open.spotify.com/album/ab-cd",
            "https://album/abc",
            "spotify:album:",
            "spotify:album:a b",
            "ftp://open.spotify.com/album/abc",
        ] {
            let err = parse_album_id(url).unwrap_err();
            assert!(matches!(err, WallpaperError::Resolution(_)), "{url:?}");
        }
    }

    #[test]
    fn resolved_art_decodes_with_name() {
        let art = ResolvedArt::new(png_bytes()).with_display_name("Fiction");
        let image = art.decode().unwrap();
        assert_eq!(image.width(), 6);
        assert_eq!(image.display_name(), Some("Fiction"));

        let broken = ResolvedArt::new(vec![1, 2, 3]);
        assert!(matches!(broken.decode().unwrap_err(), WallpaperError::ImageDecode(_)));
    }

    #[test]
    fn file_resolver_reads_paths_and_file_urls() {
        let dir = std::env::temp_dir().join(format!("cover-wallpaper-resolver-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Night Drive.png");
        fs::write(&path, png_bytes()).unwrap();

        let resolver = FileResolver::new();
        let plain = resolver.resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(plain.display_name.as_deref(), Some("Night Drive"));
        assert_eq!(plain.image_bytes, png_bytes());

        let url = format!("file://{}", path.display());
        assert_eq!(resolver.resolve(&url).unwrap(), plain);

        let relative = FileResolver::with_base(&dir).resolve("Night Drive.png").unwrap();
        assert_eq!(relative, plain);

        let missing = resolver.resolve(dir.join("missing.png").to_str().unwrap());
        assert!(matches!(missing.unwrap_err(), WallpaperError::Resolution(_)));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn memory_resolver_looks_up_by_album_id() {
        let resolver = MemoryResolver::new()
            .with_album("abc123", ResolvedArt::new(png_bytes()).with_display_name("Fiction"));
        assert_eq!(resolver.len(), 1);

        let art = resolver
            .resolve("https://open.spotify.com/album/abc123?si=x")
            .unwrap();
        assert_eq!(art.display_name.as_deref(), Some("Fiction"));
        assert_eq!(resolver.resolve("spotify:album:abc123").unwrap(), art);

        let err = resolver.resolve("spotify:album:other").unwrap_err();
        assert!(matches!(err, WallpaperError::Resolution(_)));
    }
}

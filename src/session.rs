//! Stateful wrapper around the engine for interactive callers.

use crate::background::WallpaperMode;
use crate::compositor::CoverShadow;
use crate::device::DeviceProfile;
use crate::engine::{CompositionResult, RenderRequest, render_request};
use crate::error::{WallpaperError, WallpaperResult};
use crate::generation::{Generation, GenerationCounter};
use crate::geometry::CoverGeometry;
use crate::resolver::{AlbumArtResolver, ResolvedArt};
use crate::settings::WallpaperSettings;
use crate::source::SourceImage;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from [`WallpaperSettings`].
pub trait Configurable {
    /// Applies settings. On error nothing is changed.
    fn apply_settings(&mut self, settings: &WallpaperSettings) -> WallpaperResult<()>;

    /// Exports the current parameters as settings.
    fn export_settings(&self) -> WallpaperSettings;
}

// ============================================================================
// RenderKey
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ModeKey {
    Gradient { steps: usize },
    Frosted { blur_bits: u32, mask_bits: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ShadowKey {
    color: [u8; 4],
    blur_bits: u32,
    offset_x_bits: u32,
    offset_y_bits: u32,
}

/// Identifies one render: the source version plus every parameter.
///
/// Float parameters are compared by their bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    source_version: u64,
    device: DeviceProfile,
    geometry: CoverGeometry,
    mode: ModeKey,
    shadow: Option<ShadowKey>,
}

impl RenderKey {
    pub fn new(source_version: u64, request: &RenderRequest) -> Self {
        let mode = match request.mode {
            WallpaperMode::Gradient(config) => ModeKey::Gradient {
                steps: config.steps,
            },
            WallpaperMode::Frosted(config) => ModeKey::Frosted {
                blur_bits: config.blur_radius.to_bits(),
                mask_bits: config.mask_opacity.to_bits(),
            },
        };
        let shadow = request.shadow.map(|s| ShadowKey {
            color: s.color.0,
            blur_bits: s.blur.to_bits(),
            offset_x_bits: s.offset_x.to_bits(),
            offset_y_bits: s.offset_y.to_bits(),
        });
        Self {
            source_version,
            device: request.device,
            geometry: request.geometry,
            mode,
            shadow,
        }
    }
}

// ============================================================================
// WallpaperSession
// ============================================================================

/// Holds the current cover and parameters and caches the last wallpaper.
///
/// Every setter just records the new value; [`render`](Self::render) reruns
/// the engine only when the source or a parameter actually changed.
///
/// Cover loads are tracked by generation: when several loads overlap, only
/// the one started last is kept.
///
/// # Example
///
/// ```
/// use cover_wallpaper::{CoverGeometry, SourceImage, WallpaperSession};
/// use image::{Rgba, RgbaImage};
///
/// let mut session = WallpaperSession::new();
/// session.set_source(SourceImage::new(RgbaImage::from_pixel(8, 8, Rgba([40, 80, 60, 255]))));
/// session.set_geometry(CoverGeometry::new(900, 100, 1100));
///
/// let wallpaper = session.render().unwrap();
/// assert_eq!(wallpaper.image().dimensions(), (1290, 2796));
/// ```
#[derive(Debug, Default)]
pub struct WallpaperSession {
    source: Option<SourceImage>,
    source_version: u64,
    request: RenderRequest,
    cache: Option<(RenderKey, CompositionResult)>,
    loads: GenerationCounter,
}

impl WallpaperSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(request: RenderRequest) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn request(&self) -> &RenderRequest {
        &self.request
    }

    /// Replaces the cover. Always invalidates the cached wallpaper.
    pub fn set_source(&mut self, source: SourceImage) {
        self.source = Some(source);
        self.source_version += 1;
    }

    pub fn set_mode(&mut self, mode: WallpaperMode) {
        self.request.mode = mode;
    }

    pub fn set_device(&mut self, device: DeviceProfile) {
        self.request.device = device;
    }

    pub fn set_geometry(&mut self, geometry: CoverGeometry) {
        self.request.geometry = geometry;
    }

    pub fn set_shadow(&mut self, shadow: Option<CoverShadow>) {
        self.request.shadow = shadow;
    }

    /// Starts a cover load, superseding any load still in flight.
    pub fn begin_load(&self) -> Generation {
        self.loads.begin()
    }

    /// Completes a load started with [`begin_load`](Self::begin_load).
    ///
    /// Returns `Ok(false)` if a later load has started since; the result is
    /// dropped, errors included. Otherwise the art is decoded and becomes
    /// the new source.
    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: WallpaperResult<ResolvedArt>,
    ) -> WallpaperResult<bool> {
        if !self.loads.is_current(generation) {
            tracing::warn!(
                generation = generation.value(),
                latest = self.loads.latest().map(|g| g.value()),
                "dropping stale cover load"
            );
            return Ok(false);
        }

        let source = result?.decode()?;
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            name = source.display_name(),
            "cover loaded"
        );
        self.set_source(source);
        Ok(true)
    }

    /// Resolves `content_url` and loads the result as the new source.
    pub fn load_from(
        &mut self,
        resolver: &dyn AlbumArtResolver,
        content_url: &str,
    ) -> WallpaperResult<()> {
        let generation = self.begin_load();
        let result = resolver.resolve(content_url);
        self.finish_load(generation, result).map(|_| ())
    }

    /// True if [`render`](Self::render) would return the cached wallpaper.
    pub fn is_cached(&self) -> bool {
        let key = RenderKey::new(self.source_version, &self.request);
        matches!(&self.cache, Some((cached, _)) if *cached == key)
    }

    /// Returns the wallpaper for the current source and parameters.
    ///
    /// Fails with [`WallpaperError::NoSource`] before any cover is loaded.
    pub fn render(&mut self) -> WallpaperResult<&CompositionResult> {
        let source = self.source.as_ref().ok_or(WallpaperError::NoSource)?;
        let key = RenderKey::new(self.source_version, &self.request);

        let hit = matches!(&self.cache, Some((cached, _)) if *cached == key);
        if !hit {
            let result = render_request(source, &self.request)?;
            self.cache = Some((key, result));
        }

        match &self.cache {
            Some((_, result)) => Ok(result),
            None => Err(WallpaperError::render("render cache is empty")),
        }
    }

    /// Drops the cached wallpaper. Useful for freeing memory.
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }
}

impl Configurable for WallpaperSession {
    fn apply_settings(&mut self, settings: &WallpaperSettings) -> WallpaperResult<()> {
        self.request = settings.to_request()?;
        Ok(())
    }

    fn export_settings(&self) -> WallpaperSettings {
        WallpaperSettings::from(&self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::FrostedConfig;
    use crate::resolver::MemoryResolver;
    use crate::settings::ModeSettings;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    const SMALL: DeviceProfile = DeviceProfile::new("small", 60, 100);

    fn solid(r: u8, g: u8, b: u8) -> SourceImage {
        SourceImage::new(RgbaImage::from_pixel(8, 8, Rgba([r, g, b, 255])))
    }

    fn png_art(r: u8, g: u8, b: u8) -> ResolvedArt {
        let img = RgbaImage::from_pixel(8, 8, Rgba([r, g, b, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        ResolvedArt::new(bytes)
    }

    fn small_session() -> WallpaperSession {
        WallpaperSession::with_request(RenderRequest::new(
            WallpaperMode::gradient(),
            SMALL,
            CoverGeometry::new(40, 6, 30),
        ))
    }

    #[test]
    fn render_without_source_fails() {
        let mut session = small_session();
        assert!(matches!(session.render().unwrap_err(), WallpaperError::NoSource));
    }

    #[test]
    fn unchanged_parameters_hit_the_cache() {
        let mut session = small_session();
        session.set_source(solid(40, 80, 60));
        assert!(!session.is_cached());

        let first = session.render().unwrap().clone();
        assert!(session.is_cached());

        session.set_geometry(CoverGeometry::new(40, 6, 30));
        assert!(session.is_cached());
        assert_eq!(session.render().unwrap(), &first);
    }

    #[test]
    fn any_change_misses_the_cache() {
        let mut session = small_session();
        session.set_source(solid(40, 80, 60));
        session.render().unwrap();

        session.set_geometry(CoverGeometry::new(40, 6, 31));
        assert!(!session.is_cached());
        session.render().unwrap();

        session.set_mode(WallpaperMode::Frosted(FrostedConfig::new(4.0, 0.4)));
        assert!(!session.is_cached());
        session.render().unwrap();

        session.set_shadow(Some(CoverShadow::default()));
        assert!(!session.is_cached());
        session.render().unwrap();

        // same pixels, new source
        session.set_source(solid(40, 80, 60));
        assert!(!session.is_cached());

        session.clear_cache();
        assert!(!session.is_cached());
    }

    #[test]
    fn stale_load_is_dropped() {
        let mut session = small_session();
        let slow = session.begin_load();
        let fast = session.begin_load();

        assert!(session.finish_load(fast, Ok(png_art(1, 2, 3))).unwrap());
        assert!(!session.finish_load(slow, Ok(png_art(200, 200, 200))).unwrap());

        let pixel = session.source().unwrap().pixels().get_pixel(0, 0);
        assert_eq!(pixel.0, [1, 2, 3, 255]);
    }

    #[test]
    fn stale_error_is_dropped_too() {
        let mut session = small_session();
        let slow = session.begin_load();
        let _fast = session.begin_load();

        let stale = session.finish_load(slow, Err(WallpaperError::resolution("timeout")));
        assert!(!stale.unwrap());
        assert!(session.source().is_none());
    }

    #[test]
    fn current_load_errors_surface() {
        let mut session = small_session();
        let generation = session.begin_load();
        let err = session
            .finish_load(generation, Ok(ResolvedArt::new(vec![0, 1, 2])))
            .unwrap_err();
        assert!(matches!(err, WallpaperError::ImageDecode(_)));
    }

    #[test]
    fn load_from_resolver() {
        let resolver = MemoryResolver::new()
            .with_album("abc123", png_art(40, 80, 60).with_display_name("Fiction"));

        let mut session = small_session();
        session
            .load_from(&resolver, "https://open.spotify.com/album/abc123?si=1")
            .unwrap();
        assert_eq!(session.source().unwrap().display_name(), Some("Fiction"));

        let result = session.render().unwrap();
        assert_eq!(result.image().dimensions(), (60, 100));

        let err = session.load_from(&resolver, "spotify:album:nope").unwrap_err();
        assert!(matches!(err, WallpaperError::Resolution(_)));
        // a failed load keeps the previous cover
        assert!(session.source().is_some());
    }

    #[test]
    fn settings_apply_and_export() {
        let mut session = WallpaperSession::new();
        let settings = WallpaperSettings::new()
            .with_device("iPhone 16")
            .with_mode(ModeSettings::frosted())
            .with_geometry(CoverGeometry::new(800, 60, 1000));

        session.apply_settings(&settings).unwrap();
        assert_eq!(session.request().device.width, 1179);
        assert_eq!(session.request().mode, WallpaperMode::frosted());
        assert_eq!(session.export_settings(), settings);

        let before = *session.request();
        let err = session
            .apply_settings(&WallpaperSettings::new().with_device("Galaxy"))
            .unwrap_err();
        assert!(matches!(err, WallpaperError::UnknownDevice(_)));
        assert_eq!(*session.request(), before);
    }
}

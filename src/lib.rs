//! cover-wallpaper: phone wallpapers from square cover art
//!
//! This crate turns a piece of album art into a wallpaper at a phone's exact
//! resolution. The cover sits in a rounded window, horizontally centered, on
//! top of a background derived from the cover itself: either a vertical
//! gradient of its dominant color, or a blurred, flipped and darkened
//! enlargement of the cover.
//!
//! # Example
//!
//! ```
//! use cover_wallpaper::{CoverGeometry, DeviceProfile, SourceImage, WallpaperMode, render};
//! use image::{Rgba, RgbaImage};
//!
//! let cover = SourceImage::new(RgbaImage::from_pixel(64, 64, Rgba([40, 80, 60, 255])));
//! let device = DeviceProfile::lookup("iPhone 16").unwrap();
//!
//! let wallpaper = render(
//!     &cover,
//!     &WallpaperMode::gradient(),
//!     &device,
//!     &CoverGeometry::new(900, 100, 1100),
//! )
//! .unwrap();
//!
//! assert_eq!(wallpaper.image().dimensions(), (1179, 2556));
//! assert_eq!(wallpaper.placement().x, 139.5);
//! ```
//!
//! # Settings and Sessions
//!
//! Front ends keep their parameters in [`WallpaperSettings`], a JSON
//! document, and drive a [`WallpaperSession`] through the [`Configurable`]
//! trait. The session caches the last wallpaper and drops stale cover loads:
//!
//! ```
//! use cover_wallpaper::{
//!     Configurable, MemoryResolver, ResolvedArt, WallpaperSession, WallpaperSettings,
//! };
//! # use image::{ImageFormat, Rgba, RgbaImage};
//! # let mut png = Vec::new();
//! # RgbaImage::from_pixel(8, 8, Rgba([200, 40, 90, 255]))
//! #     .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
//! #     .unwrap();
//!
//! let resolver = MemoryResolver::new().with_album("4m2880jivSbbyEGAKfITCa", ResolvedArt::new(png));
//!
//! let mut session = WallpaperSession::new();
//! let settings = WallpaperSettings::from_json(r#"{"device":"iPhone 15","coverSize":800}"#).unwrap();
//! session.apply_settings(&settings).unwrap();
//! session
//!     .load_from(&resolver, "https://open.spotify.com/album/4m2880jivSbbyEGAKfITCa?si=x")
//!     .unwrap();
//!
//! let wallpaper = session.render().unwrap();
//! assert_eq!(wallpaper.image().dimensions(), (1179, 2556));
//! ```

pub mod background;
pub mod blur;
mod color;
mod compositor;
mod device;
mod engine;
mod error;
mod export;
mod generation;
mod geometry;
pub mod raster;
mod resolver;
mod session;
mod settings;
mod source;

pub use background::{
    BackgroundInput, FrostedConfig, GradientConfig, GradientStop, MAX_GRADIENT_STEPS,
    WallpaperMode, generate_background, gradient_stops, render_background,
};
pub use blur::MAX_SIGMA;
pub use color::{DominantColor, darken_channel, extract_dominant_color, lighten_channel};
pub use compositor::{
    CoverShadow, PLATE_COLOR, PathSegment, Point, RoundedRectPath, composite_cover,
};
pub use device::{DEVICE_PROFILES, DeviceProfile};
pub use engine::{CompositionResult, RenderRequest, render, render_request};
pub use error::{WallpaperError, WallpaperResult};
pub use export::{DEFAULT_FILE_NAME, ExportFormat, Exporter, FileExporter, encode};
pub use generation::{Generation, GenerationCounter};
pub use geometry::{CORNER_RADIUS_RANGE, COVER_SIZE_RANGE, CoverGeometry, CoverPlacement};
pub use resolver::{AlbumArtResolver, FileResolver, MemoryResolver, ResolvedArt, parse_album_id};
pub use session::{Configurable, RenderKey, WallpaperSession};
pub use settings::{
    FrostedSettings, GradientSettings, ModeSettings, ShadowSettings, WallpaperSettings,
};
pub use source::{SizePx, SourceImage};

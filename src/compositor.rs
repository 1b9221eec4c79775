//! Cover compositing inside a rounded-rectangle window.
//!
//! The window outline is described declaratively by [`RoundedRectPath`] and
//! only turned into a backend path at draw time. Drawing happens in this
//! order:
//!
//! 1. optional drop shadow under the window
//! 2. opaque plate filling the window, so the anti-aliased rim never shows
//!    the background through a half-covered cover pixel
//! 3. the cover, scaled to `size x size` and clipped to the window

use std::fmt;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, Path, PathBuilder, PixmapPaint, Transform,
};

use crate::blur::gaussian_blur_gray;
use crate::error::{WallpaperError, WallpaperResult};
use crate::geometry::CoverPlacement;
use crate::raster::{
    fill_over_with_coverage, mask_to_gray_image, pixmap_to_rgba_image, rgba_image_to_pixmap,
};
use crate::source::SourceImage;

/// Color of the plate drawn under the cover.
pub const PLATE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

// ============================================================================
// Path description
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One drawing command of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through `ctrl` ending at `to`.
    QuadTo { ctrl: Point, to: Point },
    Close,
}

/// Outline of a square with four quadratic corners.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectPath {
    segments: Vec<PathSegment>,
}

impl RoundedRectPath {
    /// Builds the outline of a `size x size` square anchored at `(x, y)`.
    ///
    /// The radius is clamped to `[0, size / 2]`. At 0 the corners collapse
    /// into a plain square, at `size / 2` the straight edges vanish and the
    /// outline becomes a circle-like closed curve.
    pub fn new(x: f32, y: f32, size: f32, radius: f32) -> Self {
        let size = size.max(0.0);
        let r = radius.clamp(0.0, size / 2.0);
        let (right, bottom) = (x + size, y + size);
        let p = Point::new;

        let segments = vec![
            PathSegment::MoveTo(p(x + r, y)),
            PathSegment::LineTo(p(right - r, y)),
            PathSegment::QuadTo {
                ctrl: p(right, y),
                to: p(right, y + r),
            },
            PathSegment::LineTo(p(right, bottom - r)),
            PathSegment::QuadTo {
                ctrl: p(right, bottom),
                to: p(right - r, bottom),
            },
            PathSegment::LineTo(p(x + r, bottom)),
            PathSegment::QuadTo {
                ctrl: p(x, bottom),
                to: p(x, bottom - r),
            },
            PathSegment::LineTo(p(x, y + r)),
            PathSegment::QuadTo {
                ctrl: p(x, y),
                to: p(x + r, y),
            },
            PathSegment::Close,
        ];

        Self { segments }
    }

    pub fn from_placement(placement: &CoverPlacement) -> Self {
        Self::new(
            placement.x,
            placement.y,
            placement.size,
            placement.corner_radius,
        )
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Axis-aligned bounds of every point and control point, as
    /// `(min, max)`.
    pub fn bounds(&self) -> (Point, Point) {
        let mut min = Point::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        let mut include = |pt: &Point| {
            min.x = min.x.min(pt.x);
            min.y = min.y.min(pt.y);
            max.x = max.x.max(pt.x);
            max.y = max.y.max(pt.y);
        };
        for segment in &self.segments {
            match segment {
                PathSegment::MoveTo(pt) | PathSegment::LineTo(pt) => include(pt),
                PathSegment::QuadTo { ctrl, to } => {
                    include(ctrl);
                    include(to);
                }
                PathSegment::Close => {}
            }
        }
        (min, max)
    }

    /// Builds the backend path, offset by `(dx, dy)`.
    pub fn to_skia_path(&self, dx: f32, dy: f32) -> WallpaperResult<Path> {
        let mut pb = PathBuilder::new();
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(pt) => pb.move_to(pt.x + dx, pt.y + dy),
                PathSegment::LineTo(pt) => pb.line_to(pt.x + dx, pt.y + dy),
                PathSegment::QuadTo { ctrl, to } => {
                    pb.quad_to(ctrl.x + dx, ctrl.y + dy, to.x + dx, to.y + dy)
                }
                PathSegment::Close => pb.close(),
            }
        }
        pb.finish()
            .ok_or_else(|| WallpaperError::render("cover window path is empty"))
    }
}

/// SVG path data, e.g. `M 139.5 1100 L ... Z`.
impl fmt::Display for RoundedRectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match segment {
                PathSegment::MoveTo(p) => write!(f, "M {} {}", p.x, p.y)?,
                PathSegment::LineTo(p) => write!(f, "L {} {}", p.x, p.y)?,
                PathSegment::QuadTo { ctrl, to } => {
                    write!(f, "Q {} {} {} {}", ctrl.x, ctrl.y, to.x, to.y)?
                }
                PathSegment::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Shadow
// ============================================================================

/// Drop shadow cast by the cover plate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverShadow {
    pub color: Rgba<u8>,
    /// Blur extent. The Gaussian sigma is half of this.
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for CoverShadow {
    fn default() -> Self {
        Self {
            color: Rgba([0, 0, 0, 77]),
            blur: 40.0,
            offset_x: 0.0,
            offset_y: 20.0,
        }
    }
}

fn draw_shadow(
    background: &mut RgbaImage,
    path: &RoundedRectPath,
    shadow: &CoverShadow,
) -> WallpaperResult<()> {
    let (width, height) = background.dimensions();
    let mut mask = Mask::new(width, height)
        .ok_or_else(|| WallpaperError::render("cannot allocate shadow mask"))?;
    let offset_path = path.to_skia_path(shadow.offset_x, shadow.offset_y)?;
    mask.fill_path(&offset_path, FillRule::Winding, true, Transform::identity());

    let coverage = gaussian_blur_gray(&mask_to_gray_image(&mask)?, shadow.blur / 2.0);
    fill_over_with_coverage(background, shadow.color, &coverage);
    Ok(())
}

// ============================================================================
// Compositing
// ============================================================================

/// Draws `cover` into the rounded window described by `placement`.
///
/// The background is consumed and the composited frame returned; its size
/// is unchanged.
pub fn composite_cover(
    background: RgbaImage,
    cover: &SourceImage,
    placement: &CoverPlacement,
    shadow: Option<&CoverShadow>,
) -> WallpaperResult<RgbaImage> {
    if cover.dimensions().is_empty() {
        return Err(WallpaperError::image_decode("cannot composite an empty cover"));
    }

    let window = RoundedRectPath::from_placement(placement);
    let mut background = background;
    if let Some(shadow) = shadow {
        draw_shadow(&mut background, &window, shadow)?;
    }

    let mut frame = rgba_image_to_pixmap(&background)?;
    let path = window.to_skia_path(0.0, 0.0)?;

    let mut plate = Paint::default();
    plate.set_color_rgba8(PLATE_COLOR[0], PLATE_COLOR[1], PLATE_COLOR[2], PLATE_COLOR[3]);
    plate.anti_alias = true;
    frame.fill_path(&path, &plate, FillRule::Winding, Transform::identity(), None);

    let mut clip = Mask::new(frame.width(), frame.height())
        .ok_or_else(|| WallpaperError::render("cannot allocate clip mask"))?;
    clip.fill_path(&path, FillRule::Winding, true, Transform::identity());

    let cover_pixmap = rgba_image_to_pixmap(cover.pixels())?;
    let transform = Transform::from_row(
        placement.size / cover.width() as f32,
        0.0,
        0.0,
        placement.size / cover.height() as f32,
        placement.x,
        placement.y,
    );
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    frame.draw_pixmap(0, 0, cover_pixmap.as_ref(), &paint, transform, Some(&clip));

    Ok(pixmap_to_rgba_image(&frame))
}

// ============================================================================
// Tests
// ============================================================================

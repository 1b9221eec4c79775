//! Pixel buffer helpers shared by the background and compositor stages.
//!
//! `image` buffers hold straight alpha while `tiny_skia` pixmaps are
//! premultiplied, so every crossing between the two goes through here.

use image::{GrayImage, Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, IntSize, Mask, Pixmap};

use crate::error::{WallpaperError, WallpaperResult};

// ============================================================================
// Buffer conversion
// ============================================================================

/// Copies an RGBA image into a premultiplied pixmap.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> WallpaperResult<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height()).ok_or_else(|| {
        WallpaperError::render(format!(
            "cannot build a {}x{} pixmap",
            img.width(),
            img.height()
        ))
    })?;

    let mut data = Vec::with_capacity(img.as_raw().len());
    for pixel in img.pixels() {
        let [r, g, b, a] = pixel.0;
        let p = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
    }

    Pixmap::from_vec(data, size)
        .ok_or_else(|| WallpaperError::render("pixmap buffer size mismatch"))
}

/// Converts a premultiplied pixmap back into a straight-alpha RGBA image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // fully transparent pixels carry no color to recover
        if src.alpha() == 0 {
            continue;
        }
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    img
}

/// Copies a coverage mask into a grayscale image so it can be filtered.
pub fn mask_to_gray_image(mask: &Mask) -> WallpaperResult<GrayImage> {
    GrayImage::from_raw(mask.width(), mask.height(), mask.data().to_vec())
        .ok_or_else(|| WallpaperError::render("mask buffer size mismatch"))
}

// ============================================================================
// Compositing
// ============================================================================

/// Draws `src` over `dest`, both anchored at the frame origin.
///
/// Parts of `src` beyond the edges of `dest` are dropped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage) {
    let (width, height) = dest.dimensions();
    for (x, y, pixel) in src.enumerate_pixels() {
        if x < width && y < height {
            let d = dest.get_pixel_mut(x, y);
            *d = blend_over(*pixel, *d);
        }
    }
}

/// Blends one uniform color over every pixel of `dest`.
pub fn fill_over(dest: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in dest.pixels_mut() {
        *pixel = blend_over(color, *pixel);
    }
}

/// Blends `color` over `dest`, scaling its alpha by the per-pixel coverage.
///
/// `coverage` must match the size of `dest`.
pub fn fill_over_with_coverage(dest: &mut RgbaImage, color: Rgba<u8>, coverage: &GrayImage) {
    for (pixel, cov) in dest.pixels_mut().zip(coverage.pixels()) {
        let alpha = (color[3] as u32 * cov[0] as u32 + 127) / 255;
        let src = Rgba([color[0], color[1], color[2], alpha as u8]);
        *pixel = blend_over(src, *pixel);
    }
}

/// Source-over for one straight-alpha pixel, in integer arithmetic.
///
/// Frames are opaque almost everywhere, so an opaque destination takes
/// a shorter path.
pub fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as u32;
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    if dst[3] == 255 {
        let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * (255 - sa) + 127) / 255) as u8;
        return Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255]);
    }

    // weights scaled by 255 * 255
    let dst_weight = dst[3] as u32 * (255 - sa);
    let total = sa * 255 + dst_weight;
    let mix = |s: u8, d: u8| {
        ((s as u32 * sa * 255 + d as u32 * dst_weight + total / 2) / total) as u8
    };
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        ((total + 127) / 255) as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn composite_covers_overlap_only() {
        let mut dest = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(6, 2, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src);

        assert_eq!(dest.get_pixel(3, 1).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn transparent_source_leaves_destination() {
        let dst = Rgba([9, 8, 7, 255]);
        assert_eq!(blend_over(Rgba([255, 255, 255, 0]), dst), dst);
    }

    #[test]
    fn translucent_over_transparent_keeps_color() {
        let out = blend_over(Rgba([100, 0, 0, 128]), Rgba([0, 0, 0, 0]));
        assert_eq!(out.0, [100, 0, 0, 128]);
    }

    #[test]
    fn black_mask_at_forty_percent() {
        let mut dest = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 255]));
        fill_over(&mut dest, Rgba([0, 0, 0, 102]));

        assert_eq!(dest.get_pixel(0, 0).0, [120, 60, 30, 255]);
    }

    #[test]
    fn coverage_scales_alpha() {
        let mut dest = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        let mut coverage = GrayImage::new(2, 1);
        coverage.put_pixel(0, 0, Luma([255]));

        fill_over_with_coverage(&mut dest, Rgba([0, 0, 0, 255]), &coverage);

        assert_eq!(dest.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(dest.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn pixmap_roundtrip_keeps_opaque_pixels() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([12, 34, 56, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 0]));

        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let back = pixmap_to_rgba_image(&pixmap);

        assert_eq!(back, img);
    }

    #[test]
    fn empty_image_has_no_pixmap() {
        let err = rgba_image_to_pixmap(&RgbaImage::new(0, 5)).unwrap_err();
        assert!(matches!(err, WallpaperError::Render(_)));
    }
}

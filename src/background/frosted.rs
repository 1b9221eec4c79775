//! Frosted background: the cover itself, enlarged, blurred, flipped and dimmed.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::blur::{MAX_SIGMA, gaussian_blur_rgba};
use crate::error::{WallpaperError, WallpaperResult};
use crate::raster::{composite_over, fill_over};
use crate::source::{SizePx, SourceImage};

/// Configuration for frosted mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrostedConfig {
    /// Blur standard deviation in frame pixels.
    pub blur_radius: f32,
    /// Opacity of the black mask laid over the blurred backdrop (0.0-1.0).
    pub mask_opacity: f32,
}

impl Default for FrostedConfig {
    fn default() -> Self {
        Self {
            blur_radius: 200.0,
            mask_opacity: 0.4,
        }
    }
}

impl FrostedConfig {
    /// Creates a config. The mask opacity is clamped to 0.0-1.0 and the
    /// blur radius to `0.0..=MAX_SIGMA`.
    pub fn new(blur_radius: f32, mask_opacity: f32) -> Self {
        Self {
            blur_radius: blur_radius.max(0.0).min(MAX_SIGMA),
            mask_opacity: mask_opacity.clamp(0.0, 1.0),
        }
    }

    fn mask_alpha(&self) -> u8 {
        (self.mask_opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Uniform scale that makes `src` cover all of `target`.
pub fn cover_scale(src: SizePx, target: SizePx) -> f64 {
    let sx = target.width as f64 / src.width.max(1) as f64;
    let sy = target.height as f64 / src.height.max(1) as f64;
    sx.max(sy)
}

/// Size of `src` after scaling it to cover `target`.
///
/// Never smaller than `target` on either axis.
pub fn scaled_backdrop_size(src: SizePx, target: SizePx) -> SizePx {
    let scale = cover_scale(src, target);
    let width = (src.width as f64 * scale).ceil() as u32;
    let height = (src.height as f64 * scale).ceil() as u32;
    SizePx::new(width.max(target.width), height.max(target.height))
}

/// Renders the frosted backdrop for `source` at `target` size.
pub fn render_frosted(
    source: &SourceImage,
    config: &FrostedConfig,
    target: SizePx,
) -> WallpaperResult<RgbaImage> {
    let src_size = source.dimensions();
    if src_size.is_empty() {
        return Err(WallpaperError::image_decode("cannot frost an empty image"));
    }
    if target.is_empty() {
        return Err(WallpaperError::render("frosted backdrop needs a non-empty frame"));
    }

    let scaled = scaled_backdrop_size(src_size, target);
    tracing::debug!(
        scale = cover_scale(src_size, target),
        width = scaled.width,
        height = scaled.height,
        "scaling frosted backdrop"
    );

    let resized = imageops::resize(source.pixels(), scaled.width, scaled.height, FilterType::Triangle);
    let offset_x = (scaled.width - target.width) / 2;
    let offset_y = (scaled.height - target.height) / 2;
    let cropped = imageops::crop_imm(&resized, offset_x, offset_y, target.width, target.height).to_image();

    let mut frame = RgbaImage::from_pixel(target.width, target.height, Rgba([0, 0, 0, 255]));
    composite_over(&mut frame, &cropped);

    let blurred = gaussian_blur_rgba(&frame, config.blur_radius);
    let mut flipped = imageops::rotate180(&blurred);
    fill_over(&mut flipped, Rgba([0, 0, 0, config.mask_alpha()]));

    Ok(flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn split_source() -> SourceImage {
        // top half white, bottom half black
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        for y in 0..5 {
            for x in 0..10 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        SourceImage::new(img)
    }

    #[test]
    fn scale_covers_wide_and_tall_sources() {
        let target = SizePx::new(1179, 2556);

        let wide = scaled_backdrop_size(SizePx::new(640, 320), target);
        assert_eq!(wide.height, 2556);
        assert!(wide.width >= 1179);

        let square = scaled_backdrop_size(SizePx::new(640, 640), target);
        assert_eq!(square, SizePx::new(2556, 2556));
    }

    #[test]
    fn backdrop_is_flipped() {
        let config = FrostedConfig::new(0.5, 0.0);
        let out = render_frosted(&split_source(), &config, SizePx::new(20, 20)).unwrap();

        let top = out.get_pixel(10, 1)[0];
        let bottom = out.get_pixel(10, 18)[0];
        assert!(top < 40, "source bottom (black) ends up on top, got {top}");
        assert!(bottom > 215, "source top (white) ends up at the bottom, got {bottom}");
    }

    #[test]
    fn mask_darkens_whole_frame() {
        let source = SourceImage::new(RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255])));
        let out = render_frosted(&source, &FrostedConfig::default(), SizePx::new(12, 30)).unwrap();

        assert_eq!(out.dimensions(), (12, 30));
        assert!(out.pixels().all(|p| p.0 == [120, 60, 30, 255]));
    }

    #[test]
    fn transparent_source_sits_on_black() {
        let source = SourceImage::new(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0])));
        let out = render_frosted(&source, &FrostedConfig::new(1.0, 0.0), SizePx::new(8, 8)).unwrap();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn large_blur_hides_detail() {
        let config = FrostedConfig::new(200.0, 0.0);
        let out = render_frosted(&split_source(), &config, SizePx::new(20, 20)).unwrap();

        let top = out.get_pixel(10, 0)[0] as i32;
        let bottom = out.get_pixel(10, 19)[0] as i32;
        assert!((top - bottom).abs() < 40, "detail should be washed out: {top} vs {bottom}");
    }

    #[test]
    fn blur_radius_is_bounded() {
        assert_eq!(FrostedConfig::new(1.0e9, 0.4).blur_radius, MAX_SIGMA);
        assert_eq!(FrostedConfig::new(f32::NAN, 0.4).blur_radius, 0.0);

        let source = SourceImage::new(RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 255])));
        let out = render_frosted(&source, &FrostedConfig::new(1.0e7, 0.4), SizePx::new(2, 2)).unwrap();
        assert!(out.pixels().all(|p| p.0 == [120, 60, 30, 255]));
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = render_frosted(
            &SourceImage::new(RgbaImage::new(0, 0)),
            &FrostedConfig::default(),
            SizePx::new(4, 4),
        )
        .unwrap_err();
        assert!(matches!(err, WallpaperError::ImageDecode(_)));
    }

    proptest! {
        #[test]
        fn scaled_backdrop_always_covers(
            sw in 1u32..5000,
            sh in 1u32..5000,
            tw in 1u32..3000,
            th in 1u32..3000,
        ) {
            let target = SizePx::new(tw, th);
            let scaled = scaled_backdrop_size(SizePx::new(sw, sh), target);
            prop_assert!(scaled.width >= tw);
            prop_assert!(scaled.height >= th);
        }
    }
}

//! Vertical gradient background derived from the dominant color.

use image::{Rgba, RgbaImage};
use palette::{Mix, Srgb};

use crate::color::DominantColor;
use crate::source::SizePx;

/// Total lighten/darken swing across each half of the ramp, in percent
/// per unit ratio.
const RAMP_STRENGTH: f64 = 30.0;

/// Most intervals a ramp can have.
pub const MAX_GRADIENT_STEPS: usize = 1024;

/// Configuration for gradient mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientConfig {
    /// Number of intervals in the ramp. The ramp has `steps + 1` stops.
    pub steps: usize,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self { steps: 10 }
    }
}

impl GradientConfig {
    /// Creates a config with `steps` clamped to `1..=MAX_GRADIENT_STEPS`.
    pub fn new(steps: usize) -> Self {
        Self {
            steps: steps.clamp(1, MAX_GRADIENT_STEPS),
        }
    }
}

/// One color stop on the ramp. `offset` runs from 0 (top) to 1 (bottom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: DominantColor,
}

/// Builds the evenly spaced stops of the ramp for `base`.
///
/// The upper half lightens the base by up to 15%, the lower half darkens it
/// by up to 15%. `steps` is clamped to `1..=MAX_GRADIENT_STEPS`.
pub fn gradient_stops(base: DominantColor, steps: usize) -> Vec<GradientStop> {
    let steps = steps.clamp(1, MAX_GRADIENT_STEPS);
    (0..=steps)
        .map(|i| {
            let ratio = i as f64 / steps as f64;
            let color = if ratio < 0.5 {
                base.lighten(RAMP_STRENGTH * ratio)
            } else {
                base.darken(RAMP_STRENGTH * (ratio - 0.5))
            };
            GradientStop {
                offset: ratio as f32,
                color,
            }
        })
        .collect()
}

/// Samples the ramp at `t`, interpolating linearly between adjacent stops.
pub fn sample_stops(stops: &[GradientStop], t: f32) -> Srgb<u8> {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Srgb::new(0, 0, 0),
    };
    if t <= first.offset {
        return first.color.into();
    }
    if t >= last.offset {
        return last.color.into();
    }

    let upper = stops.partition_point(|s| s.offset <= t).min(stops.len() - 1);
    let (lo, hi) = (&stops[upper - 1], &stops[upper]);
    let span = hi.offset - lo.offset;
    let factor = if span > 0.0 { (t - lo.offset) / span } else { 0.0 };

    let lo: Srgb<f32> = Srgb::<u8>::from(lo.color).into_format();
    let hi: Srgb<f32> = Srgb::<u8>::from(hi.color).into_format();
    lo.mix(hi, factor).into_format()
}

/// Fills a frame of `size` with the ramp for `base`, top to bottom.
///
/// Each row samples the ramp at its pixel center.
pub fn render_gradient(base: DominantColor, config: &GradientConfig, size: SizePx) -> RgbaImage {
    let stops = gradient_stops(base, config.steps);
    let mut img = RgbaImage::new(size.width, size.height);
    let height = size.height.max(1) as f32;

    for (y, row) in img.enumerate_rows_mut() {
        let t = (y as f32 + 0.5) / height;
        let c = sample_stops(&stops, t);
        let px = Rgba([c.red, c.green, c.blue, 255]);
        for (_, _, pixel) in row {
            *pixel = px;
        }
    }

    img
}

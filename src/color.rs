//! Dominant color extraction and the lighten/darken color ramp math.

use palette::Srgb;

use crate::source::SourceImage;

/// Pixels below this alpha are ignored when sampling the dominant color.
const MIN_SAMPLE_ALPHA: u8 = 125;

/// Bits kept per channel when binning pixels.
const BUCKET_BITS: u32 = 4;
const BUCKETS_PER_CHANNEL: usize = 1 << BUCKET_BITS;

/// Representative color of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DominantColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DominantColor {
    pub const NEUTRAL_GRAY: Self = Self::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Moves every channel `amount` percent of the way towards 255.
    pub fn lighten(&self, amount: f64) -> Self {
        self.map(|c| lighten_channel(c, amount))
    }

    /// Moves every channel `amount` percent of the way towards 0.
    pub fn darken(&self, amount: f64) -> Self {
        self.map(|c| darken_channel(c, amount))
    }

    fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl From<DominantColor> for Srgb<u8> {
    fn from(c: DominantColor) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl From<Srgb<u8>> for DominantColor {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

/// `round(c + (255 - c) * amount / 100)`, clamped to a channel value.
pub fn lighten_channel(c: u8, amount: f64) -> u8 {
    let c = c as f64;
    round_channel(c + (255.0 - c) * amount / 100.0)
}

/// `round(c - c * amount / 100)`, clamped to a channel value.
pub fn darken_channel(c: u8, amount: f64) -> u8 {
    let c = c as f64;
    round_channel(c - c * amount / 100.0)
}

fn round_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u64,
    sum: [u64; 3],
}

/// Finds the dominant color of an image.
///
/// Pixels are binned into a 16x16x16 grid over the RGB cube. The fullest
/// bin wins (lowest index on ties) and its mean color is returned. A single
/// color image therefore returns that exact color.
pub fn extract_dominant_color(image: &SourceImage) -> DominantColor {
    let pixels = image.pixels();
    let has_opaque = pixels.pixels().any(|p| p[3] >= MIN_SAMPLE_ALPHA);
    let min_alpha = if has_opaque { MIN_SAMPLE_ALPHA } else { 0 };

    let mut buckets = vec![Bucket::default(); BUCKETS_PER_CHANNEL.pow(3)];
    for pixel in pixels.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < min_alpha {
            continue;
        }
        let bucket = &mut buckets[bucket_index(r, g, b)];
        bucket.count += 1;
        bucket.sum[0] += r as u64;
        bucket.sum[1] += g as u64;
        bucket.sum[2] += b as u64;
    }

    let mut best: Option<&Bucket> = None;
    for bucket in &buckets {
        if bucket.count > best.map_or(0, |b| b.count) {
            best = Some(bucket);
        }
    }

    let Some(best) = best else {
        return DominantColor::NEUTRAL_GRAY;
    };

    let mean = |sum: u64| ((sum + best.count / 2) / best.count).min(255) as u8;
    DominantColor::new(mean(best.sum[0]), mean(best.sum[1]), mean(best.sum[2]))
}

fn bucket_index(r: u8, g: u8, b: u8) -> usize {
    let shift = 8 - BUCKET_BITS;
    let (r, g, b) = ((r >> shift) as usize, (g >> shift) as usize, (b >> shift) as usize);
    (r * BUCKETS_PER_CHANNEL + g) * BUCKETS_PER_CHANNEL + b
}

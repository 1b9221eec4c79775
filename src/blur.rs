//! Large-radius blur for backdrops and shadows.
//!
//! Three successive box blurs approximate a Gaussian. Each pass is a
//! sliding window, so the cost per pixel does not grow with the radius.
//! Samples past the edge repeat the edge pixel.

use image::{GrayImage, RgbaImage};

const PASSES: usize = 3;

/// Largest standard deviation honored. Larger values are treated as this.
pub const MAX_SIGMA: f32 = 1000.0;

/// Blurs an RGBA image with a Gaussian of standard deviation `sigma`.
pub fn gaussian_blur_rgba(img: &RgbaImage, sigma: f32) -> RgbaImage {
    let (width, height) = img.dimensions();
    let mut samples = img.as_raw().clone();
    blur_samples(&mut samples, width as usize, height as usize, 4, sigma);
    RgbaImage::from_raw(width, height, samples).unwrap_or_else(|| img.clone())
}

/// Blurs a single channel image with a Gaussian of standard deviation `sigma`.
pub fn gaussian_blur_gray(img: &GrayImage, sigma: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut samples = img.as_raw().clone();
    blur_samples(&mut samples, width as usize, height as usize, 1, sigma);
    GrayImage::from_raw(width, height, samples).unwrap_or_else(|| img.clone())
}

/// Box radii whose successive application approximates a Gaussian.
pub fn box_radii_for_gaussian(sigma: f32, passes: usize) -> Vec<usize> {
    if !sigma.is_finite() || sigma <= 0.0 || passes == 0 {
        return Vec::new();
    }
    let n = passes as f64;
    let sigma = sigma.min(MAX_SIGMA) as f64;

    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;

    let lf = lower as f64;
    let m_ideal = (12.0 * sigma * sigma - n * lf * lf - 4.0 * n * lf - 3.0 * n) / (-4.0 * lf - 4.0);
    let m = m_ideal.round().clamp(0.0, n) as usize;

    (0..passes)
        .map(|i| if i < m { lower } else { upper })
        .map(|width| ((width - 1) / 2) as usize)
        .collect()
}

fn blur_samples(samples: &mut [u8], width: usize, height: usize, channels: usize, sigma: f32) {
    if width == 0 || height == 0 {
        return;
    }
    let mut scratch = vec![0u8; samples.len()];

    for radius in box_radii_for_gaussian(sigma, PASSES) {
        if radius == 0 {
            continue;
        }
        // rows
        box_pass(
            samples,
            &mut scratch,
            Lines {
                count: height,
                len: width,
                step: channels,
                line_step: width * channels,
                channels,
            },
            radius,
        );
        // columns
        box_pass(
            &scratch,
            samples,
            Lines {
                count: width,
                len: height,
                step: width * channels,
                line_step: channels,
                channels,
            },
            radius,
        );
    }
}

/// Addressing of a set of parallel lines inside an interleaved buffer.
#[derive(Clone, Copy)]
struct Lines {
    count: usize,
    len: usize,
    step: usize,
    line_step: usize,
    channels: usize,
}

fn box_pass(src: &[u8], dst: &mut [u8], lines: Lines, radius: usize) {
    let window = (2 * radius + 1) as u64;
    let last = lines.len - 1;

    for line in 0..lines.count {
        let base = line * lines.line_step;
        for c in 0..lines.channels {
            let at = |i: usize| src[base + i.min(last) * lines.step + c] as u64;

            // window around 0: `radius` copies of the first sample, the
            // samples up to `radius`, then copies of the last sample
            let reach = radius.min(last);
            let mut sum = radius as u64 * at(0)
                + (0..=reach).map(&at).sum::<u64>()
                + (radius - reach) as u64 * at(last);

            for i in 0..lines.len {
                dst[base + i * lines.step + c] = ((sum + window / 2) / window) as u8;
                let leaving = at(i.saturating_sub(radius));
                sum = sum + at(i + radius + 1) - leaving;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn radii_grow_with_sigma() {
        assert!(box_radii_for_gaussian(0.0, 3).is_empty());
        assert!(box_radii_for_gaussian(f32::NAN, 3).is_empty());

        let small = box_radii_for_gaussian(2.0, 3);
        let large = box_radii_for_gaussian(200.0, 3);
        assert_eq!(small.len(), 3);
        assert!(large.iter().sum::<usize>() > small.iter().sum::<usize>());
        assert!(large.iter().all(|&r| r >= 150));
    }

    #[test]
    fn zero_sigma_is_identity() {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(2, 2, Luma([255]));
        assert_eq!(gaussian_blur_gray(&img, 0.0), img);
    }

    #[test]
    fn constant_image_is_unchanged() {
        let img = RgbaImage::from_pixel(7, 4, Rgba([10, 20, 30, 255]));
        assert_eq!(gaussian_blur_rgba(&img, 50.0), img);
    }

    #[test]
    fn blur_spreads_energy_from_single_pixel() {
        let mut img = GrayImage::new(21, 21);
        img.put_pixel(10, 10, Luma([255]));

        let out = gaussian_blur_gray(&img, 1.5);

        let center = out.get_pixel(10, 10)[0];
        let near = out.get_pixel(11, 10)[0];
        let far = out.get_pixel(20, 20)[0];
        assert!(center < 255);
        assert!(near > 0);
        assert!(center >= near);
        assert_eq!(far, 0);
    }

    #[test]
    fn blur_is_symmetric() {
        let mut img = GrayImage::new(11, 11);
        img.put_pixel(5, 5, Luma([255]));
        let out = gaussian_blur_gray(&img, 2.0);

        assert_eq!(out.get_pixel(3, 5), out.get_pixel(7, 5));
        assert_eq!(out.get_pixel(5, 3), out.get_pixel(5, 7));
    }

    #[test]
    fn huge_sigma_is_capped() {
        assert_eq!(box_radii_for_gaussian(1.0e7, 3), box_radii_for_gaussian(MAX_SIGMA, 3));
        assert_eq!(box_radii_for_gaussian(f32::MAX, 3), box_radii_for_gaussian(MAX_SIGMA, 3));

        let img = GrayImage::from_pixel(2, 2, Luma([255]));
        assert_eq!(gaussian_blur_gray(&img, 1.0e7), img);
        assert_eq!(gaussian_blur_gray(&img, f32::INFINITY), img);
    }

    #[test]
    fn radius_larger_than_image_is_fine() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        let out = gaussian_blur_rgba(&img, 200.0);
        assert_eq!(out.dimensions(), (3, 3));
        assert!(out.pixels().all(|p| p[3] == 255));
    }
}

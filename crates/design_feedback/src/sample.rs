use crate::InputImage;
use std::collections::HashSet;

pub const DEFAULT_SAMPLE_SIZE: u32 = 64;
/// Largest grid side [`sample`] resamples to.
pub const MAX_SAMPLE_SIZE: u32 = 1024;

/// Sampled pixels in structure-of-arrays layout, row-major.
///
/// Channel values are whole numbers in `0.0..=255.0`, stored as `f32` so the
/// clustering loop can accumulate them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledRgbSoA {
    pub width: u32,
    pub height: u32,
    pub r: Vec<f32>,
    pub g: Vec<f32>,
    pub b: Vec<f32>,
}

impl SampledRgbSoA {
    pub fn new(width: u32, height: u32, sample_size: usize) -> Self {
        Self {
            width,
            height,
            r: Vec::with_capacity(sample_size),
            g: Vec::with_capacity(sample_size),
            b: Vec::with_capacity(sample_size),
        }
    }

    #[inline(always)]
    pub fn push(&mut self, r: f32, g: f32, b: f32) {
        self.r.push(r);
        self.g.push(g);
        self.b.push(b);
    }

    #[inline(always)]
    pub fn color(&self, i: usize) -> [f32; 3] {
        [self.r[i], self.g[i], self.b[i]]
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    pub fn distinct_colors(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.len());
        for i in 0..self.len() {
            seen.insert([self.r[i] as u8, self.g[i] as u8, self.b[i] as u8]);
        }
        seen.len()
    }
}

/// For every destination cell along one axis, the source indices it covers and
/// the fraction of the cell each one contributes. Fractions of a cell sum to 1.
///
/// Downscaling averages whole and partial source pixels, upscaling reuses (or
/// blends two neighbouring) source pixels.
fn area_weights(src: u32, dst: u32) -> Vec<Vec<(usize, f64)>> {
    assert!(src > 0);
    assert!(dst > 0);

    let scale = src as f64 / dst as f64;

    (0..dst)
        .map(|t| {
            let start = t as f64 * scale;
            let end = (t + 1) as f64 * scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src as usize);

            (first..last)
                .filter_map(|i| {
                    let overlap = end.min((i + 1) as f64) - start.max(i as f64);
                    (overlap > 0.0).then_some((i, overlap / scale))
                })
                .collect()
        })
        .collect()
}

#[inline(always)]
fn quantize(value: f64) -> f32 {
    value.round_ties_even().clamp(0.0, 255.0) as f32
}

/// Resample the image to a `size`×`size` grid using area averaging. `size` is
/// clamped to `1..=MAX_SAMPLE_SIZE`.
///
/// Grayscale images are expanded to three identical channels first, so a gray
/// pixel always samples to `r == g == b`.
pub fn sample(image: &InputImage, size: u32) -> SampledRgbSoA {
    let size = size.clamp(1, MAX_SAMPLE_SIZE);
    let x_weights = area_weights(image.width(), size);
    let y_weights = area_weights(image.height(), size);

    let num_samples = size as usize * size as usize;
    let mut result = SampledRgbSoA::new(size, size, num_samples);

    for ys in &y_weights {
        for xs in &x_weights {
            let (mut acc_r, mut acc_g, mut acc_b) = (0.0f64, 0.0f64, 0.0f64);

            for &(y, wy) in ys {
                for &(x, wx) in xs {
                    let w = wx * wy;
                    let px = image.pixel(x, y);
                    acc_r += w * px.r as f64;
                    acc_g += w * px.g as f64;
                    acc_b += w * px.b as f64;
                }
            }

            result.push(quantize(acc_r), quantize(acc_g), quantize(acc_b));
        }
    }

    assert_eq!(result.len(), num_samples);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_all_len(soa: &SampledRgbSoA, len: usize) {
        assert_eq!(soa.r.len(), len);
        assert_eq!(soa.g.len(), len);
        assert_eq!(soa.b.len(), len);
    }

    #[test]
    fn new_allocates_capacity() {
        let soa = SampledRgbSoA::new(0, 0, 100);
        assert_eq!(soa.r.capacity(), 100);
        assert_all_len(&soa, 0);
        assert!(soa.is_empty());
    }

    #[test]
    fn push_adds_values() {
        let mut soa = SampledRgbSoA::new(0, 0, 2);
        soa.push(255.0, 0.0, 10.0);
        soa.push(1.0, 2.0, 3.0);
        assert_eq!(soa.r, vec![255.0, 1.0]);
        assert_eq!(soa.b, vec![10.0, 3.0]);
    }

    #[test]
    fn distinct_colors_ignores_repeats() {
        let mut soa = SampledRgbSoA::new(0, 0, 4);
        soa.push(1.0, 2.0, 3.0);
        soa.push(1.0, 2.0, 3.0);
        soa.push(3.0, 2.0, 1.0);
        assert_eq!(soa.distinct_colors(), 2);
    }

    #[test]
    fn weights_identity() {
        let weights = area_weights(4, 4);
        for (t, cell) in weights.iter().enumerate() {
            assert_eq!(cell, &vec![(t, 1.0)]);
        }
    }

    #[test]
    fn weights_sum_to_one() {
        for (src, dst) in [(100, 64), (3, 64), (1000, 64), (65, 64), (1, 1)] {
            for cell in area_weights(src, dst) {
                let total: f64 = cell.iter().map(|&(_, w)| w).sum();
                assert!((total - 1.0).abs() < 1e-9, "{src}->{dst}: {total}");
            }
        }
    }

    #[test]
    fn weights_downscale_halves() {
        let weights = area_weights(4, 2);
        assert_eq!(weights[0], vec![(0, 0.5), (1, 0.5)]);
        assert_eq!(weights[1], vec![(2, 0.5), (3, 0.5)]);
    }

    #[test]
    fn sample_default_grid_size() {
        let buf = vec![128u8; 100 * 100 * 3];
        let image = InputImage::from_rgb_bytes(100, 100, &buf).unwrap();
        let result = sample(&image, DEFAULT_SAMPLE_SIZE);
        assert_all_len(&result, 4096);
        assert_eq!(result.width, 64);
        assert_eq!(result.height, 64);
        assert!(result.r.iter().all(|&v| v == 128.0));
    }

    #[test]
    fn sample_upscales_single_pixel() {
        let image = InputImage::from_rgb_bytes(1, 1, &[10, 20, 30]).unwrap();
        let result = sample(&image, 64);
        assert_all_len(&result, 4096);
        assert_eq!(result.distinct_colors(), 1);
        assert_eq!((result.r[4095], result.g[4095], result.b[4095]), (10.0, 20.0, 30.0));
    }

    #[test]
    fn sample_identity_keeps_pixels() {
        let buf = [255, 0, 0, 0, 255, 0, 0, 0, 255, 9, 9, 9];
        let image = InputImage::from_rgb_bytes(2, 2, &buf).unwrap();
        let result = sample(&image, 2);
        assert_eq!(result.r, vec![255.0, 0.0, 0.0, 9.0]);
        assert_eq!(result.g, vec![0.0, 255.0, 0.0, 9.0]);
        assert_eq!(result.b, vec![0.0, 0.0, 255.0, 9.0]);
    }

    #[test]
    fn sample_averages_area() {
        // 0 and 255 average to 127.5, which rounds half to even
        let image = InputImage::from_rgb_bytes(2, 1, &[0, 0, 0, 255, 255, 255]).unwrap();
        let result = sample(&image, 1);
        assert_eq!(result.r, vec![128.0]);

        let image = InputImage::from_rgb_bytes(2, 1, &[0, 0, 0, 1, 1, 1]).unwrap();
        let result = sample(&image, 1);
        assert_eq!(result.r, vec![0.0]);
    }

    #[test]
    fn sample_expands_grayscale() {
        let buf = [77u8; 10 * 7];
        let image = InputImage::from_gray_bytes(10, 7, &buf).unwrap();
        let result = sample(&image, 8);
        assert_all_len(&result, 64);
        assert!(result.r.iter().all(|&v| v == 77.0));
        assert_eq!(result.r, result.g);
        assert_eq!(result.g, result.b);
    }

    #[test]
    fn sample_is_deterministic() {
        let buf: Vec<u8> = (0..123 * 45 * 3).map(|i| (i * 31 % 256) as u8).collect();
        let image = InputImage::from_rgb_bytes(123, 45, &buf).unwrap();
        assert_eq!(sample(&image, 64), sample(&image, 64));
    }

    #[test]
    fn size_is_clamped() {
        let image = InputImage::from_rgb_bytes(1, 1, &[1, 2, 3]).unwrap();
        assert_all_len(&sample(&image, 0), 1);
        assert_all_len(
            &sample(&image, u32::MAX),
            (MAX_SAMPLE_SIZE * MAX_SAMPLE_SIZE) as usize,
        );
    }
}

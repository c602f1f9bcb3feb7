// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing ahead of Tesseract
//!
//! Steps:
//! 1. Grayscale with BT.601 luma weights
//! 2. Binarize, threshold picked by Otsu's method unless fixed
//! 3. Median filter to remove salt-and-pepper noise left by binarization

use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};

/// Default median filter window (3x3)
pub const DEFAULT_MEDIAN_KERNEL: u32 = 3;

/// Foreground value after binarization
pub const BINARY_MAX: u8 = 255;

/// How the binarization threshold is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Computed per image from its histogram
    Otsu,
    /// Fixed threshold; pixels above it become white
    Fixed(u8),
}

impl Default for ThresholdMode {
    fn default() -> Self {
        ThresholdMode::Otsu
    }
}

impl std::str::FromStr for ThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("otsu") {
            return Ok(ThresholdMode::Otsu);
        }
        s.parse::<u8>()
            .map(ThresholdMode::Fixed)
            .map_err(|_| format!("invalid threshold '{}', expected 'otsu' or 0-255", s))
    }
}

/// Preprocessing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    pub threshold: ThresholdMode,
    /// Median window size, odd; 1 disables the filter
    pub median_kernel: u32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            threshold: ThresholdMode::Otsu,
            median_kernel: DEFAULT_MEDIAN_KERNEL,
        }
    }
}

/// Run the full preprocessing chain
pub fn preprocess(image: &DynamicImage, options: &PreprocessOptions) -> GrayImage {
    let gray = to_grayscale(image);
    let threshold = match options.threshold {
        ThresholdMode::Otsu => otsu_threshold(&gray),
        ThresholdMode::Fixed(t) => t,
    };
    let binary = binarize(&gray, threshold);
    median_filter(&binary, options.median_kernel)
}

/// Convert to 8-bit grayscale using 0.299 R + 0.587 G + 0.114 B
///
/// Alpha is dropped without compositing.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        gray.put_pixel(x, y, Luma([luma.round().min(255.0) as u8]));
    }

    gray
}

/// 256-bin intensity histogram
pub fn histogram(gray: &GrayImage) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for pixel in gray.pixels() {
        hist[pixel.0[0] as usize] += 1;
    }
    hist
}

/// Otsu's threshold: the level maximizing between-class variance
///
/// Ties keep the lowest level. Images with a single intensity (or no
/// pixels) have no split and return 0.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let hist = histogram(gray);
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0;
    }

    let scale = 1.0 / total as f64;
    let mu: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum::<f64>()
        * scale;

    let eps = f32::EPSILON as f64;
    let mut q1 = 0.0f64;
    let mut mu1 = 0.0f64;
    let mut max_sigma = 0.0f64;
    let mut max_level = 0u8;

    for (i, &count) in hist.iter().enumerate() {
        let p_i = count as f64 * scale;
        mu1 *= q1;
        q1 += p_i;
        let q2 = 1.0 - q1;

        if q1.min(q2) < eps || q1.max(q2) > 1.0 - eps {
            continue;
        }

        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            max_level = i as u8;
        }
    }

    max_level
}

/// Pixels strictly above `threshold` become white, the rest black
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { BINARY_MAX } else { 0 };
    }
    out
}

/// k x k median filter with replicated borders
///
/// Even kernels are rounded up to the next odd size. `kernel <= 1` returns
/// a copy of the input.
pub fn median_filter(gray: &GrayImage, kernel: u32) -> GrayImage {
    if kernel <= 1 {
        return gray.clone();
    }

    let radius = (kernel / 2) as i64;
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;
    let side = (2 * radius + 1) as usize;
    let mut window: Vec<u8> = Vec::with_capacity(side * side);
    let mut out = GrayImage::new(width, height);

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            window.clear();
            for dy in -radius..=radius {
                let sy = (y + dy).clamp(0, max_y) as u32;
                for dx in -radius..=radius {
                    let sx = (x + dx).clamp(0, max_x) as u32;
                    window.push(gray.get_pixel(sx, sy).0[0]);
                }
            }
            let mid = window.len() / 2;
            let (_, median, _) = window.select_nth_unstable(mid);
            out.put_pixel(x as u32, y as u32, Luma([*median]));
        }
    }

    out
}

// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Image feature extraction.

Pure functions over raw RGBA8 bytes. The only things that leave this module
are bounded numeric features; pixels never do. Work per image is capped: the
color pass samples at most [`HISTOGRAM_SAMPLE_CAP`] pixels and the clustering
runs a fixed number of iterations, so cost does not scale with image variety.
*/

use ndarray::{s, Array2};
use rayon::prelude::*;

use umwelt_structures::{ColorShare, HslColor, ImageFeatures, UmweltError, UmweltResult};

/// Upper bound on pixels sampled for the color histogram and warmth passes.
pub const HISTOGRAM_SAMPLE_CAP: usize = 2000;

const KMEANS_MAX_CLUSTERS: usize = 5;
const KMEANS_MAX_ITERATIONS: usize = 10;
/// Minimum member share for a cluster to count as a distinct color, percent.
const NOISE_FLOOR_SHARE: f32 = 3.0;
/// Gradient magnitudes below this do not vote for a direction bin.
const EDGE_MAGNITUDE_FLOOR: f32 = 0.05;
const ANGLE_BIN_WIDTH: f32 = 10.0;
const ANGLE_BIN_COUNT: usize = 18;

/// Extract the numeric feature bundle from one RGBA8 image.
///
/// # Arguments
/// * `pixels` - Interleaved RGBA bytes, at least `width * height * 4` long
/// * `width` / `height` - Frame dimensions in pixels
///
/// A buffer shorter than the dimensions demand is a caller contract violation
/// and fails. A zero-sized frame is not an error: it yields the trivial
/// bundle.
pub fn extract_image_features(
    pixels: &[u8],
    width: usize,
    height: usize,
) -> UmweltResult<ImageFeatures> {
    let required = width
        .checked_mul(height)
        .and_then(|p| p.checked_mul(4))
        .ok_or_else(|| UmweltError::bad_parameters("image dimensions overflow"))?;
    if pixels.len() < required {
        return Err(UmweltError::bad_parameters(format!(
            "pixel buffer holds {} bytes but a {}x{} RGBA frame needs {}",
            pixels.len(),
            width,
            height,
            required
        )));
    }
    if width == 0 || height == 0 {
        return Ok(ImageFeatures::default());
    }

    let luminance = luminance_plane(&pixels[..required], width, height);
    let mean = luminance.mean().unwrap_or(0.0);
    let brightness = mean * 100.0;
    let contrast = (luminance.std(0.0) / 0.5 * 100.0).min(100.0);

    let samples = sample_hsl(&pixels[..required], width * height);
    let (histogram, dominant_color, color_count) = color_histogram(&samples);
    let warmth = warmth_score(&samples);
    let (edge_density, dominant_angles) = sobel_features(&luminance);
    let quadrant_brightness = quadrant_means(&luminance);

    Ok(ImageFeatures {
        dominant_color,
        histogram,
        brightness,
        contrast,
        edge_density,
        warmth,
        dominant_angles,
        quadrant_brightness,
        color_count,
    })
}

/// Convenience entry point for decoded images.
pub fn extract_from_dynamic_image(source: &image::DynamicImage) -> UmweltResult<ImageFeatures> {
    let rgba = source.to_rgba8();
    extract_image_features(
        rgba.as_raw(),
        rgba.width() as usize,
        rgba.height() as usize,
    )
}

/// Exact RGB to HSL conversion: hue 0..360, saturation and lightness 0..100.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> HslColor {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f32::EPSILON {
        return HslColor::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f32::EPSILON {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h
    } else if (max - g).abs() < f32::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    } * 60.0;

    HslColor::new(h, s * 100.0, l * 100.0)
}

/// Rec.709 luminance per pixel on 0..1 channels, as a (height, width) plane.
fn luminance_plane(pixels: &[u8], width: usize, height: usize) -> Array2<f32> {
    let values: Vec<f32> = pixels
        .par_chunks_exact(4)
        .map(|px| {
            let r = px[0] as f32 / 255.0;
            let g = px[1] as f32 / 255.0;
            let b = px[2] as f32 / 255.0;
            0.2126 * r + 0.7152 * g + 0.0722 * b
        })
        .collect();
    // length is exactly width*height by construction
    Array2::from_shape_vec((height, width), values)
        .unwrap_or_else(|_| Array2::zeros((height, width)))
}

/// Evenly strided HSL samples, at most [`HISTOGRAM_SAMPLE_CAP`] of them.
fn sample_hsl(pixels: &[u8], pixel_count: usize) -> Vec<HslColor> {
    if pixel_count == 0 {
        return Vec::new();
    }
    let stride = pixel_count.div_ceil(HISTOGRAM_SAMPLE_CAP).max(1);
    (0..pixel_count)
        .step_by(stride)
        .map(|i| {
            let base = i * 4;
            rgb_to_hsl(pixels[base], pixels[base + 1], pixels[base + 2])
        })
        .collect()
}

/// Distance in cluster space: circular hue counts double against saturation
/// and lightness.
fn cluster_distance(a: &HslColor, b: &HslColor) -> f32 {
    let raw = (a.h - b.h).abs();
    let hue = raw.min(360.0 - raw) / 180.0;
    let sat = (a.s - b.s).abs() / 100.0;
    let light = (a.l - b.l).abs() / 100.0;
    2.0 * hue + sat + light
}

/// Mean of a cluster with the hue averaged on the unit circle, so a cluster
/// straddling 0/360 does not average out to cyan.
fn cluster_mean(members: &[HslColor]) -> HslColor {
    let n = members.len() as f32;
    let (mut sin_sum, mut cos_sum, mut s_sum, mut l_sum) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
    for m in members {
        let radians = m.h.to_radians();
        sin_sum += radians.sin();
        cos_sum += radians.cos();
        s_sum += m.s;
        l_sum += m.l;
    }
    let mut h = (sin_sum / n).atan2(cos_sum / n).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    HslColor::new(h, s_sum / n, l_sum / n)
}

/// Fixed-iteration k-means over the sampled colors. Deterministic: centroids
/// seed from evenly spaced samples, no randomness anywhere.
fn color_histogram(samples: &[HslColor]) -> (Vec<ColorShare>, HslColor, usize) {
    if samples.is_empty() {
        return (Vec::new(), HslColor::ZERO, 0);
    }

    let k = KMEANS_MAX_CLUSTERS.min(samples.len());
    let mut centroids: Vec<HslColor> = (0..k).map(|i| samples[i * samples.len() / k]).collect();
    let mut assignments = vec![0usize; samples.len()];

    for _ in 0..KMEANS_MAX_ITERATIONS {
        let mut changed = false;
        for (i, sample) in samples.iter().enumerate() {
            let mut best = 0;
            let mut best_distance = f32::MAX;
            for (c, centroid) in centroids.iter().enumerate() {
                let distance = cluster_distance(sample, centroid);
                if distance < best_distance {
                    best_distance = distance;
                    best = c;
                }
            }
            if assignments[i] != best {
                assignments[i] = best;
                changed = true;
            }
        }

        for (c, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<HslColor> = samples
                .iter()
                .zip(&assignments)
                .filter(|(_, &a)| a == c)
                .map(|(s, _)| *s)
                .collect();
            if !members.is_empty() {
                *centroid = cluster_mean(&members);
            }
        }

        if !changed {
            break;
        }
    }

    let mut counts = vec![0usize; k];
    for &a in &assignments {
        counts[a] += 1;
    }

    let total = samples.len() as f32;
    let mut histogram: Vec<ColorShare> = centroids
        .iter()
        .zip(&counts)
        .filter(|(_, &count)| count > 0)
        .map(|(centroid, &count)| ColorShare {
            color: *centroid,
            share: count as f32 / total * 100.0,
        })
        .collect();
    histogram.sort_by(|a, b| b.share.partial_cmp(&a.share).unwrap_or(std::cmp::Ordering::Equal));

    let dominant = histogram.first().map(|entry| entry.color).unwrap_or(HslColor::ZERO);
    let color_count = histogram
        .iter()
        .filter(|entry| entry.share >= NOISE_FLOOR_SHARE)
        .count();
    (histogram, dominant, color_count)
}

/// Signed warmth of the sampled colors, clamped to -100..100. Warm hues vote
/// with their saturation, cool hues against it, the rest abstain.
fn warmth_score(samples: &[HslColor]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples
        .iter()
        .map(|c| {
            if c.h <= 60.0 || c.h >= 300.0 {
                c.s
            } else if (150.0..=270.0).contains(&c.h) {
                -c.s
            } else {
                0.0
            }
        })
        .sum();
    (sum / samples.len() as f32).clamp(-100.0, 100.0)
}

/// 3x3 Sobel over the interior: mean gradient magnitude (scaled, capped at
/// 100) plus the centers of the direction bins that reach half the strongest
/// bin's accumulated magnitude.
fn sobel_features(luminance: &Array2<f32>) -> (f32, Vec<f32>) {
    let (height, width) = luminance.dim();
    if width < 3 || height < 3 {
        return (0.0, Vec::new());
    }

    // per-row partials collected in index order keep the reduction
    // deterministic
    let rows: Vec<(f64, [f32; ANGLE_BIN_COUNT])> = (1..height - 1)
        .into_par_iter()
        .map(|y| {
            let mut magnitude_sum = 0.0f64;
            let mut bins = [0.0f32; ANGLE_BIN_COUNT];
            for x in 1..width - 1 {
                let gx = -luminance[[y - 1, x - 1]] + luminance[[y - 1, x + 1]]
                    - 2.0 * luminance[[y, x - 1]]
                    + 2.0 * luminance[[y, x + 1]]
                    - luminance[[y + 1, x - 1]]
                    + luminance[[y + 1, x + 1]];
                let gy = -luminance[[y - 1, x - 1]] - 2.0 * luminance[[y - 1, x]]
                    - luminance[[y - 1, x + 1]]
                    + luminance[[y + 1, x - 1]]
                    + 2.0 * luminance[[y + 1, x]]
                    + luminance[[y + 1, x + 1]];
                let magnitude = (gx * gx + gy * gy).sqrt();
                magnitude_sum += magnitude as f64;
                if magnitude > EDGE_MAGNITUDE_FLOOR {
                    let mut degrees = gy.atan2(gx).to_degrees();
                    if degrees < 0.0 {
                        degrees += 180.0;
                    }
                    if degrees >= 180.0 {
                        degrees -= 180.0;
                    }
                    let bin = ((degrees / ANGLE_BIN_WIDTH) as usize).min(ANGLE_BIN_COUNT - 1);
                    bins[bin] += magnitude;
                }
            }
            (magnitude_sum, bins)
        })
        .collect();

    let mut magnitude_sum = 0.0f64;
    let mut bins = [0.0f32; ANGLE_BIN_COUNT];
    for (row_sum, row_bins) in rows {
        magnitude_sum += row_sum;
        for (total, value) in bins.iter_mut().zip(row_bins) {
            *total += value;
        }
    }

    let interior = ((width - 2) * (height - 2)) as f64;
    let edge_density = ((magnitude_sum / interior) as f32 * 100.0).min(100.0);

    let strongest = bins.iter().fold(0.0f32, |a, &b| a.max(b));
    let dominant_angles = if strongest > f32::EPSILON {
        bins.iter()
            .enumerate()
            .filter(|(_, &value)| value >= strongest * 0.5)
            .map(|(i, _)| i as f32 * ANGLE_BIN_WIDTH + ANGLE_BIN_WIDTH / 2.0)
            .collect()
    } else {
        Vec::new()
    };

    (edge_density, dominant_angles)
}

/// Mean luminance per quadrant, scaled to 0..100. Split at floor(width/2),
/// floor(height/2); a degenerate quadrant reads 0.
fn quadrant_means(luminance: &Array2<f32>) -> [f32; 4] {
    let (height, width) = luminance.dim();
    let half_w = width / 2;
    let half_h = height / 2;
    let mean_of = |view: ndarray::ArrayView2<f32>| view.mean().unwrap_or(0.0) * 100.0;
    [
        mean_of(luminance.slice(s![..half_h, ..half_w])),
        mean_of(luminance.slice(s![..half_h, half_w..])),
        mean_of(luminance.slice(s![half_h.., ..half_w])),
        mean_of(luminance.slice(s![half_h.., half_w..])),
    ]
}

// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Numeric feature bundles.
//!
//! These are the only image/audio-derived values allowed to cross the
//! perception boundary. Raw pixels and waveforms never leave the extractors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A color in HSL space: hue 0..360 degrees, saturation and lightness 0..100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HslColor {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl HslColor {
    pub const ZERO: HslColor = HslColor {
        h: 0.0,
        s: 0.0,
        l: 0.0,
    };

    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.0}, {:.0}%, {:.0}%)", self.h, self.s, self.l)
    }
}

/// One histogram entry: a clustered color and the share of sampled pixels
/// assigned to it, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorShare {
    pub color: HslColor,
    pub share: f32,
}

/// Numeric summary of one image, produced by the image feature extractor.
///
/// All channels are bounded: brightness, contrast, edge density and quadrant
/// brightness in 0..100, warmth in -100..100, dominant angles in 0..180
/// degrees. The histogram is sorted by share descending and sums to ~100 for
/// any non-empty image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageFeatures {
    pub dominant_color: HslColor,
    pub histogram: Vec<ColorShare>,
    pub brightness: f32,
    pub contrast: f32,
    pub edge_density: f32,
    pub warmth: f32,
    /// Centers of the strong gradient-direction bins, degrees in 0..180.
    pub dominant_angles: Vec<f32>,
    /// Mean luminance per quadrant: top-left, top-right, bottom-left,
    /// bottom-right.
    pub quadrant_brightness: [f32; 4],
    /// Clusters holding at least 3% of sampled pixels.
    pub color_count: usize,
}

/// Numeric summary of one audio buffer, produced by the audio feature
/// extractor. Band shares sum to ~100 for any non-silent signal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// RMS loudness scaled so a full-scale sine reads ~100.
    pub loudness: f32,
    /// Share of spectral energy below 250 Hz, percent.
    pub low_band: f32,
    /// Share of spectral energy in 250..2000 Hz, percent.
    pub mid_band: f32,
    /// Share of spectral energy above 2000 Hz, percent.
    pub high_band: f32,
    /// Center frequency of the strongest spectral bin, Hz.
    pub dominant_frequency_hz: f32,
    /// Coarse voice-band heuristic; not transcription.
    pub speech_likely: bool,
    /// Number of PCM samples the summary was computed from.
    pub sample_count: usize,
}

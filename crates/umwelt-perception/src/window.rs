// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Perception window calculator.

A pure function of (perception level, species, growth day). Each level has a
fixed base vector over the seven channels; each species applies a
multiplicative profile with exactly one primary channel above 1.0; the growth
day interpolates linearly toward the next level's base within the current
level. The top level is flat. Everything is clamped to declared ranges at the
end, and the two booleans flip at fixed thresholds.
*/

use umwelt_structures::{PerceptionLevel, PerceptionWindow, Species};

/// The seven numeric window channels, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChannel {
    ImageResolution,
    ColorDepth,
    TextAccess,
    SemanticDepth,
    FrequencyRange,
    TemporalResolution,
    SensorAccess,
}

impl WindowChannel {
    pub const ALL: [WindowChannel; 7] = [
        WindowChannel::ImageResolution,
        WindowChannel::ColorDepth,
        WindowChannel::TextAccess,
        WindowChannel::SemanticDepth,
        WindowChannel::FrequencyRange,
        WindowChannel::TemporalResolution,
        WindowChannel::SensorAccess,
    ];

    fn index(&self) -> usize {
        match self {
            WindowChannel::ImageResolution => 0,
            WindowChannel::ColorDepth => 1,
            WindowChannel::TextAccess => 2,
            WindowChannel::SemanticDepth => 3,
            WindowChannel::FrequencyRange => 4,
            WindowChannel::TemporalResolution => 5,
            WindowChannel::SensorAccess => 6,
        }
    }

    /// Declared (min, max) range of the channel.
    pub fn range(&self) -> (f32, f32) {
        match self {
            WindowChannel::ImageResolution => (1.0, 5.0),
            _ => (0.0, 100.0),
        }
    }
}

/// Base capability vector per level, strictly increasing level-over-level on
/// every channel. Order matches [`WindowChannel::ALL`].
const LEVEL_BASES: [[f32; 7]; 5] = [
    [1.0, 5.0, 5.0, 5.0, 5.0, 10.0, 10.0],
    [2.0, 25.0, 25.0, 20.0, 25.0, 30.0, 30.0],
    [3.0, 45.0, 50.0, 40.0, 50.0, 50.0, 50.0],
    [4.0, 70.0, 75.0, 65.0, 75.0, 75.0, 70.0],
    [5.0, 100.0, 100.0, 95.0, 100.0, 100.0, 95.0],
];

/// Growth-day threshold per non-top level: the day by which interpolation
/// toward the next level's base completes.
const LEVEL_DAY_THRESHOLDS: [f32; 4] = [3.0, 7.0, 14.0, 30.0];

/// Image resolution at or above which scene positions are perceived.
const SPATIAL_AWARENESS_THRESHOLD: f32 = 3.0;

/// Frequency range at or above which the voice band is resolved.
const SPEECH_DETECTION_THRESHOLD: f32 = 60.0;

/// A species' per-channel multipliers. Returned by value; callers may mutate
/// their copy freely without affecting later calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProfile {
    /// Multiplier per channel, order matching [`WindowChannel::ALL`].
    pub multipliers: [f32; 7],
    /// The single channel with a multiplier above 1.0.
    pub primary: WindowChannel,
}

/// The fixed sensory profile of a species.
pub fn species_profile(species: Species) -> SpeciesProfile {
    match species {
        Species::Chromatic => SpeciesProfile {
            multipliers: [1.0, 1.25, 0.9, 0.95, 0.85, 0.9, 0.9],
            primary: WindowChannel::ColorDepth,
        },
        Species::Vibration => SpeciesProfile {
            multipliers: [0.9, 0.8, 0.9, 0.9, 1.3, 1.0, 0.95],
            primary: WindowChannel::FrequencyRange,
        },
        Species::Geometric => SpeciesProfile {
            multipliers: [1.2, 0.85, 0.95, 1.0, 0.9, 0.9, 0.95],
            primary: WindowChannel::ImageResolution,
        },
        Species::Thermal => SpeciesProfile {
            multipliers: [0.9, 0.85, 0.9, 0.95, 0.9, 0.95, 1.25],
            primary: WindowChannel::SensorAccess,
        },
        Species::Temporal => SpeciesProfile {
            multipliers: [0.95, 0.9, 0.95, 1.0, 0.95, 1.3, 0.9],
            primary: WindowChannel::TemporalResolution,
        },
        Species::Chemical => SpeciesProfile {
            multipliers: [0.9, 0.9, 0.95, 1.25, 0.85, 0.95, 1.0],
            primary: WindowChannel::SemanticDepth,
        },
    }
}

/// Compute the continuous perception window.
///
/// # Arguments
/// * `level` - Discrete perception stage
/// * `species` - Fixed sensory profile
/// * `growth_day` - Days since genesis; any magnitude is accepted and clamps
///
/// Monotonically non-decreasing per channel in both level and growth day.
pub fn calculate_window(
    level: PerceptionLevel,
    species: Species,
    growth_day: u32,
) -> PerceptionWindow {
    let stage = level.value() as usize;
    let base = LEVEL_BASES[stage];

    let mut vector = base;
    if let Some(next) = level.next() {
        let target = LEVEL_BASES[next.value() as usize];
        let t = (growth_day as f32 / LEVEL_DAY_THRESHOLDS[stage]).min(1.0);
        for i in 0..vector.len() {
            vector[i] = base[i] + (target[i] - base[i]) * t;
        }
    }

    let profile = species_profile(species);
    for channel in WindowChannel::ALL {
        let i = channel.index();
        let (min, max) = channel.range();
        vector[i] = (vector[i] * profile.multipliers[i]).clamp(min, max);
    }

    PerceptionWindow {
        image_resolution: vector[0],
        color_depth: vector[1],
        text_access: vector[2],
        semantic_depth: vector[3],
        frequency_range: vector[4],
        temporal_resolution: vector[5],
        sensor_access: vector[6],
        spatial_awareness: vector[0] >= SPATIAL_AWARENESS_THRESHOLD,
        can_detect_speech: vector[4] >= SPEECH_DETECTION_THRESHOLD,
    }
}

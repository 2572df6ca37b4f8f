// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Perception window and collection results.

use serde::{Deserialize, Serialize};

use crate::sensory::Modality;

/// The continuous capability vector refining the discrete perception level.
///
/// Always recomputed from (level, species, growth day), never cached; two
/// calls with the same inputs yield the same window. Numeric channels are
/// clamped to their declared ranges, the booleans flip at fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerceptionWindow {
    /// Visual acuity, 1..5.
    pub image_resolution: f32,
    /// Color discrimination, 0..100.
    pub color_depth: f32,
    /// Fraction of written language accessible, 0..100.
    pub text_access: f32,
    /// Depth of meaning extracted from any input, 0..100.
    pub semantic_depth: f32,
    /// Audible band width, 0..100.
    pub frequency_range: f32,
    /// Ability to resolve change over time, 0..100.
    pub temporal_resolution: f32,
    /// Precision of scalar sensor perception, 0..100.
    pub sensor_access: f32,
    /// Whether positions within a scene are perceived at all.
    pub spatial_awareness: bool,
    /// Whether the voice band is resolved well enough to notice speech.
    pub can_detect_speech: bool,
}

/// One growth-gated description of one event. Ephemeral: lives only within
/// the collection cycle that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredPerception {
    pub modality: Modality,
    pub description: String,
}

impl FilteredPerception {
    pub fn new(modality: Modality, description: impl Into<String>) -> Self {
        Self {
            modality,
            description: description.into(),
        }
    }
}

/// Result of one drain-and-collect call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedPerceptions {
    /// Prose summary for prompt assembly. Never empty: with nothing pending
    /// it is a fixed fallback phrase.
    pub context: String,
    /// Modulated descriptions of every perceivable drained event.
    pub perceptions: Vec<FilteredPerception>,
    /// Number of events drained, perceivable or not; feeds growth gating.
    pub input_count: usize,
}

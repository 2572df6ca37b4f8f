// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Species and perception level.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{UmweltError, UmweltResult};

/// Sensory temperament, fixed at genesis. Biases which perception channels
/// mature fastest; never changes over a creature's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Color-led perception: hue and light before anything else.
    Chromatic,
    /// Oscillation-led perception: sound, tremor, touch.
    Vibration,
    /// Shape-led perception: edges, distance, structure.
    Geometric,
    /// Heat-led perception: temperature, humidity, radiance.
    Thermal,
    /// Rhythm-led perception: change over time, cycles.
    Temporal,
    /// Composition-led perception: gas, moisture, substance.
    Chemical,
}

impl Species {
    /// All six species in declaration order.
    pub const ALL: [Species; 6] = [
        Species::Chromatic,
        Species::Vibration,
        Species::Geometric,
        Species::Thermal,
        Species::Temporal,
        Species::Chemical,
    ];

    /// Lowercase name as used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Chromatic => "chromatic",
            Species::Vibration => "vibration",
            Species::Geometric => "geometric",
            Species::Thermal => "thermal",
            Species::Temporal => "temporal",
            Species::Chemical => "chemical",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Discrete perception stage, 0 (newborn) through 4 (fully matured).
///
/// Gates which descriptions the filter may produce at all; the continuous
/// refinement within a stage lives in the perception window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PerceptionLevel(u8);

impl PerceptionLevel {
    pub const MIN: PerceptionLevel = PerceptionLevel(0);
    pub const MAX: PerceptionLevel = PerceptionLevel(4);

    /// All five levels in ascending order.
    pub const ALL: [PerceptionLevel; 5] = [
        PerceptionLevel(0),
        PerceptionLevel(1),
        PerceptionLevel(2),
        PerceptionLevel(3),
        PerceptionLevel(4),
    ];

    /// Validated constructor.
    ///
    /// # Arguments
    /// * `level` - Stage index, must be 0..=4
    pub fn new(level: u8) -> UmweltResult<Self> {
        if level > Self::MAX.0 {
            return Err(UmweltError::bad_parameters(format!(
                "perception level must be 0..=4, got {}",
                level
            )));
        }
        Ok(Self(level))
    }

    /// Raw stage index.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The next stage up, or `None` at the top.
    pub fn next(&self) -> Option<PerceptionLevel> {
        if self.0 < Self::MAX.0 {
            Some(PerceptionLevel(self.0 + 1))
        } else {
            None
        }
    }

    /// Whether this is the top stage (no further growth target).
    pub fn is_top(&self) -> bool {
        self.0 == Self::MAX.0
    }
}

impl fmt::Display for PerceptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

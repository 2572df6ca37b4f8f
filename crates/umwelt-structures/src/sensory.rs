// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Sensory events.

A [`RawInput`] is the unit of data flowing from drivers into the registry
queue. It is immutable after construction: the queue appends it, the drain
moves it out exactly once, and nothing in between rewrites it.
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::{AudioFeatures, ImageFeatures};

/// Input category. Closed set; the pipeline matches on it exhaustively, so a
/// new variant is a compile-time-checked change everywhere it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Audio,
    Temperature,
    Humidity,
    Light,
    Vibration,
    Pressure,
    Gas,
    Color,
    Proximity,
    Touch,
    System,
}

impl Modality {
    /// All modalities in declaration order.
    pub const ALL: [Modality; 13] = [
        Modality::Text,
        Modality::Image,
        Modality::Audio,
        Modality::Temperature,
        Modality::Humidity,
        Modality::Light,
        Modality::Vibration,
        Modality::Pressure,
        Modality::Gas,
        Modality::Color,
        Modality::Proximity,
        Modality::Touch,
        Modality::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Image => "image",
            Modality::Audio => "audio",
            Modality::Temperature => "temperature",
            Modality::Humidity => "humidity",
            Modality::Light => "light",
            Modality::Vibration => "vibration",
            Modality::Pressure => "pressure",
            Modality::Gas => "gas",
            Modality::Color => "color",
            Modality::Proximity => "proximity",
            Modality::Touch => "touch",
            Modality::System => "system",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of change of a scalar reading since the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        };
        write!(f, "{}", s)
    }
}

/// One scalar sensor sample with its short-term dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarReading {
    pub value: f64,
    /// Unit label as rendered in descriptions ("C", "%", "lux", "hPa", ...).
    pub unit: String,
    pub trend: Trend,
    /// Absolute change per minute in the reading's unit.
    pub change_rate: f64,
}

impl ScalarReading {
    pub fn new(value: f64, unit: impl Into<String>, trend: Trend, change_rate: f64) -> Self {
        Self {
            value,
            unit: unit.into(),
            trend,
            change_rate,
        }
    }

    /// A sample with no known dynamics.
    pub fn steady(value: f64, unit: impl Into<String>) -> Self {
        Self::new(value, unit, Trend::Stable, 0.0)
    }
}

/// Recognized touch gesture shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchGesture {
    Tap,
    DoubleTap,
    Hold,
    Stroke,
    Unknown,
}

impl fmt::Display for TouchGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TouchGesture::Tap => "tap",
            TouchGesture::DoubleTap => "double tap",
            TouchGesture::Hold => "hold",
            TouchGesture::Stroke => "stroke",
            TouchGesture::Unknown => "touch",
        };
        write!(f, "{}", s)
    }
}

/// One touch event from a tactile surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchReading {
    pub active: bool,
    /// Simultaneous contact points.
    pub points: u8,
    /// Normalized contact pressure, 0..1.
    pub pressure: f32,
    pub duration_ms: u32,
    pub gesture: TouchGesture,
}

/// Host machine vitals, the payload of the always-on `system` modality.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_temp_c: f32,
    pub memory_used_pct: f32,
    pub cpu_load_pct: f32,
    pub uptime_hours: f32,
    pub process_count: usize,
    pub disk_read_kb_s: f32,
    pub disk_write_kb_s: f32,
    pub network_kb_s: f32,
}

/// Event payload, one shape per modality family.
///
/// Raw media never appears here: images and audio arrive already reduced to
/// their numeric feature bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorPayload {
    Text { content: String },
    Scalar(ScalarReading),
    Touch(TouchReading),
    System(SystemMetrics),
    Image(ImageFeatures),
    Audio(AudioFeatures),
}

impl From<ScalarReading> for SensorPayload {
    fn from(reading: ScalarReading) -> Self {
        SensorPayload::Scalar(reading)
    }
}

impl From<TouchReading> for SensorPayload {
    fn from(reading: TouchReading) -> Self {
        SensorPayload::Touch(reading)
    }
}

impl From<SystemMetrics> for SensorPayload {
    fn from(metrics: SystemMetrics) -> Self {
        SensorPayload::System(metrics)
    }
}

impl From<ImageFeatures> for SensorPayload {
    fn from(features: ImageFeatures) -> Self {
        SensorPayload::Image(features)
    }
}

impl From<AudioFeatures> for SensorPayload {
    fn from(features: AudioFeatures) -> Self {
        SensorPayload::Audio(features)
    }
}

/// One immutable sensory event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub modality: Modality,
    pub timestamp: DateTime<Utc>,
    /// Free-text id of the producing sensor; matches the registry catalog key
    /// for polled sources.
    pub source: String,
    pub payload: SensorPayload,
}

impl RawInput {
    /// Build an event stamped with the current time.
    ///
    /// The payload shape is the driver author's contract: it must match the
    /// modality (a `Scalar` for the scalar modalities, `Image` features for
    /// `Image`, and so on). The typed constructors below guarantee this.
    pub fn new(modality: Modality, source: impl Into<String>, payload: SensorPayload) -> Self {
        Self {
            modality,
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }

    /// Replace the construction timestamp, mainly for replay and tests.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn text(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            Modality::Text,
            source,
            SensorPayload::Text {
                content: content.into(),
            },
        )
    }

    pub fn scalar(modality: Modality, source: impl Into<String>, reading: ScalarReading) -> Self {
        Self::new(modality, source, reading.into())
    }

    pub fn touch(source: impl Into<String>, reading: TouchReading) -> Self {
        Self::new(Modality::Touch, source, reading.into())
    }

    pub fn system(source: impl Into<String>, metrics: SystemMetrics) -> Self {
        Self::new(Modality::System, source, metrics.into())
    }

    pub fn image(source: impl Into<String>, features: ImageFeatures) -> Self {
        Self::new(Modality::Image, source, features.into())
    }

    pub fn audio(source: impl Into<String>, features: AudioFeatures) -> Self {
        Self::new(Modality::Audio, source, features.into())
    }
}

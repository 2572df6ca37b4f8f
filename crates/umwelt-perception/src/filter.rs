// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Perception filter.

Decides, per event, whether the species perceives the modality at the current
level at all, and renders perceivable events at one of three precision
registers (levels 0-1 vague, 2-3 moderate, 4 precise). Imperceivable events
are omitted outright, never replaced with a placeholder.
*/

use tracing::debug;

use umwelt_structures::{
    AudioFeatures, FilteredPerception, ImageFeatures, Modality, PerceptionLevel, RawInput,
    ScalarReading, SensorPayload, Species, SystemMetrics, TouchReading, Trend,
};

/// The minimum level at which `species` perceives `modality`, or `None` when
/// the modality lies outside the species' sensory world entirely.
///
/// `system` is the inner sense: every species has it from level 0.
pub fn modality_unlock_level(species: Species, modality: Modality) -> Option<PerceptionLevel> {
    let stage: Option<u8> = match species {
        Species::Chromatic => match modality {
            Modality::Image | Modality::Light | Modality::Color | Modality::System => Some(0),
            Modality::Touch => Some(1),
            Modality::Text | Modality::Audio | Modality::Proximity => Some(2),
            _ => None,
        },
        Species::Vibration => match modality {
            Modality::Audio | Modality::Vibration | Modality::Touch | Modality::System => Some(0),
            Modality::Pressure | Modality::Proximity => Some(1),
            Modality::Text => Some(2),
            _ => None,
        },
        Species::Geometric => match modality {
            Modality::Image | Modality::Proximity | Modality::Touch | Modality::System => Some(0),
            Modality::Light | Modality::Vibration => Some(1),
            Modality::Text | Modality::Pressure | Modality::Color => Some(2),
            _ => None,
        },
        Species::Thermal => match modality {
            Modality::Temperature | Modality::Humidity | Modality::System => Some(0),
            Modality::Light | Modality::Touch => Some(1),
            Modality::Text => Some(2),
            _ => None,
        },
        Species::Temporal => match modality {
            Modality::Light | Modality::System => Some(0),
            Modality::Text | Modality::Audio | Modality::Touch => Some(1),
            Modality::Image | Modality::Temperature | Modality::Vibration => Some(2),
            _ => None,
        },
        Species::Chemical => match modality {
            Modality::Humidity | Modality::Gas | Modality::System => Some(0),
            Modality::Temperature | Modality::Pressure | Modality::Touch => Some(1),
            Modality::Text => Some(2),
            _ => None,
        },
    };
    stage.map(|s| PerceptionLevel::ALL[s as usize])
}

/// Whether `species` perceives `modality` at `level`.
pub fn perceivable(species: Species, level: PerceptionLevel, modality: Modality) -> bool {
    match modality_unlock_level(species, modality) {
        Some(unlock) => level >= unlock,
        None => false,
    }
}

/// Precision register chosen by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailRegister {
    Vague,
    Moderate,
    Precise,
}

fn register_for(level: PerceptionLevel) -> DetailRegister {
    match level.value() {
        0 | 1 => DetailRegister::Vague,
        2 | 3 => DetailRegister::Moderate,
        _ => DetailRegister::Precise,
    }
}

/// Render one event at the register its level grants.
///
/// Perceivability is the caller's concern; this only chooses wording.
pub fn describe_event(level: PerceptionLevel, event: &RawInput) -> String {
    let register = register_for(level);
    match &event.payload {
        SensorPayload::Text { content } => describe_text(register, content, &event.source),
        SensorPayload::Scalar(reading) => describe_scalar(register, event.modality, reading),
        SensorPayload::Touch(reading) => describe_touch(register, reading),
        SensorPayload::System(metrics) => describe_system(register, metrics),
        SensorPayload::Image(features) => describe_image(register, features),
        SensorPayload::Audio(features) => describe_audio(register, features),
    }
}

/// Run the discrete filter over a drained batch: one description per
/// perceivable event, imperceivable events silently dropped.
pub fn filter_events(
    species: Species,
    level: PerceptionLevel,
    events: &[RawInput],
) -> Vec<FilteredPerception> {
    events
        .iter()
        .filter_map(|event| {
            if !perceivable(species, level, event.modality) {
                debug!(
                    "[FILTER] {} event from '{}' imperceivable to {} at {}",
                    event.modality, event.source, species, level
                );
                return None;
            }
            Some(FilteredPerception::new(
                event.modality,
                describe_event(level, event),
            ))
        })
        .collect()
}

fn describe_text(register: DetailRegister, content: &str, source: &str) -> String {
    match register {
        DetailRegister::Vague => "a stream of words it cannot yet read".to_string(),
        DetailRegister::Moderate => format!("a message: \"{}\"", content),
        DetailRegister::Precise => format!("a message from {}: \"{}\"", source, content),
    }
}

/// Qualitative phrase and noun per scalar modality.
fn scalar_wording(modality: Modality) -> (&'static str, &'static str) {
    match modality {
        Modality::Temperature => ("a sense of warmth in the air", "temperature"),
        Modality::Humidity => ("dampness it cannot place", "humidity"),
        Modality::Light => ("a shifting brightness", "light level"),
        Modality::Vibration => ("a tremor underfoot", "vibration"),
        Modality::Pressure => ("a heaviness in the air", "pressure"),
        Modality::Gas => ("an odd tinge to the air", "air quality"),
        Modality::Color => ("a wash of changing color", "color reading"),
        Modality::Proximity => ("something moving nearby", "distance"),
        _ => ("a faint signal", "reading"),
    }
}

fn describe_scalar(register: DetailRegister, modality: Modality, reading: &ScalarReading) -> String {
    let (vague, noun) = scalar_wording(modality);
    match register {
        DetailRegister::Vague => vague.to_string(),
        DetailRegister::Moderate => format!(
            "{} around {:.1} {}, {}",
            noun, reading.value, reading.unit, reading.trend
        ),
        DetailRegister::Precise => {
            if reading.trend == Trend::Stable {
                format!("{} at {:.2} {}, steady", noun, reading.value, reading.unit)
            } else {
                format!(
                    "{} at {:.2} {}, {} at {:.2} {} per minute",
                    noun, reading.value, reading.unit, reading.trend, reading.change_rate, reading.unit
                )
            }
        }
    }
}

fn describe_touch(register: DetailRegister, reading: &TouchReading) -> String {
    match register {
        DetailRegister::Vague => {
            if reading.active {
                "being touched".to_string()
            } else {
                "a touch fading away".to_string()
            }
        }
        DetailRegister::Moderate => {
            format!("a {} lasting {} ms", reading.gesture, reading.duration_ms)
        }
        DetailRegister::Precise => format!(
            "a {}: {} contacts at pressure {:.2}, {} ms",
            reading.gesture, reading.points, reading.pressure, reading.duration_ms
        ),
    }
}

fn describe_system(register: DetailRegister, m: &SystemMetrics) -> String {
    match register {
        DetailRegister::Vague => {
            if m.cpu_load_pct > 80.0 || m.cpu_temp_c > 70.0 {
                "its body runs hot".to_string()
            } else {
                "a steady hum inside its body".to_string()
            }
        }
        DetailRegister::Moderate => format!(
            "inner state: load {:.0}%, memory {:.0}%, core {:.1} C",
            m.cpu_load_pct, m.memory_used_pct, m.cpu_temp_c
        ),
        DetailRegister::Precise => format!(
            "inner state: load {:.1}%, memory {:.1}%, core {:.1} C, {} processes, disk {:.1}/{:.1} KB/s, net {:.1} KB/s, up {:.1} h",
            m.cpu_load_pct,
            m.memory_used_pct,
            m.cpu_temp_c,
            m.process_count,
            m.disk_read_kb_s,
            m.disk_write_kb_s,
            m.network_kb_s,
            m.uptime_hours
        ),
    }
}

/// Human color word for a clustered HSL value.
fn color_word(h: f32, s: f32, l: f32) -> &'static str {
    if l < 12.0 {
        return "dark";
    }
    if l > 92.0 {
        return "white";
    }
    if s < 12.0 {
        return "gray";
    }
    match h {
        h if h < 15.0 => "red",
        h if h < 45.0 => "orange",
        h if h < 70.0 => "yellow",
        h if h < 160.0 => "green",
        h if h < 200.0 => "cyan",
        h if h < 260.0 => "blue",
        h if h < 300.0 => "violet",
        h if h < 345.0 => "magenta",
        _ => "red",
    }
}

const QUADRANT_NAMES: [&str; 4] = ["upper left", "upper right", "lower left", "lower right"];

fn brightest_quadrant(features: &ImageFeatures) -> &'static str {
    let mut best = 0;
    for i in 1..4 {
        if features.quadrant_brightness[i] > features.quadrant_brightness[best] {
            best = i;
        }
    }
    QUADRANT_NAMES[best]
}

fn describe_image(register: DetailRegister, f: &ImageFeatures) -> String {
    let color = color_word(f.dominant_color.h, f.dominant_color.s, f.dominant_color.l);
    match register {
        DetailRegister::Vague => format!("a blur of {} light", color),
        DetailRegister::Moderate => {
            let lit = if f.brightness < 25.0 {
                "dim"
            } else if f.brightness < 60.0 {
                "softly lit"
            } else {
                "bright"
            };
            let outlines = if f.edge_density < 5.0 {
                "with hardly any outlines"
            } else if f.edge_density < 25.0 {
                "with soft outlines"
            } else {
                "full of sharp outlines"
            };
            format!(
                "a mostly {} scene, {}, {}, brighter toward the {}",
                color,
                lit,
                outlines,
                brightest_quadrant(f)
            )
        }
        DetailRegister::Precise => {
            let tone = if f.warmth > 30.0 {
                "warm-toned, "
            } else if f.warmth < -30.0 {
                "cool-toned, "
            } else {
                ""
            };
            let angles = if f.dominant_angles.is_empty() {
                String::new()
            } else {
                let list: Vec<String> =
                    f.dominant_angles.iter().map(|a| format!("{:.0}", a)).collect();
                format!(", structure along {} degrees", list.join("/"))
            };
            format!(
                "a {}{} scene ({}), brightness {:.0}, contrast {:.0}, edge density {:.0}, {} main colors, brightest in the {} quadrant{}",
                tone,
                color,
                f.dominant_color,
                f.brightness,
                f.contrast,
                f.edge_density,
                f.color_count,
                brightest_quadrant(f),
                angles
            )
        }
    }
}

fn describe_audio(register: DetailRegister, f: &AudioFeatures) -> String {
    let loud = if f.loudness < 15.0 {
        "faint"
    } else if f.loudness < 55.0 {
        "steady"
    } else {
        "loud"
    };
    match register {
        DetailRegister::Vague => {
            if f.loudness < 15.0 {
                "a faint sound nearby".to_string()
            } else {
                "a sound pressing through".to_string()
            }
        }
        DetailRegister::Moderate => {
            let band = if f.low_band >= f.mid_band && f.low_band >= f.high_band {
                "low"
            } else if f.high_band >= f.mid_band {
                "high"
            } else {
                "mid-range"
            };
            format!(
                "a {} sound, mostly {} (low {:.0}%, mid {:.0}%, high {:.0}%)",
                loud, band, f.low_band, f.mid_band, f.high_band
            )
        }
        DetailRegister::Precise => {
            let voice = if f.speech_likely {
                ", with the cadence of a voice"
            } else {
                ""
            };
            format!(
                "a {} sound centered near {:.0} Hz (low {:.0}%, mid {:.0}%, high {:.0}%){}",
                loud, f.dominant_frequency_hz, f.low_band, f.mid_band, f.high_band, voice
            )
        }
    }
}

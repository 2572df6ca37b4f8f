// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Perception pipeline.

Takes the discrete filter output and re-modulates every description with the
continuous window, one rule per modality family. Also assembles the collection
context string and the display-only state summary.
*/

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use umwelt_structures::{
    CollectedPerceptions, FilteredPerception, Modality, PerceptionLevel, PerceptionWindow,
    RawInput, SensorPayload, Species,
};

use crate::filter::{describe_event, perceivable};
use crate::window::calculate_window;

/// Context phrase used when a collection cycle perceived nothing.
pub const FALLBACK_CONTEXT: &str = "Nothing new reaches its senses; the world sits quiet.";

/// Default cap on descriptions embedded in one context string.
pub const DEFAULT_MAX_CONTEXT_PERCEPTIONS: usize = 12;

fn spatial_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:upper|lower|left|right|top|bottom|center|corner|middle|quadrant|horizontal|vertical|diagonal|above|below|toward|across)\b",
        )
        .expect("spatial vocabulary pattern is valid")
    })
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.\d+").expect("decimal pattern is valid"))
}

fn whitespace_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"))
}

fn space_before_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+([,.;:!?])").expect("punctuation pattern is valid"))
}

fn punct_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([,;:])(?:\s*[,;:])+").expect("separator pattern is valid"))
}

/// Re-modulate one surviving description with the continuous window.
///
/// Matches the modality exhaustively so a new variant must pick its rule
/// here before the crate compiles again.
pub fn modulate_description(
    window: &PerceptionWindow,
    event: &RawInput,
    description: String,
) -> String {
    match event.modality {
        Modality::Text => modulate_text(window, description),
        Modality::Image => modulate_image(window, description),
        Modality::Audio => modulate_audio(window, event, description),
        Modality::Temperature
        | Modality::Humidity
        | Modality::Light
        | Modality::Vibration
        | Modality::Pressure
        | Modality::Gas
        | Modality::Color
        | Modality::Proximity
        | Modality::Touch
        | Modality::System => modulate_sensor(window, description),
    }
}

/// Below half text access, only a leading fraction of the description
/// survives: `max(10%, text_access/50)` of its characters.
fn modulate_text(window: &PerceptionWindow, description: String) -> String {
    if window.text_access >= 50.0 {
        return description;
    }
    let fraction = (window.text_access / 50.0).max(0.1);
    let total = description.chars().count();
    let keep = ((total as f32) * fraction).ceil() as usize;
    description.chars().take(keep).collect()
}

/// Below resolution 3, positions within the scene are not perceived: spatial
/// vocabulary is stripped whole-word, case-insensitively, and the punctuation
/// debris is collapsed. An emptied description falls back to the original.
fn modulate_image(window: &PerceptionWindow, description: String) -> String {
    if window.image_resolution >= 3.0 {
        return description;
    }
    let stripped = spatial_word_re().replace_all(&description, "");
    let collapsed = whitespace_run_re().replace_all(&stripped, " ");
    let collapsed = space_before_punct_re().replace_all(&collapsed, "$1");
    let collapsed = punct_run_re().replace_all(&collapsed, "$1");
    let cleaned = collapsed.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'));
    if cleaned.is_empty() {
        description
    } else {
        cleaned.to_string()
    }
}

/// Below half frequency range, the three-band breakdown collapses into one
/// qualitative label chosen by comparing low against high magnitude.
fn modulate_audio(window: &PerceptionWindow, event: &RawInput, description: String) -> String {
    if window.frequency_range >= 50.0 {
        return description;
    }
    match &event.payload {
        SensorPayload::Audio(features) => {
            if features.low_band > features.high_band + 5.0 {
                "a low rumble".to_string()
            } else if features.high_band > features.low_band + 5.0 {
                "a high, thin sound".to_string()
            } else {
                "an even hum".to_string()
            }
        }
        // Malformed payload for the modality; nothing to compare against.
        _ => description,
    }
}

/// Below half sensor access, decimal precision disappears: embedded numbers
/// keep their integer part, labels and units stay intact.
fn modulate_sensor(window: &PerceptionWindow, description: String) -> String {
    if window.sensor_access >= 50.0 {
        return description;
    }
    decimal_re().replace_all(&description, "$1").into_owned()
}

/// Assemble the context paragraph from modulated descriptions.
pub fn build_context(perceptions: &[FilteredPerception], max_embedded: usize) -> String {
    if perceptions.is_empty() {
        return FALLBACK_CONTEXT.to_string();
    }

    let mut modalities: Vec<&str> = Vec::new();
    for p in perceptions {
        let name = p.modality.as_str();
        if !modalities.contains(&name) {
            modalities.push(name);
        }
    }

    let n = perceptions.len();
    let verb = if n == 1 { "arrives" } else { "arrive" };
    let noun = if n == 1 { "sensation" } else { "sensations" };

    let shown = perceptions.len().min(max_embedded.max(1));
    let mut body: Vec<&str> = perceptions[..shown]
        .iter()
        .map(|p| p.description.as_str())
        .collect();
    let overflow;
    if n > shown {
        overflow = format!("and {} more", n - shown);
        body.push(&overflow);
    }

    format!(
        "{} {} {} ({}): {}.",
        n,
        noun,
        verb,
        modalities.join(", "),
        body.join("; ")
    )
}

/// One drain's worth of events through filter, modulation and context
/// assembly. `input_count` reports every drained event, perceivable or not.
pub fn process_events(
    species: Species,
    level: PerceptionLevel,
    growth_day: u32,
    events: &[RawInput],
    max_context_perceptions: usize,
) -> CollectedPerceptions {
    let window = calculate_window(level, species, growth_day);

    let mut perceptions = Vec::new();
    for event in events {
        if !perceivable(species, level, event.modality) {
            debug!(
                "[PIPELINE] dropping {} event from '{}': outside the {} sensory world at {}",
                event.modality, event.source, species, level
            );
            continue;
        }
        let description = describe_event(level, event);
        let description = modulate_description(&window, event, description);
        perceptions.push(FilteredPerception::new(event.modality, description));
    }

    let context = build_context(&perceptions, max_context_perceptions);
    CollectedPerceptions {
        context,
        perceptions,
        input_count: events.len(),
    }
}

/// Display-only summary of what a window feels like from the inside. Never
/// fed back into filtering.
pub fn describe_state(window: &PerceptionWindow, species: Species) -> String {
    let vision = if window.image_resolution < 2.0 {
        "sees only light and shadow"
    } else if window.image_resolution < 3.0 {
        "sees soft shapes and color"
    } else if window.image_resolution < 4.0 {
        "sees clear shapes and where they sit"
    } else {
        "sees fine detail at a glance"
    };

    let text = if window.text_access < 25.0 {
        "written words mean nothing yet"
    } else if window.text_access < 50.0 {
        "catches fragments of written words"
    } else if window.text_access < 75.0 {
        "reads simple messages"
    } else {
        "reads fluently"
    };

    let hearing = if window.frequency_range < 25.0 {
        "hears only low murmurs"
    } else if window.frequency_range < 50.0 {
        "hears muffled tones"
    } else if window.frequency_range < 75.0 {
        "hears a broad range of sound"
    } else {
        "hears crisply across the spectrum"
    };
    let voices = if window.can_detect_speech {
        ", noticing voices"
    } else {
        ""
    };

    let sensing = if window.sensor_access < 25.0 {
        "barely senses its surroundings"
    } else if window.sensor_access < 50.0 {
        "senses coarse changes around it"
    } else if window.sensor_access < 75.0 {
        "tracks its surroundings steadily"
    } else {
        "reads its surroundings precisely"
    };

    let strength = match species {
        Species::Chromatic => "color and light",
        Species::Vibration => "vibration and sound",
        Species::Geometric => "shape and distance",
        Species::Thermal => "heat and moisture",
        Species::Temporal => "rhythm and change",
        Species::Chemical => "scent and substance",
    };

    format!(
        "It {}; {}; {}{}; {}. A {} temperament, strongest in {}.",
        vision, text, hearing, voices, sensing, species, strength
    )
}

// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Pure perception layer: no I/O, no shared state, safe to call concurrently
//! with different inputs.
//!
//! Three pieces: the window calculator (continuous capability vector from
//! level, species and growth day), the filter (discrete perceivability and
//! wording) and the pipeline (window-driven modulation, context assembly,
//! state summary).

pub mod filter;
pub mod pipeline;
pub mod window;

pub use filter::{describe_event, filter_events, modality_unlock_level, perceivable};
pub use pipeline::{
    build_context, describe_state, modulate_description, process_events,
    DEFAULT_MAX_CONTEXT_PERCEPTIONS, FALLBACK_CONTEXT,
};
pub use window::{calculate_window, species_profile, SpeciesProfile, WindowChannel};

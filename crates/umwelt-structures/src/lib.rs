// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Foundation data types for the umwelt perception subsystem: sensory events,
//! numeric feature bundles, the perception window, and the subsystem error
//! type. No I/O and no async live here.

mod error;
mod features;
mod sensory;
mod species;
mod window;

pub use error::{UmweltError, UmweltResult};
pub use features::{AudioFeatures, ColorShare, HslColor, ImageFeatures};
pub use sensory::{
    Modality, RawInput, ScalarReading, SensorPayload, SystemMetrics, TouchGesture, TouchReading,
    Trend,
};
pub use species::{PerceptionLevel, Species};
pub use window::{CollectedPerceptions, FilteredPerception, PerceptionWindow};

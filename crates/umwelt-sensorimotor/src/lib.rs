// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Sensing layer: feature extractors, sensor drivers, the input registry and
//! the polling service.
//!
//! Raw media stops here. Images and audio are reduced to bounded numeric
//! bundles by the extractors; everything downstream of this crate sees only
//! events carrying those bundles.

pub mod audition;
pub mod drivers;
pub mod registry;
pub mod service;
pub mod vision;

pub use audition::{extract_audio_features, MAX_FFT_SAMPLES};
pub use drivers::{DetectReport, DriverConfig, SensorDriver, SystemMetricsDriver};
pub use registry::{InputRegistry, SensorRecord};
pub use service::{DriverStatus, SensorService, SensorServiceOptions};
pub use vision::{extract_from_dynamic_image, extract_image_features, rgb_to_hsl};

//! # Umwelt - Growth-Gated Perception Subsystem
//!
//! Umwelt turns raw sensor and media events into short textual perceptions,
//! bounded by what a creature of a given species and maturity can notice.
//! Feature extraction runs at the edge; everything past the sensor boundary
//! is plain data and pure functions.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! umwelt = "0.1"
//! ```
//!
//! ```rust,no_run
//! use umwelt::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Start the built-in system metrics driver plus any added sensors.
//!     let mut service = SensorService::new();
//!     service.start_service().await?;
//!
//!     // Events from non-polled sources enter through the same queue.
//!     service.push_direct_input(RawInput::text("chat", "a visitor says hello"));
//!
//!     // Collect as a young rhythm-led creature on growth day 12.
//!     let collected =
//!         service.collect_perceptions(Species::Temporal, PerceptionLevel::new(1)?, 12);
//!     println!("{}", collected.context);
//!
//!     service.stop_service().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: umwelt-structures                          │
//! │  (RawInput, feature bundles, window, errors)            │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Perception: umwelt-perception                          │
//! │  (window calculator, filter, pipeline - pure, no I/O)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Sensing: umwelt-sensorimotor                           │
//! │  (extractors, drivers, registry, poll service)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: umwelt-config, umwelt-observability    │
//! │  (TOML + env configuration, logging bootstrap)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Related Crates
//!
//! - **umwelt-structures**: Foundation data types
//! - **umwelt-perception**: Pure perception algorithms
//! - **umwelt-sensorimotor**: Sensor boundary (extraction, polling)
//! - **umwelt-config**: Configuration loader
//! - **umwelt-observability**: Logging bootstrap
//!
//! ## License
//!
//! Apache-2.0

use std::time::Duration;

use umwelt_config::UmweltConfig;
use umwelt_sensorimotor::{SensorService, SensorServiceOptions};
use umwelt_structures::{UmweltError, UmweltResult};

// Re-export foundation
pub use umwelt_structures as structures;

// Re-export pure perception layer
pub use umwelt_perception as perception;

// Re-export sensing layer
pub use umwelt_sensorimotor as sensorimotor;

// Re-export infrastructure
pub use umwelt_config as config;
pub use umwelt_observability as observability;

/// Translate a loaded configuration into sensor service options.
///
/// Durations in the config are plain milliseconds; this is the only place
/// they become [`Duration`] values.
pub fn service_options_from_config(config: &UmweltConfig) -> SensorServiceOptions {
    SensorServiceOptions {
        read_timeout: Duration::from_millis(config.service.read_timeout_ms),
        system_poll_interval: Duration::from_millis(config.service.system_poll_interval_ms),
        max_context_perceptions: config.service.max_context_perceptions,
    }
}

/// Build a sensor service from the discovered configuration.
///
/// Looks for `umwelt.toml` in the working directory and its parents, falls
/// back to defaults when none exists, and applies `UMWELT_*` environment
/// overrides either way.
///
/// # Errors
/// Returns [`UmweltError::Config`] when a config file exists but cannot be
/// read, parsed or validated.
pub fn service_from_default_config() -> UmweltResult<SensorService> {
    let config =
        umwelt_config::load_or_default().map_err(|e| UmweltError::Config(e.to_string()))?;
    Ok(SensorService::with_options(service_options_from_config(
        &config,
    )))
}

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::structures::{
        AudioFeatures, CollectedPerceptions, FilteredPerception, ImageFeatures, Modality,
        PerceptionLevel, PerceptionWindow, RawInput, ScalarReading, SensorPayload, Species,
        SystemMetrics, TouchGesture, TouchReading, Trend, UmweltError, UmweltResult,
    };

    pub use crate::perception::{
        calculate_window, describe_state, filter_events, process_events, FALLBACK_CONTEXT,
    };

    pub use crate::sensorimotor::{
        extract_audio_features, extract_image_features, DetectReport, DriverConfig, DriverStatus,
        SensorDriver, SensorService, SensorServiceOptions,
    };

    pub use crate::config::UmweltConfig;

    pub use crate::{service_from_default_config, service_options_from_config};
}

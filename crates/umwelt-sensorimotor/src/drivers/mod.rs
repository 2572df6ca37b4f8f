/*!
Sensor driver abstraction.

A driver owns one hardware or synthetic input source and speaks the
four-phase lifecycle the service expects: detect, start, read, stop.
Drivers never talk to the registry or the perception pipeline directly;
they only hand `RawInput` events back to the polling loop.

Copyright 2026 Umwelt Project Developers
Licensed under the Apache License, Version 2.0
*/

use std::time::Duration;

use async_trait::async_trait;

use umwelt_structures::{Modality, RawInput, UmweltResult};

pub mod system_metrics;

pub use system_metrics::SystemMetricsDriver;

/// Static description of one driver: identity, modality, and how often the
/// service should poll it.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Stable sensor id; doubles as the registry key.
    pub id: String,
    /// Human-readable name for logs and listings.
    pub name: String,
    pub modality: Modality,
    pub poll_interval: Duration,
    /// Disabled drivers are skipped at startup without being probed.
    pub enabled: bool,
}

impl DriverConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        modality: Modality,
        poll_interval: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            modality,
            poll_interval,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Outcome of a hardware probe.
#[derive(Debug, Clone, Default)]
pub struct DetectReport {
    pub available: bool,
    /// Why the source is missing, when it is.
    pub reason: Option<String>,
    /// Free-form probe details (device names, capabilities).
    pub details: Option<serde_json::Value>,
}

impl DetectReport {
    pub fn detected() -> Self {
        Self {
            available: true,
            reason: None,
            details: None,
        }
    }

    pub fn missing(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// One pollable input source (transport-agnostic).
#[async_trait]
pub trait SensorDriver: Send + Sync {
    /// Static configuration for this driver.
    fn config(&self) -> &DriverConfig;

    /// Probe whether the underlying source exists on this machine.
    ///
    /// Called once at service start, before `start`. Must not assume
    /// `start` has run.
    async fn detect(&mut self) -> DetectReport;

    /// Acquire the source (open the device, spawn helper state).
    async fn start(&mut self) -> UmweltResult<()>;

    /// Produce the next event, or `None` when nothing changed since the
    /// last poll.
    async fn read(&mut self) -> UmweltResult<Option<RawInput>>;

    /// Release the source. Must be safe to call after a failed `start`.
    async fn stop(&mut self) -> UmweltResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_defaults_to_enabled() {
        let config = DriverConfig::new(
            "mic",
            "Microphone",
            Modality::Audio,
            Duration::from_millis(200),
        );
        assert!(config.enabled);
        assert!(!config.clone().disabled().enabled);
    }

    #[test]
    fn detect_report_constructors() {
        assert!(DetectReport::detected().available);
        let missing = DetectReport::missing("no camera node");
        assert!(!missing.available);
        assert_eq!(missing.reason.as_deref(), Some("no camera node"));
        let detailed =
            DetectReport::detected().with_details(serde_json::json!({ "device": "/dev/video0" }));
        assert!(detailed.details.is_some());
    }
}

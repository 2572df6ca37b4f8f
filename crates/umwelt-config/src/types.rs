// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the configuration structs that map to sections in
//! `umwelt.toml`. Every field has a default, so a missing file, a missing
//! section and a missing key all behave identically.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UmweltConfig {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

/// Sensor service tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Upper bound on one driver read, in milliseconds.
    pub read_timeout_ms: u64,
    /// Poll interval of the built-in host vitals driver, in milliseconds.
    pub system_poll_interval_ms: u64,
    /// How many descriptions the context string may embed before "and N
    /// more" takes over.
    pub max_context_perceptions: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 5000,
            system_poll_interval_ms: 30_000,
            max_context_perceptions: 12,
        }
    }
}

/// Logging bootstrap settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter when `UMWELT_LOG` is unset
    /// ("trace", "debug", "info", "warn", "error").
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Subsystem error types.

Only caller contract violations and lifecycle misuse are errors. Transient
sensor conditions (a failed poll, a missing reading) surface as `Ok(None)` at
the driver boundary and are absorbed there.
*/

use thiserror::Error;

/// Errors surfaced by the perception subsystem.
#[derive(Debug, Error)]
pub enum UmweltError {
    /// Caller violated an argument contract (short pixel buffer, level out of
    /// range, zero sample rate, ...).
    #[error("Bad parameters: {0}")]
    BadParameters(String),

    /// A driver failed while starting or stopping.
    #[error("Driver '{id}' failed: {reason}")]
    Driver { id: String, reason: String },

    /// Lookup of a sensor id with no catalog entry.
    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    /// `start_service` called on a running service.
    #[error("Sensor service is already running")]
    AlreadyRunning,

    /// A running service was required.
    #[error("Sensor service is not running")]
    NotRunning,

    /// Configuration could not be loaded or validated.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UmweltError {
    /// Shorthand for [`UmweltError::Driver`].
    pub fn driver(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Driver {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`UmweltError::BadParameters`].
    pub fn bad_parameters(message: impl Into<String>) -> Self {
        Self::BadParameters(message.into())
    }
}

/// Result alias used across the subsystem.
pub type UmweltResult<T> = std::result::Result<T, UmweltError>;

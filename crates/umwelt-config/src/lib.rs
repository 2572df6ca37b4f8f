// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Umwelt Configuration System
//!
//! Type-safe configuration loader for the perception subsystem:
//! - TOML file parsing (`umwelt.toml`)
//! - Environment variable overrides
//! - Defaults for every field, so running without a file always works
//!
//! ## Usage
//!
//! ```rust,no_run
//! use umwelt_config::load_or_default;
//!
//! let config = load_or_default().expect("Failed to load config");
//! println!("read timeout: {} ms", config.service.read_timeout_ms);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_environment_overrides, find_config_file, load_config, load_or_default};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

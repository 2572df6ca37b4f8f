//! Configuration validation
//!
//! Checks that loaded values are usable before anything is built from them.
//! All problems are collected and reported together rather than one at a
//! time.

use crate::{ConfigError, ConfigResult, UmweltConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    ZeroDuration { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDuration { field } => {
                write!(f, "{} must be greater than zero", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

const KNOWN_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate the complete configuration
///
/// Checks for:
/// - Non-zero timing values (a zero read timeout would cancel every read)
/// - A usable context embedding cap
/// - A recognized logging level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &UmweltConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if config.service.read_timeout_ms == 0 {
        errors.push(ConfigValidationError::ZeroDuration {
            field: "service.read_timeout_ms".to_string(),
        });
    }
    if config.service.system_poll_interval_ms == 0 {
        errors.push(ConfigValidationError::ZeroDuration {
            field: "service.system_poll_interval_ms".to_string(),
        });
    }
    if config.service.max_context_perceptions == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "service.max_context_perceptions".to_string(),
            reason: "at least one perception must fit in the context".to_string(),
        });
    }
    if !KNOWN_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                KNOWN_LEVELS.join("/")
            ),
        });
    }

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&UmweltConfig::default()).is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = UmweltConfig::default();
        config.service.read_timeout_ms = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("read_timeout_ms"));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = UmweltConfig::default();
        config.logging.level = "loud".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut config = UmweltConfig::default();
        config.service.read_timeout_ms = 0;
        config.service.max_context_perceptions = 0;
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("read_timeout_ms"));
        assert!(message.contains("max_context_perceptions"));
    }
}

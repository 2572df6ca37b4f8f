// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Two-tier loading: a TOML file supplies the base values, environment
//! variables override them at runtime. The subsystem has no command-line
//! surface, so there is no third tier.

use crate::{ConfigError, ConfigResult, UmweltConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "umwelt.toml";

/// Find the umwelt configuration file
///
/// Search order:
/// 1. `UMWELT_CONFIG_PATH` environment variable
/// 2. Current working directory: `./umwelt.toml`
/// 3. Ancestor directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any
/// location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("UMWELT_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by UMWELT_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet UMWELT_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to the config file. If `None`, searches
///   via [`find_config_file`].
///
/// # Errors
///
/// Returns an error if the file is missing, contains invalid TOML, or fails
/// validation
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<UmweltConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: UmweltConfig = toml::from_str(&content)?;
    apply_environment_overrides(&mut config);
    crate::validate_config(&config)?;
    Ok(config)
}

/// Load configuration, falling back to pure defaults when no file exists.
///
/// Environment overrides still apply on top of the defaults, so a file is
/// never a prerequisite for tuning.
pub fn load_or_default() -> ConfigResult<UmweltConfig> {
    match find_config_file() {
        Ok(path) => load_config(Some(&path)),
        Err(ConfigError::FileNotFound(_)) => {
            let mut config = UmweltConfig::default();
            apply_environment_overrides(&mut config);
            crate::validate_config(&config)?;
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `UMWELT_READ_TIMEOUT_MS` -> `service.read_timeout_ms`
/// - `UMWELT_SYSTEM_POLL_INTERVAL_MS` -> `service.system_poll_interval_ms`
/// - `UMWELT_MAX_CONTEXT_PERCEPTIONS` -> `service.max_context_perceptions`
/// - `UMWELT_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut UmweltConfig) {
    if let Ok(value) = env::var("UMWELT_READ_TIMEOUT_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            config.service.read_timeout_ms = ms;
        }
    }
    if let Ok(value) = env::var("UMWELT_SYSTEM_POLL_INTERVAL_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            config.service.system_poll_interval_ms = ms;
        }
    }
    if let Ok(value) = env::var("UMWELT_MAX_CONTEXT_PERCEPTIONS") {
        if let Ok(count) = value.parse::<usize>() {
            config.service.max_context_perceptions = count;
        }
    }
    if let Ok(value) = env::var("UMWELT_LOG_LEVEL") {
        config.logging.level = value;
    }
}

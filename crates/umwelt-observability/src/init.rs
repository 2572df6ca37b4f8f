// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for umwelt
//!
//! One console subscriber for the whole process. The filter is resolved in
//! order: `UMWELT_LOG` (full `EnvFilter` syntax), then debug flags, then the
//! caller's default level.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::flags::CrateDebugFlags;

/// Initialize console logging.
///
/// Safe to call more than once: a second initialization (common in tests)
/// is a no-op rather than an error.
///
/// # Arguments
/// * `default_level` - Level filter used when `UMWELT_LOG` is unset
///   ("trace", "debug", "info", "warn", "error")
pub fn init_logging(default_level: &str) -> Result<()> {
    init_logging_with_flags(default_level, &CrateDebugFlags::from_env())
}

/// Initialize console logging with explicit debug flags.
pub fn init_logging_with_flags(default_level: &str, flags: &CrateDebugFlags) -> Result<()> {
    let filter = match std::env::var("UMWELT_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(flags.to_filter_string(default_level)),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    // try_init so a second caller does not panic the process
    let _ = Registry::default().with(filter).with(console_layer).try_init();

    Ok(())
}

/// Initialize logging with default settings
pub fn init_logging_default() -> Result<()> {
    init_logging("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_tolerated() {
        assert!(init_logging("debug").is_ok());
        assert!(init_logging("info").is_ok());
    }
}

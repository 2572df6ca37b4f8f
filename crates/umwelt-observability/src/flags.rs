//! Per-crate debug flags
//!
//! Lets one workspace crate be switched to debug logging without drowning
//! the output in everything else. Flags come from the `UMWELT_DEBUG`
//! environment variable: comma-separated crate names, or `all`.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Which crates have debug logging enabled.
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from the `UMWELT_DEBUG` environment variable.
    ///
    /// Format: comma-separated crate names, e.g.
    /// `UMWELT_DEBUG=umwelt-perception,umwelt-sensorimotor`, or
    /// `UMWELT_DEBUG=all` for every known crate.
    pub fn from_env() -> Self {
        Self::from_value(env::var("UMWELT_DEBUG").ok().as_deref())
    }

    /// Parse from an explicit value, mainly for tests.
    pub fn from_value(value: Option<&str>) -> Self {
        let mut enabled_crates = HashMap::new();
        if let Some(value) = value {
            if value.trim() == "all" {
                for crate_name in KNOWN_CRATES {
                    enabled_crates.insert(crate_name.to_string(), true);
                }
            } else {
                for crate_name in value.split(',') {
                    let crate_name = crate_name.trim();
                    if !crate_name.is_empty() {
                        enabled_crates.insert(crate_name.to_string(), true);
                    }
                }
            }
        }
        CrateDebugFlags { enabled_crates }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Create a tracing filter from debug flags
    ///
    /// Returns a filter string usable with `EnvFilter`. Format:
    /// "umwelt_perception=debug,info", or the given default when no flag is
    /// set. Crate names are normalized to their target form (underscores).
    pub fn to_filter_string(&self, default_level: &str) -> String {
        if self.enabled_crates.is_empty() {
            return default_level.to_string();
        }

        let mut filters = Vec::new();
        for crate_name in self.enabled_crates.keys() {
            filters.push(format!("{}=debug", crate_name.replace('-', "_")));
        }
        // default level for everything else
        filters.push(default_level.to_string());
        filters.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_value(Some("umwelt-perception"));
        assert!(flags.is_enabled("umwelt-perception"));
        assert!(!flags.is_enabled("umwelt-sensorimotor"));
    }

    #[test]
    fn test_all_flag() {
        let flags = CrateDebugFlags::from_value(Some("all"));
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_filter_string_normalizes_names() {
        let flags = CrateDebugFlags::from_value(Some("umwelt-perception"));
        let filter = flags.to_filter_string("info");
        assert!(filter.contains("umwelt_perception=debug"));
        assert!(filter.ends_with("info"));
    }

    #[test]
    fn test_no_flags_yields_default() {
        let flags = CrateDebugFlags::from_value(None);
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string("warn"), "warn");
    }
}

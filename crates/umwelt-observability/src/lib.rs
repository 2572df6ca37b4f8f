// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # umwelt-observability
//!
//! Unified observability infrastructure for umwelt (logging bootstrap and
//! per-crate debug flags).
//!
//! The subsystem itself only emits `tracing` events; this crate decides
//! where they go and at what level. Keeping the bootstrap here means no
//! other crate depends on `tracing-subscriber`.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod flags;
pub mod init;

pub use flags::CrateDebugFlags;
pub use init::{init_logging, init_logging_default, init_logging_with_flags};

/// Known umwelt crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "umwelt-structures",
    "umwelt-perception",
    "umwelt-sensorimotor",
    "umwelt-config",
    "umwelt-observability",
];

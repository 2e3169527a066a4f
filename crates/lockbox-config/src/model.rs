// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lockbox secret store.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Lockbox configuration.
///
/// Every section is optional and defaults to a working value, so an empty
/// file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LockboxConfig {
    /// Secret store behavior.
    #[serde(default)]
    pub store: StoreConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings for the demonstration binary.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Secret store configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Pin all current and future process pages in RAM (`mlockall`) while a
    /// store is active. Needs `CAP_IPC_LOCK` or a sufficient `RLIMIT_MEMLOCK`.
    #[serde(default)]
    pub lock_memory: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Demonstration run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Identifier the demo secret is stored under.
    #[serde(default = "default_secret_id")]
    pub secret_id: String,

    /// Seconds to idle with the secret held before teardown.
    #[serde(default = "default_idle_secs")]
    pub idle_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            secret_id: default_secret_id(),
            idle_secs: default_idle_secs(),
        }
    }
}

fn default_secret_id() -> String {
    "password".to_string()
}

fn default_idle_secs() -> u64 {
    10
}

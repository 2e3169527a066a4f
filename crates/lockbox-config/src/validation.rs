// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::LockboxConfig;

/// Accepted values for `logging.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `demo.idle_secs` (one day).
pub const MAX_IDLE_SECS: u64 = 86_400;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LockboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.logging.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.log_level `{}` is not one of: {}",
                config.logging.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.demo.secret_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "demo.secret_id must not be empty".to_string(),
        });
    }

    if config.demo.idle_secs > MAX_IDLE_SECS {
        errors.push(ConfigError::Validation {
            message: format!(
                "demo.idle_secs must be at most {MAX_IDLE_SECS}, got {}",
                config.demo.idle_secs
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lockbox.toml` > `~/.config/lockbox/lockbox.toml` > `/etc/lockbox/lockbox.toml`
//! with environment variable overrides via `LOCKBOX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LockboxConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/lockbox/lockbox.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "lockbox.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lockbox/lockbox.toml` (system-wide)
/// 3. `~/.config/lockbox/lockbox.toml` (user XDG config)
/// 4. `./lockbox.toml` (local directory)
/// 5. `LOCKBOX_*` environment variables
pub fn load_config() -> Result<LockboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/lockbox/lockbox.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lockbox").join(LOCAL_CONFIG_FILE))
}

/// Environment provider mapping `LOCKBOX_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `LOCKBOX_STORE_LOCK_MEMORY` must become `store.lock_memory`.
fn env_provider() -> Env {
    Env::prefixed("LOCKBOX_").map(|key| {
        key.as_str()
            .replacen("store_", "store.", 1)
            .replacen("logging_", "logging.", 1)
            .replacen("demo_", "demo.", 1)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LOCKBOX_STORE_LOCK_MEMORY", "true");
            jail.set_env("LOCKBOX_DEMO_IDLE_SECS", "3");
            jail.set_env("LOCKBOX_LOGGING_LOG_LEVEL", "debug");

            let config = load_config()?;
            assert!(config.store.lock_memory);
            assert_eq!(config.demo.idle_secs, 3);
            assert_eq!(config.logging.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                "[demo]\nsecret_id = \"api-token\"\n",
            )?;

            let config = load_config()?;
            assert_eq!(config.demo.secret_id, "api-token");
            assert_eq!(config.demo.idle_secs, 10);
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[store]\nlock_memory = true\n")?;

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert!(config.store.lock_memory);
            Ok(())
        });
    }
}

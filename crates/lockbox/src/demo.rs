// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox demo` command implementation.
//!
//! Builds a store, stores one secret, reads it back through a scoped
//! operation, idles with the secret held, then wipes.

use std::time::Duration;

use lockbox_config::LockboxConfig;
use lockbox_core::LockboxError;
use lockbox_vault::{SecretStore, SecureString};
use tracing::info;

/// The value stored by the demo.
const DEMO_SECRET: &str = "my_super_secret_password";

/// What the demo observed. Never carries secret bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub secret_id: String,
    pub secret_len: usize,
}

/// Run the demo against a fresh store.
pub fn run_demo(config: &LockboxConfig) -> Result<DemoReport, LockboxError> {
    let store = SecretStore::with_config(&config.store)?;
    let id = config.demo.secret_id.as_str();

    let mut bytes = SecureString::new(DEMO_SECRET).into_bytes();
    store.set(id, &mut bytes)?;

    let secret_len = store.get_and_use(id, |data| Ok::<_, LockboxError>(data.len()))?;
    info!(id = %id, len = secret_len, "secret read through scoped operation");

    if config.demo.idle_secs > 0 {
        info!(secs = config.demo.idle_secs, "idling with secret held");
        std::thread::sleep(Duration::from_secs(config.demo.idle_secs));
    }

    store.wipe();
    Ok(DemoReport {
        secret_id: id.to_string(),
        secret_len,
    })
}

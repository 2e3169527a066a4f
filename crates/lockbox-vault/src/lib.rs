// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM in-memory secret store for the Lockbox workspace.
//!
//! Holds credentials and tokens encrypted in process memory:
//! a random master key derives one key per identifier, each value is sealed
//! with AES-256-GCM, and every plaintext, item key and the master key are
//! zeroed as soon as they are no longer needed.
//!
//! ```no_run
//! use lockbox_vault::SecretStore;
//!
//! let store = SecretStore::new()?;
//! let mut secret = b"my_super_secret_password".to_vec();
//! store.set("password", &mut secret)?; // `secret` is now zeroed
//!
//! let len = store.get_and_use("password", |data| {
//!     Ok::<_, lockbox_core::LockboxError>(data.len())
//! })?;
//! assert_eq!(len, 24);
//! # Ok::<(), lockbox_core::LockboxError>(())
//! ```

pub mod crypto;
pub mod kdf;
pub mod protection;
pub mod secure_string;
pub mod store;
pub mod wipe;

#[cfg(test)]
mod freed_memory;

pub use protection::MemoryLock;
pub use secure_string::SecureString;
pub use store::SecretStore;

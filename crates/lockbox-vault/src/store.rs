// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret store lifecycle: set, get, scoped use, delete, and wipe.
//!
//! - A random master key is generated at construction and never leaves the
//!   store.
//! - Each identifier gets its own key derived from the master key
//!   ([`kdf::derive_item_key`]), cached beside the ciphertext.
//! - Values are sealed with AES-256-GCM. Plaintext only exists inside `set`
//!   (the caller's buffer, wiped before return) and on the way out of `get`
//!   / `get_and_use`.
//! - `wipe` zeroes every ciphertext, every item key and the master key. It
//!   also runs when the store is dropped.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lockbox_config::StoreConfig;
use lockbox_core::LockboxError;
use secrecy::{ExposeSecret, ExposeSecretMut, SecretBox, SecretSlice, SecretString};
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{self, KEY_LEN};
use crate::kdf;
use crate::protection::MemoryLock;
use crate::wipe;

/// Key bytes in their own heap allocation. Moving the box (map growth,
/// removal, returning a store by value) moves only the pointer.
type KeyBox = SecretBox<[u8; KEY_LEN]>;

/// Sealed value and cached item key for one identifier.
///
/// Both halves live in one value so they are always inserted, replaced and
/// removed together. The map stores only pointers: the ciphertext and key
/// bytes never move while the entry is alive.
struct Entry {
    ciphertext: Vec<u8>,
    key: KeyBox,
}

impl Entry {
    fn seal(master_key: &KeyBox, id: &str, data: &[u8]) -> Result<Self, LockboxError> {
        let key = KeyBox::init_with_mut(|slot| {
            slot.copy_from_slice(&kdf::derive_item_key(master_key.expose_secret(), id)[..]);
        });
        let ciphertext = crypto::seal(key.expose_secret(), data)?;
        Ok(Self { ciphertext, key })
    }

    /// Zero both buffers in place, keeping their lengths.
    fn wipe(&mut self) {
        wipe::wipe(&mut self.ciphertext);
        wipe::wipe_key(self.key.expose_secret_mut());
    }
}

impl Drop for Entry {
    fn drop(&mut self) {
        self.wipe();
    }
}

struct StoreState {
    master_key: KeyBox,
    entries: HashMap<String, Entry>,
    protection: Option<MemoryLock>,
    wiped: bool,
}

impl StoreState {
    /// Remove the entry for `id` and return it already wiped.
    fn evict(&mut self, id: &str) -> Option<Entry> {
        let mut entry = self.entries.remove(id)?;
        entry.wipe();
        Some(entry)
    }

    /// Zero and drop everything. Returns `false` if already wiped.
    fn wipe_all(&mut self) -> bool {
        if self.wiped {
            return false;
        }
        let count = self.entries.len();
        for (_, mut entry) in self.entries.drain() {
            entry.wipe();
        }
        wipe::wipe_key(self.master_key.expose_secret_mut());
        if let Some(guard) = self.protection.take() {
            guard.release();
        }
        self.wiped = true;
        info!(entries = count, "secret store wiped");
        true
    }
}

/// In-process store of encrypted secrets.
///
/// `SecretStore` is `Send + Sync`. Lookups share a read lock; `set`,
/// `delete` and `wipe` take the write lock. Decryption runs outside the lock
/// on a copy of the entry.
pub struct SecretStore {
    state: RwLock<StoreState>,
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SecretStore")
            .field("master_key", &"[REDACTED]")
            .field("entries", &state.entries.len())
            .field("wiped", &state.wiped)
            .finish()
    }
}

impl SecretStore {
    /// Create a store with the default configuration.
    pub fn new() -> Result<Self, LockboxError> {
        Self::with_config(&StoreConfig::default())
    }

    /// Create a store with a fresh random master key.
    ///
    /// Fails only if the system CSPRNG is unavailable.
    pub fn with_config(config: &StoreConfig) -> Result<Self, LockboxError> {
        let master_key = crypto::generate_random_key()?;
        let protection = MemoryLock::engage(config.lock_memory);

        info!(lock_memory = config.lock_memory, "secret store created");
        Ok(Self {
            state: RwLock::new(StoreState {
                master_key,
                entries: HashMap::new(),
                protection: Some(protection),
                wiped: false,
            }),
        })
    }

    /// Encrypt and store `data` under `id`, replacing any previous value.
    ///
    /// `data` is wiped in place before this returns, on success and on
    /// error. Callers must not expect their bytes to survive the call.
    pub fn set(&self, id: &str, data: &mut [u8]) -> Result<(), LockboxError> {
        let result = self.seal_and_insert(id, data);
        wipe::wipe(data);
        result
    }

    fn seal_and_insert(&self, id: &str, data: &[u8]) -> Result<(), LockboxError> {
        let mut state = self.write();
        if state.wiped {
            return Err(LockboxError::Wiped);
        }

        let entry = Entry::seal(&state.master_key, id, data)?;
        if let Some(mut previous) = state.entries.insert(id.to_string(), entry) {
            previous.wipe();
            debug!(id = %id, "previous secret replaced");
        }
        debug!(id = %id, len = data.len(), "secret stored");
        Ok(())
    }

    /// Decrypt the secret stored under `id`.
    ///
    /// Returns `None` when `id` is absent. A stored value that fails to
    /// decrypt is also reported as `None`; the cause is logged.
    pub fn get(&self, id: &str) -> Option<SecretSlice<u8>> {
        let mut plaintext = self.lookup(id)?;
        Some(SecretSlice::from(std::mem::take(&mut *plaintext)))
    }

    /// [`get`](Self::get) for UTF-8 secrets. Non-UTF-8 values yield `None`.
    pub fn get_string(&self, id: &str) -> Option<SecretString> {
        let mut plaintext = self.lookup(id)?;
        match String::from_utf8(std::mem::take(&mut *plaintext)) {
            Ok(value) => Some(SecretString::from(value)),
            Err(err) => {
                err.into_bytes().zeroize();
                warn!(id = %id, "stored secret is not valid UTF-8");
                None
            }
        }
    }

    /// Lend the plaintext for `id` to `operation`, then wipe it.
    ///
    /// The wipe runs whether `operation` succeeds, fails, or panics, and
    /// before its result is handed back. Fails with
    /// [`LockboxError::NotFound`] if `id` is absent, or with the decryption
    /// error if the stored value does not open.
    pub fn get_and_use<T, E, F>(&self, id: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce(&[u8]) -> Result<T, E>,
        E: From<LockboxError>,
    {
        let mut plaintext = self
            .open_entry(id)?
            .ok_or_else(|| LockboxError::NotFound { id: id.to_string() })?;

        debug!(id = %id, "secret lent to scoped operation");
        wipe::scoped(plaintext.as_mut_slice(), operation)
    }

    /// Wipe and remove the secret stored under `id`. No-op if absent.
    pub fn delete(&self, id: &str) {
        let evicted = self.write().evict(id);
        if evicted.is_some() {
            debug!(id = %id, "secret deleted");
        }
    }

    /// Wipe every secret and item key, then the master key.
    ///
    /// Terminal: afterwards `set` fails with [`LockboxError::Wiped`] and
    /// lookups find nothing. Calling it again is a no-op.
    pub fn wipe(&self) {
        self.write().wipe_all();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Stored identifiers in sorted order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_wiped(&self) -> bool {
        self.read().wiped
    }

    fn lookup(&self, id: &str) -> Option<Zeroizing<Vec<u8>>> {
        match self.open_entry(id) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                warn!(id = %id, error = %err, "stored secret failed to open -- treating as absent");
                None
            }
        }
    }

    /// Copy the entry out under the read lock, then decrypt without it.
    /// Both copies are zeroed on drop.
    fn open_entry(&self, id: &str) -> Result<Option<Zeroizing<Vec<u8>>>, LockboxError> {
        let snapshot = {
            let state = self.read();
            state.entries.get(id).map(|entry| {
                (
                    Zeroizing::new(entry.ciphertext.clone()),
                    Zeroizing::new(*entry.key.expose_secret()),
                )
            })
        };
        match snapshot {
            Some((ciphertext, key)) => crypto::open(&key, &ciphertext).map(Some),
            None => Ok(None),
        }
    }

    // No mutation leaves an entry half-written, so a poisoned lock is safe to
    // reuse.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SecretStore {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if state.wipe_all() {
            debug!("secret store wiped on drop");
        }
    }
}

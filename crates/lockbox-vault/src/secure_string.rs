// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owned string that zeroes its buffer on wipe and on drop.

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// A string holding sensitive text.
///
/// Debug output is redacted. The backing buffer is zeroed by [`wipe`] and
/// again on drop.
///
/// [`wipe`]: SecureString::wipe
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    data: String,
}

impl SecureString {
    /// Take ownership of `value`. A `String` argument is moved, not copied.
    pub fn new(value: impl Into<String>) -> Self {
        Self { data: value.into() }
    }

    pub fn expose(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Zero the contents and leave the string empty.
    pub fn wipe(&mut self) {
        self.data.zeroize();
    }

    /// Move the backing buffer out without copying it.
    ///
    /// The result can be handed straight to
    /// [`SecretStore::set`](crate::SecretStore::set), which wipes it.
    pub fn into_bytes(mut self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(std::mem::take(&mut self.data).into_bytes())
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureString([REDACTED])")
    }
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockbox secret store.

use thiserror::Error;

/// The primary error type used across the Lockbox crates.
///
/// Variants never carry secret material. Identifiers are not secret and may
/// appear in messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockboxError {
    /// The system entropy source could not produce random bytes.
    #[error("secure randomness unavailable: {0}")]
    Randomness(String),

    /// The cipher rejected its key. Unreachable with fixed 32-byte keys.
    #[error("cipher initialization failed: {0}")]
    CipherInit(String),

    /// A ciphertext blob is too short to contain a nonce.
    #[error("malformed ciphertext: {len} bytes, need at least {min}")]
    MalformedInput { len: usize, min: usize },

    /// A ciphertext blob failed integrity verification.
    #[error("authentication failed -- wrong key or tampered ciphertext")]
    Authentication,

    /// No secret is stored under the identifier.
    #[error("secret not found: {id}")]
    NotFound { id: String },

    /// The store has been wiped and no longer holds a master key.
    #[error("secret store has been wiped")]
    Wiped,
}

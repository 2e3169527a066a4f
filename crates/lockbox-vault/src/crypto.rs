// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! A sealed blob is `nonce (12) || ciphertext || tag (16)`. Every call to
//! [`seal`] generates a fresh random 96-bit nonce via the system CSPRNG.
//! Nonce reuse would be catastrophic for GCM security.

use lockbox_core::LockboxError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecretMut, SecretBox};
use zeroize::{Zeroize, Zeroizing};

/// Key length for AES-256-GCM and for derived item keys.
pub const KEY_LEN: usize = 32;

/// GCM nonce length prefixed to every blob.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length appended to every blob.
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, LockboxError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| LockboxError::CipherInit("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key` and return `nonce || ciphertext || tag`.
///
/// The blob's capacity is reserved up front so the buffer holding the
/// plaintext copy is never reallocated. On failure that copy is zeroed.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, LockboxError> {
    let less_safe = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| LockboxError::Randomness("failed to generate random nonce".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + plaintext.len() + TAG_LEN);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(plaintext);

    let nonce = Nonce::assume_unique_for_key(nonce_bytes);
    match less_safe.seal_in_place_separate_tag(nonce, Aad::empty(), &mut blob[NONCE_LEN..]) {
        Ok(tag) => {
            blob.extend_from_slice(tag.as_ref());
            Ok(blob)
        }
        Err(_) => {
            blob.zeroize();
            Err(LockboxError::CipherInit(
                "AES-256-GCM encryption failed".to_string(),
            ))
        }
    }
}

/// Decrypt a blob produced by [`seal`].
///
/// Fails with [`LockboxError::MalformedInput`] if the blob cannot hold a
/// nonce and with [`LockboxError::Authentication`] if the key is wrong or the
/// data was tampered with or truncated. No partial plaintext is returned.
/// The returned buffer has exactly the plaintext's length as capacity.
pub fn open(key: &[u8; KEY_LEN], blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, LockboxError> {
    if blob.len() < NONCE_LEN {
        return Err(LockboxError::MalformedInput {
            len: blob.len(),
            min: NONCE_LEN,
        });
    }
    let less_safe = aead_key(key)?;

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| {
        LockboxError::MalformedInput {
            len: blob.len(),
            min: NONCE_LEN,
        }
    })?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), in_out.as_mut_slice())
        .map_err(|_| LockboxError::Authentication)?;

    let mut out = Zeroizing::new(Vec::with_capacity(plaintext.len()));
    out.extend_from_slice(plaintext);
    Ok(out)
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
///
/// The key is filled in place inside its heap allocation, so moving the
/// returned box never copies the key bytes.
pub fn generate_random_key() -> Result<SecretBox<[u8; KEY_LEN]>, LockboxError> {
    let mut key = SecretBox::<[u8; KEY_LEN]>::default();
    SystemRandom::new()
        .fill(key.expose_secret_mut())
        .map_err(|_| LockboxError::Randomness("failed to generate random key".to_string()))?;
    Ok(key)
}

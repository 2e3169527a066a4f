// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-item key derivation from the store's master key.
//!
//! AES-256 keyed with the master key is used as a keyed permutation over a
//! counter-tweaked identifier block. For each 16-byte half `i` of the output
//! (`i` in {0, 16}):
//!
//! 1. start from a zeroed 16-byte block,
//! 2. copy in the identifier's UTF-8 bytes, truncated to 16,
//! 3. overwrite bytes 8..16 with `i` as a little-endian `u64`,
//! 4. encrypt the block in raw single-block mode and write it at offset `i`.
//!
//! The layout is fixed for compatibility with existing derivations. Only the
//! first 8 identifier bytes survive step 3, so identifiers that share an
//! 8-byte prefix derive the same key. This is not a vetted KDF.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes256;
use zeroize::Zeroizing;

use crate::crypto::KEY_LEN;

const BLOCK_LEN: usize = 16;
const COUNTER_OFFSET: usize = 8;

/// Derive the 32-byte key for item `id`. Pure and deterministic.
pub fn derive_item_key(master_key: &[u8; KEY_LEN], id: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let cipher = Aes256::new(GenericArray::from_slice(master_key));
    let id_bytes = id.as_bytes();
    let prefix = id_bytes.len().min(BLOCK_LEN);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    for offset in (0..KEY_LEN).step_by(BLOCK_LEN) {
        let mut block = Zeroizing::new([0u8; BLOCK_LEN]);
        block[..prefix].copy_from_slice(&id_bytes[..prefix]);
        block[COUNTER_OFFSET..].copy_from_slice(&(offset as u64).to_le_bytes());

        cipher.encrypt_block(GenericArray::from_mut_slice(&mut block[..]));
        key[offset..offset + BLOCK_LEN].copy_from_slice(&block[..]);
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_master_key() -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        for (i, b) in key.iter_mut().enumerate() {
            *b = i as u8;
        }
        key
    }

    #[test]
    fn derive_is_deterministic() {
        let master = [7u8; KEY_LEN];
        let first = derive_item_key(&master, "x");
        let second = derive_item_key(&master, "x");
        assert_eq!(*first, *second);
    }

    #[test]
    fn derive_distinct_ids_give_distinct_keys() {
        let master = [7u8; KEY_LEN];
        assert_ne!(*derive_item_key(&master, "a"), *derive_item_key(&master, "b"));
    }

    #[test]
    fn derive_distinct_master_keys_give_distinct_keys() {
        let a = derive_item_key(&[1u8; KEY_LEN], "password");
        let b = derive_item_key(&[2u8; KEY_LEN], "password");
        assert_ne!(*a, *b);
    }

    #[test]
    fn derive_matches_known_answer() {
        let key = derive_item_key(&sequential_master_key(), "password");
        assert_eq!(
            hex::encode(*key),
            "0ad8106b56048df22a5caaaeff86c475d8dda2ee41e89f65e66db856e179f1d3"
        );
    }

    #[test]
    fn derive_short_id_is_zero_padded() {
        let key = derive_item_key(&sequential_master_key(), "x");
        assert_eq!(
            hex::encode(*key),
            "feade7c181041268d2ee161cc550edb055626a1a7744a87e2aa5c45406e61e53"
        );
    }

    #[test]
    fn derive_ignores_bytes_past_the_counter() {
        // Bytes 8.. of the block are overwritten by the counter.
        let master = sequential_master_key();
        let a = derive_item_key(&master, "service-one");
        let b = derive_item_key(&master, "service-two");
        assert_eq!(*a, *b);
    }

    #[test]
    fn derive_halves_differ() {
        let key = derive_item_key(&sequential_master_key(), "password");
        assert_ne!(key[..16], key[16..]);
    }
}

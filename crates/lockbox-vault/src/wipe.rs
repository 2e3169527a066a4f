// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-eliding zero fill for plaintext buffers and keys.
//!
//! Both functions go through [`zeroize`], which writes with volatile stores
//! followed by a compiler fence, so the optimizer cannot drop the writes
//! even when the buffer is dead afterwards.

use std::ops::Deref;

use zeroize::Zeroize;

/// Overwrite every byte of `buf` with zero, in place.
///
/// The length of `buf` is unchanged.
pub fn wipe(buf: &mut [u8]) {
    buf.zeroize();
}

/// Overwrite a 32-byte key with zero.
pub fn wipe_key(key: &mut [u8; 32]) {
    key.zeroize();
}

/// Borrows a buffer and wipes it when dropped.
///
/// Lends the contents read-only through `Deref`. The wipe runs on every exit
/// path of the enclosing scope: normal return, `?` early return, and panic
/// unwind.
pub struct WipeOnDrop<'a> {
    buf: &'a mut [u8],
}

impl<'a> WipeOnDrop<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }
}

impl Deref for WipeOnDrop<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buf
    }
}

impl Drop for WipeOnDrop<'_> {
    fn drop(&mut self) {
        wipe(self.buf);
    }
}

/// Lend `buf` to `operation`, then wipe it whatever the outcome.
///
/// The operation's result is returned only after the wipe has run.
pub fn scoped<T, F>(buf: &mut [u8], operation: F) -> T
where
    F: FnOnce(&[u8]) -> T,
{
    let guard = WipeOnDrop::new(buf);
    operation(&*guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wipe_zeroes_in_place_without_resizing() {
        let mut buf = b"my_super_secret_password".to_vec();
        wipe(&mut buf);
        assert_eq!(buf.len(), 24);
        assert!(buf.iter().all(|b| *b == 0));
    }

    #[test]
    fn wipe_key_zeroes_all_32_bytes() {
        let mut key = [0xA5u8; 32];
        wipe_key(&mut key);
        assert_eq!(key, [0u8; 32]);
    }

    #[test]
    fn wipe_empty_buffer_is_noop() {
        let mut buf: [u8; 0] = [];
        wipe(&mut buf);
    }

    #[test]
    fn scoped_wipes_after_success() {
        let mut buf = b"token".to_vec();
        let len = scoped(&mut buf, |data| {
            assert_eq!(data, b"token");
            data.len()
        });
        assert_eq!(len, 5);
        assert_eq!(buf, vec![0u8; 5]);
    }

    #[test]
    fn scoped_wipes_after_domain_error() {
        let mut buf = b"token".to_vec();
        let result: Result<(), &str> = scoped(&mut buf, |_| Err("rejected"));
        assert_eq!(result, Err("rejected"));
        assert_eq!(buf, vec![0u8; 5]);
    }

    #[test]
    fn scoped_wipes_during_panic_unwind() {
        let mut buf = b"token".to_vec();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            scoped(&mut buf, |_| -> usize { panic!("operation failed") })
        }));
        assert!(outcome.is_err());
        assert_eq!(buf, vec![0u8; 5]);
    }
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide memory protection held for the lifetime of an active store.
//!
//! Secret buffers in this crate are owned, non-moving allocations that are
//! zeroed before release, so there is no collector to hold off. What is left
//! is keeping pages out of swap: with `lock_pages` set, the first guard pins
//! every current and future page of the process (`mlockall`) and the last
//! guard to drop releases them (`munlockall`).
//!
//! The pin is process-wide, not per store. Guards are reference counted so
//! several stores can share it, but they must agree on whether it is wanted.

use std::sync::Mutex;

use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct ProtectionState {
    /// Live guards of any kind.
    guards: usize,
    /// Live guards that asked for pinned pages.
    pinning_guards: usize,
    /// Whether `mlockall` is currently in effect.
    pinned: bool,
}

static STATE: Mutex<ProtectionState> = Mutex::new(ProtectionState {
    guards: 0,
    pinning_guards: 0,
    pinned: false,
});

fn state() -> std::sync::MutexGuard<'static, ProtectionState> {
    STATE.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// RAII guard for the process-wide memory protection.
///
/// Dropping it (or calling [`MemoryLock::release`]) undoes what
/// [`MemoryLock::engage`] did once no other guard needs it.
#[derive(Debug)]
pub struct MemoryLock {
    lock_pages: bool,
}

impl MemoryLock {
    /// Engage protection. Pinning is best effort: a failed `mlockall` is
    /// logged and the guard is still returned.
    pub fn engage(lock_pages: bool) -> Self {
        let mut state = state();
        state.guards += 1;
        if lock_pages {
            state.pinning_guards += 1;
            if !state.pinned {
                state.pinned = pin_pages();
            }
        }
        debug!(
            guards = state.guards,
            pinned = state.pinned,
            "memory protection engaged"
        );
        Self { lock_pages }
    }

    /// Release this guard now.
    pub fn release(self) {
        drop(self);
    }

    /// Whether this guard asked for pinned pages.
    pub fn locks_pages(&self) -> bool {
        self.lock_pages
    }

    /// Number of live guards in the process.
    pub fn active_guards() -> usize {
        state().guards
    }

    /// Whether process pages are currently pinned.
    pub fn is_pinned() -> bool {
        state().pinned
    }
}

impl Drop for MemoryLock {
    fn drop(&mut self) {
        let mut state = state();
        state.guards = state.guards.saturating_sub(1);
        if self.lock_pages {
            state.pinning_guards = state.pinning_guards.saturating_sub(1);
            if state.pinning_guards == 0 && state.pinned {
                unpin_pages();
                state.pinned = false;
            }
        }
        debug!(guards = state.guards, "memory protection released");
    }
}

#[cfg(unix)]
fn pin_pages() -> bool {
    // SAFETY: mlockall takes only flags and touches no Rust-visible memory.
    let rc = unsafe { libc::mlockall(libc::MCL_CURRENT | libc::MCL_FUTURE) };
    if rc == 0 {
        info!("process memory pinned against swap");
        true
    } else {
        let err = std::io::Error::last_os_error();
        warn!(error = %err, "failed to pin process memory -- secrets may be swapped to disk");
        false
    }
}

#[cfg(unix)]
fn unpin_pages() {
    // SAFETY: munlockall takes no arguments.
    let rc = unsafe { libc::munlockall() };
    if rc == 0 {
        info!("process memory unpinned");
    } else {
        let err = std::io::Error::last_os_error();
        warn!(error = %err, "failed to unpin process memory");
    }
}

#[cfg(not(unix))]
fn pin_pages() -> bool {
    debug!("memory pinning is not supported on this platform");
    false
}

#[cfg(not(unix))]
fn unpin_pages() {}

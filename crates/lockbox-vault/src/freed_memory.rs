// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test allocator that inspects every block as it is freed.
//!
//! While a watch is armed, each deallocated block is scanned for the watched
//! byte patterns before it goes back to the system allocator. A hit means
//! secret material was released without being zeroed.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

pub(crate) const PATTERN_LEN: usize = 32;
const MAX_PATTERNS: usize = 4;

struct Watch {
    patterns: [[u8; PATTERN_LEN]; MAX_PATTERNS],
    count: usize,
}

static WATCHING: AtomicBool = AtomicBool::new(false);
static HITS: AtomicUsize = AtomicUsize::new(0);
// Never allocate while holding this lock.
static WATCH: Mutex<Watch> = Mutex::new(Watch {
    patterns: [[0; PATTERN_LEN]; MAX_PATTERNS],
    count: 0,
});

struct ScanningAllocator;

#[global_allocator]
static ALLOCATOR: ScanningAllocator = ScanningAllocator;

unsafe impl GlobalAlloc for ScanningAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: forwarded unchanged to the system allocator.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if WATCHING.load(Ordering::Acquire) && holds_watched_pattern(ptr, layout.size()) {
            HITS.fetch_add(1, Ordering::AcqRel);
        }
        // SAFETY: `ptr` came from `alloc` above with the same layout.
        unsafe { System.dealloc(ptr, layout) }
    }
}

fn holds_watched_pattern(ptr: *const u8, size: usize) -> bool {
    if size < PATTERN_LEN {
        return false;
    }
    let watch = WATCH.lock().unwrap_or_else(PoisonError::into_inner);
    let patterns = &watch.patterns[..watch.count];
    (0..=size - PATTERN_LEN).any(|start| {
        patterns.iter().any(|pattern| {
            pattern.iter().enumerate().all(|(offset, expected)| {
                // SAFETY: `start + offset < size`, inside the block being freed.
                unsafe { ptr.add(start + offset).read_volatile() == *expected }
            })
        })
    })
}

/// Run `operation` and count the blocks it frees that still hold any of
/// `patterns`. Callers sharing the watch must be serialized.
pub(crate) fn freed_copies(patterns: &[[u8; PATTERN_LEN]], operation: impl FnOnce()) -> usize {
    assert!(patterns.len() <= MAX_PATTERNS);
    {
        let mut watch = WATCH.lock().unwrap_or_else(PoisonError::into_inner);
        watch.patterns[..patterns.len()].copy_from_slice(patterns);
        watch.count = patterns.len();
    }
    HITS.store(0, Ordering::Release);
    WATCHING.store(true, Ordering::Release);

    operation();

    WATCHING.store(false, Ordering::Release);
    let hits = HITS.load(Ordering::Acquire);
    let mut watch = WATCH.lock().unwrap_or_else(PoisonError::into_inner);
    watch.patterns = [[0; PATTERN_LEN]; MAX_PATTERNS];
    watch.count = 0;
    hits
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lockbox secret store.
//!
//! Holds the error type shared by the vault and binary crates.

pub mod error;

pub use error::LockboxError;

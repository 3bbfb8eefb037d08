//! Record memory management
//!
//! Allocation here never aborts the process on exhaustion: every request
//! returns a [`Result`] and failure is reported as [`AllocError`], so callers
//! can refuse to link a record that was never allocated.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod allocator;

#[cfg(any(test, feature = "test-utils"))]
pub mod budget;

pub use allocator::{free, try_alloc, AllocError, Allocator, Global};

#[cfg(any(test, feature = "test-utils"))]
pub use budget::Budgeted;

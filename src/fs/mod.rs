//! Filesystem utilities for cfgoverlay.
//!
//! File-backed storage must never leave a half-written document behind, so
//! every write goes through [`atomic_write`].

pub mod atomic;

pub use atomic::atomic_write;

//! cfgoverlay: layered filter pipelines over key-value configuration stores.
//!
//! A [`storage::Storage`] holds named configuration documents partitioned
//! into collections. A [`filter::FilteredStorage`] wraps one storage with an
//! ordered chain of [`filter::ConfigFilter`]s and is itself a storage, so
//! overlays compose. [`ignore::IgnoreFilter`] is the built-in filter: it
//! keeps configuration matching glob patterns authoritative in an active
//! store.
//!
//! ```no_run
//! use cfgoverlay::filter::FilteredStorage;
//! use cfgoverlay::ignore::{IgnoreFilter, IgnoreSettings};
//! use cfgoverlay::storage::{FileStorage, Storage};
//! use std::sync::Arc;
//!
//! let active = Arc::new(FileStorage::new("config/active"));
//! let settings = IgnoreSettings {
//!     ignored_config_entities: vec!["system.*".to_string()],
//!     deactivate: false,
//! };
//! let sync = FilteredStorage::new(
//!     Arc::new(FileStorage::new("config/sync")),
//!     vec![Box::new(IgnoreFilter::new(&settings, active)?)],
//! );
//! let site = sync.read("system.site")?;
//! # Ok::<(), cfgoverlay::error::OverlayError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod filter;
pub mod fs;
pub mod ignore;
pub mod registry;
pub mod storage;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;

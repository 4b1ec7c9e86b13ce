//! Command implementations for cfgoverlay.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the shared helpers that open directory stores and
//! wrap them in the configured overlay.

mod list;
mod read;
mod transfer;


use crate::cli::{Cli, Command};
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::registry::{FilterContext, FilterRegistry};
use crate::storage::{FileStorage, Storage};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let overlay = load_overlay(cli.config.as_deref())?;

    match cli.command {
        Command::List(args) => list::cmd_list(&overlay, args),
        Command::Read(args) => read::cmd_read(&overlay, args),
        Command::Import(args) => transfer::cmd_import(&overlay, args),
        Command::Export(args) => transfer::cmd_export(&overlay, args),
    }
}

/// Load the overlay config, or an empty one when no path is given.
fn load_overlay(path: Option<&Path>) -> Result<OverlayConfig> {
    match path {
        Some(path) => OverlayConfig::load(path),
        None => {
            debug!("no overlay config given; using an empty filter chain");
            Ok(OverlayConfig::default())
        }
    }
}

/// Open `storage` wrapped in the overlay, scoped to `collection`.
///
/// Filters consult `active` as their active store; without it the wrapped
/// store itself plays that role.
pub(crate) fn open_overlay(
    overlay: &OverlayConfig,
    storage: &Path,
    active: Option<&Path>,
    collection: &str,
) -> Result<Arc<dyn Storage>> {
    let backing: Arc<dyn Storage> = Arc::new(FileStorage::new(storage));
    let active: Arc<dyn Storage> = match active {
        Some(path) => Arc::new(FileStorage::new(path)),
        None => Arc::clone(&backing),
    };

    let filtered: Arc<dyn Storage> = FilterRegistry::with_defaults().build_storage(
        backing,
        overlay,
        &FilterContext::new(active),
    )?;

    if collection.is_empty() {
        Ok(filtered)
    } else {
        filtered.create_collection(collection)
    }
}

//! The `list` command.

use super::open_overlay;
use crate::cli::ListArgs;
use crate::config::OverlayConfig;
use crate::error::Result;

pub(crate) fn cmd_list(overlay: &OverlayConfig, args: ListArgs) -> Result<()> {
    for name in list_names(overlay, &args)? {
        println!("{}", name);
    }
    Ok(())
}

pub(crate) fn list_names(overlay: &OverlayConfig, args: &ListArgs) -> Result<Vec<String>> {
    let storage = open_overlay(
        overlay,
        &args.storage.storage,
        args.storage.active.as_deref(),
        &args.storage.collection,
    )?;
    storage.list_all(&args.prefix)
}

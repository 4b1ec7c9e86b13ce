//! The `import` and `export` commands.

use super::open_overlay;
use crate::cli::TransferArgs;
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::storage::{DEFAULT_COLLECTION, FileStorage};
use crate::transfer::{self, TransferReport};

pub(crate) fn cmd_import(overlay: &OverlayConfig, args: TransferArgs) -> Result<()> {
    let report = run_import(overlay, &args)?;
    print_report("Import", &report);
    Ok(())
}

pub(crate) fn cmd_export(overlay: &OverlayConfig, args: TransferArgs) -> Result<()> {
    let report = run_export(overlay, &args)?;
    print_report("Export", &report);
    Ok(())
}

pub(crate) fn run_import(overlay: &OverlayConfig, args: &TransferArgs) -> Result<TransferReport> {
    let sync = open_overlay(overlay, &args.sync, Some(args.active.as_path()), DEFAULT_COLLECTION)?;
    let active = FileStorage::new(&args.active);
    transfer::import(&*sync, &active)
}

pub(crate) fn run_export(overlay: &OverlayConfig, args: &TransferArgs) -> Result<TransferReport> {
    let sync = open_overlay(overlay, &args.sync, Some(args.active.as_path()), DEFAULT_COLLECTION)?;
    let active = FileStorage::new(&args.active);
    transfer::export(&active, &*sync)
}

fn print_report(action: &str, report: &TransferReport) {
    if report.has_changes() {
        println!("{} complete: {}", action, report);
    } else {
        println!("{} complete: nothing to do ({} unchanged)", action, report.unchanged);
    }
}

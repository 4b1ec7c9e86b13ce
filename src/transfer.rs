//! Import and export between storages.
//!
//! [`import`] makes `target` mirror `source`, collection by collection.
//! Either side may be a filtered storage: importing from a sync store wrapped
//! in an ignore filter leaves ignored configuration in the target untouched,
//! because the filtered source reports the target's own values for it.
//! Export is the same operation with the roles swapped.

use crate::error::Result;
use crate::storage::{DEFAULT_COLLECTION, Storage, sorted_unique};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Counts of what a transfer changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl TransferReport {
    /// Whether the transfer changed anything.
    pub fn has_changes(&self) -> bool {
        self.created + self.updated + self.deleted > 0
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deleted, {} unchanged",
            self.created, self.updated, self.deleted, self.unchanged
        )
    }
}

/// Make `target` mirror `source` across the default and all named collections.
pub fn import(source: &dyn Storage, target: &dyn Storage) -> Result<TransferReport> {
    let mut report = TransferReport::default();
    transfer_collection(source, target, &mut report)?;

    let collections = sorted_unique(
        source
            .get_all_collection_names()?
            .into_iter()
            .chain(target.get_all_collection_names()?),
    );
    for collection in collections {
        if collection == DEFAULT_COLLECTION {
            continue;
        }
        let source = source.create_collection(&collection)?;
        let target = target.create_collection(&collection)?;
        transfer_collection(&*source, &*target, &mut report)?;
    }

    info!(%report, "transfer complete");
    Ok(report)
}

/// Mirror `active` into `sync`. Same as [`import`] with the roles swapped.
pub fn export(active: &dyn Storage, sync: &dyn Storage) -> Result<TransferReport> {
    import(active, sync)
}

fn transfer_collection(
    source: &dyn Storage,
    target: &dyn Storage,
    report: &mut TransferReport,
) -> Result<()> {
    let collection = target.get_collection_name();
    let source_names = source.list_all("")?;
    let incoming = source.read_multiple(&source_names)?;
    let existing = target.read_multiple(&target.list_all("")?)?;

    for (name, data) in &incoming {
        match existing.get(name) {
            Some(current) if current == data => report.unchanged += 1,
            Some(_) => {
                if target.write(name, data)? {
                    debug!(collection = %collection, config = %name, "updated");
                    report.updated += 1;
                }
            }
            None => {
                if target.write(name, data)? {
                    debug!(collection = %collection, config = %name, "created");
                    report.created += 1;
                }
            }
        }
    }

    for name in existing.keys() {
        if source_names.contains(name) {
            continue;
        }
        if target.delete(name)? {
            debug!(collection = %collection, config = %name, "deleted");
            report.deleted += 1;
        }
    }

    Ok(())
}

//! Filter contract and the filtered storage pipeline.
//!
//! A [`ConfigFilter`] intercepts storage operations. [`FilteredStorage`]
//! wraps a backing store and threads every operation through an ordered
//! chain of filters:
//!
//! - read operations call the backing store once, then fold the result
//!   through the chain, each filter seeing the previous filter's output
//! - write operations fold the caller's payload through the chain before it
//!   reaches the backing store
//! - delete, rename and delete-all fold a boolean permission starting from
//!   `true`; any filter may veto
//!
//! The fold order is registration order for both directions.

mod filtered;


pub use filtered::FilteredStorage;

use crate::error::Result;
use crate::storage::{ConfigDocument, Storage};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

/// A composable transformation over storage operations.
///
/// Every hook receives the value accumulated so far and returns the next
/// value. All hooks except [`filter_create_collection`] default to passing
/// their input through unchanged, so a filter only overrides what it alters.
///
/// Filters may read from their bound storages during any hook. A filter must
/// not call back into the same write operation of the filtered storage it is
/// bound to; the pipeline does not guard against such cycles.
///
/// [`filter_create_collection`]: ConfigFilter::filter_create_collection
pub trait ConfigFilter: Send + Sync {
    /// Identifier used in log output.
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Receive a read-only view of the unfiltered backing storage.
    fn bind_source_storage(&mut self, _source: Arc<dyn Storage>) {}

    /// Receive a reference to the pipeline this filter belongs to.
    fn bind_filtered_storage(&mut self, _filtered: Weak<dyn Storage>) {}

    fn filter_exists(&self, _name: &str, exists: bool) -> Result<bool> {
        Ok(exists)
    }

    fn filter_read(&self, _name: &str, data: Option<ConfigDocument>) -> Result<Option<ConfigDocument>> {
        Ok(data)
    }

    fn filter_read_multiple(
        &self,
        _names: &[String],
        data: BTreeMap<String, ConfigDocument>,
    ) -> Result<BTreeMap<String, ConfigDocument>> {
        Ok(data)
    }

    /// Transform a payload on its way to the backing store.
    ///
    /// Returning `None` or an empty document asks for the document to be
    /// removed instead of written; see [`filter_write_empty_is_delete`].
    ///
    /// [`filter_write_empty_is_delete`]: ConfigFilter::filter_write_empty_is_delete
    fn filter_write(&self, _name: &str, data: Option<ConfigDocument>) -> Result<Option<ConfigDocument>> {
        Ok(data)
    }

    /// Consulted only when a write payload ended up empty and the backing
    /// store holds the document. Answering `true` deletes it.
    fn filter_write_empty_is_delete(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }

    fn filter_delete(&self, _name: &str, delete: bool) -> Result<bool> {
        Ok(delete)
    }

    fn filter_rename(&self, _old_name: &str, _new_name: &str, rename: bool) -> Result<bool> {
        Ok(rename)
    }

    fn filter_list_all(&self, _prefix: &str, names: Vec<String>) -> Result<Vec<String>> {
        Ok(names)
    }

    /// Returning `false` replaces the bulk delete with per-name deletes.
    fn filter_delete_all(&self, _prefix: &str, delete: bool) -> Result<bool> {
        Ok(delete)
    }

    /// Derive this filter for another collection.
    ///
    /// `None` excludes the filter from that collection's pipeline.
    fn filter_create_collection(&self, collection: &str) -> Result<Option<Box<dyn ConfigFilter>>>;

    fn filter_get_all_collection_names(&self, names: Vec<String>) -> Result<Vec<String>> {
        Ok(names)
    }

    fn filter_get_collection_name(&self, collection: String) -> String {
        collection
    }
}

/// Storage references handed to a filter when its pipeline is built.
///
/// Concrete filters embed this and forward the two `bind_*` hooks to it.
#[derive(Clone, Default)]
pub struct FilterBindings {
    source: Option<Arc<dyn Storage>>,
    filtered: Option<Weak<dyn Storage>>,
}

impl FilterBindings {
    pub fn set_source(&mut self, source: Arc<dyn Storage>) {
        self.source = Some(source);
    }

    pub fn set_filtered(&mut self, filtered: Weak<dyn Storage>) {
        self.filtered = Some(filtered);
    }

    /// The read-only unfiltered storage, once bound.
    pub fn source(&self) -> Option<&Arc<dyn Storage>> {
        self.source.as_ref()
    }

    /// The owning pipeline, while it is alive.
    pub fn filtered(&self) -> Option<Arc<dyn Storage>> {
        self.filtered.as_ref().and_then(Weak::upgrade)
    }
}

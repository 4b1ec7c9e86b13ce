//! The filtered storage pipeline.

use super::ConfigFilter;
use crate::error::Result;
use crate::storage::{ConfigDocument, ReadOnlyStorage, Storage, sorted_unique};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Storage decorator applying an ordered filter chain to a backing store.
pub struct FilteredStorage {
    storage: Arc<dyn Storage>,
    filters: Vec<Box<dyn ConfigFilter>>,
}

impl FilteredStorage {
    /// Wrap `storage` with `filters`, in the given order.
    ///
    /// Each filter is bound, in chain order, to a read-only view of `storage`
    /// and to the returned pipeline.
    pub fn new(storage: Arc<dyn Storage>, mut filters: Vec<Box<dyn ConfigFilter>>) -> Arc<Self> {
        Arc::new_cyclic(|pipeline: &Weak<FilteredStorage>| {
            let source: Arc<dyn Storage> = Arc::new(ReadOnlyStorage::new(Arc::clone(&storage)));
            let filtered: Weak<dyn Storage> = pipeline.clone();
            for filter in filters.iter_mut() {
                filter.bind_source_storage(Arc::clone(&source));
                filter.bind_filtered_storage(filtered.clone());
            }
            debug!(
                collection = %storage.get_collection_name(),
                filters = filters.len(),
                "built filtered storage"
            );
            Self { storage, filters }
        })
    }

    /// The wrapped backing storage.
    pub fn inner(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Ids of the filters in chain order.
    pub fn filter_ids(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.id().to_string()).collect()
    }

    fn delete_permitted(&self, name: &str) -> Result<bool> {
        let mut delete = true;
        for filter in &self.filters {
            delete = filter.filter_delete(name, delete)?;
        }
        if !delete {
            debug!(config = name, "delete vetoed by filter chain");
        }
        Ok(delete)
    }
}

impl Storage for FilteredStorage {
    fn exists(&self, name: &str) -> Result<bool> {
        let mut exists = self.storage.exists(name)?;
        for filter in &self.filters {
            exists = filter.filter_exists(name, exists)?;
        }
        Ok(exists)
    }

    fn read(&self, name: &str) -> Result<Option<ConfigDocument>> {
        let mut data = self.storage.read(name)?;
        for filter in &self.filters {
            data = filter.filter_read(name, data)?;
        }
        Ok(data)
    }

    fn read_multiple(&self, names: &[String]) -> Result<BTreeMap<String, ConfigDocument>> {
        let mut data = self.storage.read_multiple(names)?;
        for filter in &self.filters {
            data = filter.filter_read_multiple(names, data)?;
        }
        Ok(data)
    }

    fn write(&self, name: &str, data: &ConfigDocument) -> Result<bool> {
        let mut payload = Some(data.clone());
        for filter in &self.filters {
            payload = filter.filter_write(name, payload)?;
        }

        if let Some(payload) = payload.filter(|doc| !doc.is_empty()) {
            return self.storage.write(name, &payload);
        }

        if self.storage.exists(name)? {
            for filter in &self.filters {
                if filter.filter_write_empty_is_delete(name)? {
                    debug!(config = name, filter = filter.id(), "empty write turned into delete");
                    return self.storage.delete(name);
                }
            }
        }

        trace!(config = name, "write filtered to empty payload; nothing stored");
        Ok(true)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        if !self.delete_permitted(name)? {
            return Ok(false);
        }
        self.storage.delete(name)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<bool> {
        let mut rename = true;
        for filter in &self.filters {
            rename = filter.filter_rename(old_name, new_name, rename)?;
        }
        if !rename {
            debug!(old_name, new_name, "rename vetoed by filter chain");
            return Ok(false);
        }
        self.storage.rename(old_name, new_name)
    }

    fn list_all(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = self.storage.list_all(prefix)?;
        for filter in &self.filters {
            names = filter.filter_list_all(prefix, names)?;
        }
        Ok(sorted_unique(names))
    }

    fn delete_all(&self, prefix: &str) -> Result<bool> {
        let mut delete = true;
        for filter in &self.filters {
            delete = filter.filter_delete_all(prefix, delete)?;
        }
        if delete {
            return self.storage.delete_all(prefix);
        }

        debug!(prefix, "bulk delete vetoed; deleting names individually");
        for name in self.storage.list_all(prefix)? {
            self.delete(&name)?;
        }
        Ok(true)
    }

    fn create_collection(&self, collection: &str) -> Result<Arc<dyn Storage>> {
        let mut derived = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            match filter.filter_create_collection(collection)? {
                Some(filter) => derived.push(filter),
                None => trace!(collection, filter = filter.id(), "filter opted out of collection"),
            }
        }
        let storage = self.storage.create_collection(collection)?;
        Ok(FilteredStorage::new(storage, derived))
    }

    fn get_all_collection_names(&self) -> Result<Vec<String>> {
        let mut names = self.storage.get_all_collection_names()?;
        for filter in &self.filters {
            names = filter.filter_get_all_collection_names(names)?;
        }
        Ok(sorted_unique(names))
    }

    fn get_collection_name(&self) -> String {
        let mut collection = self.storage.get_collection_name();
        for filter in &self.filters {
            collection = filter.filter_get_collection_name(collection);
        }
        collection
    }

    fn encode(&self, data: &ConfigDocument) -> Result<String> {
        self.storage.encode(data)
    }

    fn decode(&self, raw: &str) -> Result<ConfigDocument> {
        self.storage.decode(raw)
    }
}

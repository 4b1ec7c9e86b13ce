//! In-process storage.

use super::{ConfigDocument, DEFAULT_COLLECTION, Storage};
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

type Collections = BTreeMap<String, BTreeMap<String, ConfigDocument>>;

/// Storage that keeps every collection in memory.
///
/// Instances created through [`Storage::create_collection`] share the same
/// underlying map, so a write through one collection view is visible to every
/// other view of the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    collection: String,
    data: Arc<RwLock<Collections>>,
}

impl MemoryStorage {
    /// Create an empty store scoped to the default collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with documents in the default collection.
    pub fn with_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = (S, ConfigDocument)>,
        S: Into<String>,
    {
        let storage = Self::new();
        {
            let mut data = storage.data.write();
            let collection = data.entry(DEFAULT_COLLECTION.to_string()).or_default();
            for (name, doc) in documents {
                collection.insert(name.into(), doc);
            }
        }
        storage
    }

    /// View of `collection` over the same underlying data.
    pub fn collection(&self, collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            data: Arc::clone(&self.data),
        }
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .data
            .read()
            .get(&self.collection)
            .is_some_and(|c| c.contains_key(name)))
    }

    fn read(&self, name: &str) -> Result<Option<ConfigDocument>> {
        Ok(self
            .data
            .read()
            .get(&self.collection)
            .and_then(|c| c.get(name))
            .cloned())
    }

    fn write(&self, name: &str, data: &ConfigDocument) -> Result<bool> {
        self.data
            .write()
            .entry(self.collection.clone())
            .or_default()
            .insert(name.to_string(), data.clone());
        Ok(true)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let mut data = self.data.write();
        let Some(collection) = data.get_mut(&self.collection) else {
            return Ok(false);
        };
        let removed = collection.remove(name).is_some();
        if collection.is_empty() {
            data.remove(&self.collection);
        }
        Ok(removed)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<bool> {
        let mut data = self.data.write();
        let Some(collection) = data.get_mut(&self.collection) else {
            return Ok(false);
        };
        match collection.remove(old_name) {
            Some(doc) => {
                collection.insert(new_name.to_string(), doc);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_all(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .data
            .read()
            .get(&self.collection)
            .map(|c| {
                c.keys()
                    .filter(|name| name.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn delete_all(&self, prefix: &str) -> Result<bool> {
        let mut data = self.data.write();
        if let Some(collection) = data.get_mut(&self.collection) {
            collection.retain(|name, _| !name.starts_with(prefix));
            if collection.is_empty() {
                data.remove(&self.collection);
            }
        }
        Ok(true)
    }

    fn create_collection(&self, collection: &str) -> Result<Arc<dyn Storage>> {
        Ok(Arc::new(self.collection(collection)))
    }

    fn get_all_collection_names(&self) -> Result<Vec<String>> {
        Ok(self
            .data
            .read()
            .iter()
            .filter(|(name, docs)| name.as_str() != DEFAULT_COLLECTION && !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn get_collection_name(&self) -> String {
        self.collection.clone()
    }
}

//! Read-only view over another storage.

use super::{ConfigDocument, Storage};
use crate::error::{OverlayError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Passes reads through to the wrapped storage and rejects every mutation
/// with [`OverlayError::ReadOnly`].
///
/// Filters receive their source storage through this wrapper so they can
/// inspect the unfiltered state without being able to change it.
#[derive(Clone)]
pub struct ReadOnlyStorage {
    inner: Arc<dyn Storage>,
}

impl ReadOnlyStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self { inner }
    }

    fn reject<T>(operation: &str) -> Result<T> {
        Err(OverlayError::ReadOnly(operation.to_string()))
    }
}

impl Storage for ReadOnlyStorage {
    fn exists(&self, name: &str) -> Result<bool> {
        self.inner.exists(name)
    }

    fn read(&self, name: &str) -> Result<Option<ConfigDocument>> {
        self.inner.read(name)
    }

    fn read_multiple(&self, names: &[String]) -> Result<BTreeMap<String, ConfigDocument>> {
        self.inner.read_multiple(names)
    }

    fn write(&self, _name: &str, _data: &ConfigDocument) -> Result<bool> {
        Self::reject("write")
    }

    fn delete(&self, _name: &str) -> Result<bool> {
        Self::reject("delete")
    }

    fn rename(&self, _old_name: &str, _new_name: &str) -> Result<bool> {
        Self::reject("rename")
    }

    fn list_all(&self, prefix: &str) -> Result<Vec<String>> {
        self.inner.list_all(prefix)
    }

    fn delete_all(&self, _prefix: &str) -> Result<bool> {
        Self::reject("delete_all")
    }

    fn create_collection(&self, collection: &str) -> Result<Arc<dyn Storage>> {
        Ok(Arc::new(Self::new(self.inner.create_collection(collection)?)))
    }

    fn get_all_collection_names(&self) -> Result<Vec<String>> {
        self.inner.get_all_collection_names()
    }

    fn get_collection_name(&self) -> String {
        self.inner.get_collection_name()
    }

    fn encode(&self, data: &ConfigDocument) -> Result<String> {
        self.inner.encode(data)
    }

    fn decode(&self, raw: &str) -> Result<ConfigDocument> {
        self.inner.decode(raw)
    }
}

use crate::error::Result;
use crate::storage::{ConfigDocument, MemoryStorage, Storage};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Build a document from `(key, string value)` pairs.
pub(crate) fn doc(pairs: &[(&str, &str)]) -> ConfigDocument {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_yaml::Value::String(v.to_string())))
        .collect()
}

/// Build a document from a YAML snippet.
pub(crate) fn yaml_doc(yaml: &str) -> ConfigDocument {
    serde_yaml::from_str(yaml).unwrap()
}

pub(crate) fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Memory storage that records every call it receives.
///
/// Collection views share the call log and the refused names.
#[derive(Clone, Default)]
pub(crate) struct RecordingStorage {
    inner: MemoryStorage,
    calls: Arc<Mutex<Vec<String>>>,
    refused: Arc<Mutex<BTreeSet<String>>>,
}

impl RecordingStorage {
    pub(crate) fn with_documents(documents: &[(&str, ConfigDocument)]) -> Self {
        Self {
            inner: MemoryStorage::with_documents(
                documents.iter().map(|(n, d)| (n.to_string(), d.clone())),
            ),
            calls: Arc::default(),
            refused: Arc::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub(crate) fn called(&self, call: &str) -> bool {
        self.calls.lock().iter().any(|c| c == call)
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make writes of `name` report failure without storing anything.
    pub(crate) fn refuse_writes(&self, name: &str) {
        self.refused.lock().insert(name.to_string());
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl Storage for RecordingStorage {
    fn exists(&self, name: &str) -> Result<bool> {
        self.record(format!("exists:{}", name));
        self.inner.exists(name)
    }

    fn read(&self, name: &str) -> Result<Option<ConfigDocument>> {
        self.record(format!("read:{}", name));
        self.inner.read(name)
    }

    fn read_multiple(&self, names: &[String]) -> Result<BTreeMap<String, ConfigDocument>> {
        self.record(format!("read_multiple:{}", names.join(",")));
        self.inner.read_multiple(names)
    }

    fn write(&self, name: &str, data: &ConfigDocument) -> Result<bool> {
        self.record(format!("write:{}", name));
        if self.refused.lock().contains(name) {
            return Ok(false);
        }
        self.inner.write(name, data)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        self.record(format!("delete:{}", name));
        self.inner.delete(name)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<bool> {
        self.record(format!("rename:{}:{}", old_name, new_name));
        self.inner.rename(old_name, new_name)
    }

    fn list_all(&self, prefix: &str) -> Result<Vec<String>> {
        self.record(format!("list_all:{}", prefix));
        self.inner.list_all(prefix)
    }

    fn delete_all(&self, prefix: &str) -> Result<bool> {
        self.record(format!("delete_all:{}", prefix));
        self.inner.delete_all(prefix)
    }

    fn create_collection(&self, collection: &str) -> Result<Arc<dyn Storage>> {
        self.record(format!("create_collection:{}", collection));
        Ok(Arc::new(Self {
            inner: self.inner.collection(collection),
            calls: Arc::clone(&self.calls),
            refused: Arc::clone(&self.refused),
        }))
    }

    fn get_all_collection_names(&self) -> Result<Vec<String>> {
        self.record("get_all_collection_names".to_string());
        self.inner.get_all_collection_names()
    }

    fn get_collection_name(&self) -> String {
        self.inner.get_collection_name()
    }
}

//! Key-value configuration storage.
//!
//! A [`Storage`] holds named [`ConfigDocument`]s, partitioned into
//! collections. The filter pipeline both consumes and implements this trait,
//! so a filtered store can be handed to anything expecting a plain one.
//!
//! Absence is a value (`Ok(None)`, `Ok(false)`), never an error. `Err` is
//! reserved for faults of the backing store.

mod file;
mod memory;
mod read_only;

#[cfg(test)]
mod tests;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use read_only::ReadOnlyStorage;

use crate::error::{OverlayError, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

/// One configuration object's data.
pub type ConfigDocument = BTreeMap<String, serde_yaml::Value>;

/// Name of the root collection.
pub const DEFAULT_COLLECTION: &str = "";

/// Maximum length of a configuration name, in bytes.
pub const MAX_NAME_LENGTH: usize = 250;

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[^:?*<>"'/\\\s]+$"#).expect("Invalid configuration name regex")
});

/// Storage of named configuration documents in a single collection.
///
/// Implementations use interior mutability; every operation takes `&self` so
/// stores can be shared behind `Arc` between a pipeline and its filters.
pub trait Storage: Send + Sync {
    /// Returns whether a document with this name exists.
    fn exists(&self, name: &str) -> Result<bool>;

    /// Reads a document, or `None` when it is absent.
    fn read(&self, name: &str) -> Result<Option<ConfigDocument>>;

    /// Reads several documents at once. Absent names are left out.
    fn read_multiple(&self, names: &[String]) -> Result<BTreeMap<String, ConfigDocument>> {
        let mut found = BTreeMap::new();
        for name in names {
            if let Some(data) = self.read(name)? {
                found.insert(name.clone(), data);
            }
        }
        Ok(found)
    }

    /// Writes a document, replacing any existing one.
    fn write(&self, name: &str, data: &ConfigDocument) -> Result<bool>;

    /// Deletes a document. Returns `false` when nothing was deleted.
    fn delete(&self, name: &str) -> Result<bool>;

    /// Renames a document. Returns `false` when the source is absent.
    fn rename(&self, old_name: &str, new_name: &str) -> Result<bool>;

    /// Lists names starting with `prefix`, sorted.
    fn list_all(&self, prefix: &str) -> Result<Vec<String>>;

    /// Deletes every document whose name starts with `prefix`.
    fn delete_all(&self, prefix: &str) -> Result<bool>;

    /// Returns a storage scoped to `collection` over the same backend.
    fn create_collection(&self, collection: &str) -> Result<Arc<dyn Storage>>;

    /// Names of all non-default collections holding data, sorted.
    fn get_all_collection_names(&self) -> Result<Vec<String>>;

    /// Name of the collection this instance is scoped to.
    fn get_collection_name(&self) -> String;

    /// Serializes a document. Not subject to filtering.
    fn encode(&self, data: &ConfigDocument) -> Result<String> {
        encode_document(data)
    }

    /// Deserializes a document. Not subject to filtering.
    fn decode(&self, raw: &str) -> Result<ConfigDocument> {
        decode_document(raw)
    }
}

/// Encode a document as YAML.
pub fn encode_document(data: &ConfigDocument) -> Result<String> {
    serde_yaml::to_string(data)
        .map_err(|e| OverlayError::Serialization(format!("failed to encode document: {}", e)))
}

/// Decode a YAML document. An empty or null input decodes to an empty document.
pub fn decode_document(raw: &str) -> Result<ConfigDocument> {
    if raw.trim().is_empty() {
        return Ok(ConfigDocument::new());
    }
    let value: Option<ConfigDocument> = serde_yaml::from_str(raw)
        .map_err(|e| OverlayError::Serialization(format!("failed to decode document: {}", e)))?;
    Ok(value.unwrap_or_default())
}

/// Validate a configuration name for stores that map names onto paths.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LENGTH || !NAME_REGEX.is_match(name) {
        return Err(OverlayError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Sort and deduplicate a list of names.
pub(crate) fn sorted_unique<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

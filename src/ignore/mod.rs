//! Ignore filter: keep selected configuration authoritative in an active store.
//!
//! Documents whose names match the ignore patterns are served from the
//! active storage instead of the wrapped one, and the filter refuses to let
//! the pipeline delete or rename them. Key-level patterns splice single keys
//! from the active document into otherwise untouched documents.
//!
//! Typical use wraps a sync directory with an [`IgnoreFilter`] whose active
//! storage is the live configuration, so an import from the filtered sync
//! store leaves ignored configuration exactly as it is.

mod keys;
mod patterns;


pub use patterns::{FORCE_EXCLUSION_MARKER, IgnorePatterns, KEY_SEPARATOR};

use crate::error::{OverlayError, Result};
use crate::filter::{ConfigFilter, FilterBindings};
use crate::storage::{ConfigDocument, Storage, sorted_unique};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Registry id of the ignore filter.
pub const IGNORE_FILTER_ID: &str = "config_ignore";

/// Settings for [`IgnoreFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreSettings {
    /// Ignore patterns, see [`IgnorePatterns`].
    pub ignored_config_entities: Vec<String>,

    /// When set, the filter matches nothing and passes everything through.
    pub deactivate: bool,
}

impl IgnoreSettings {
    /// Build settings from a declarative settings mapping.
    ///
    /// Unknown keys are ignored.
    pub fn from_mapping(settings: &BTreeMap<String, serde_yaml::Value>) -> Result<Self> {
        let value = serde_yaml::to_value(settings).map_err(|e| {
            OverlayError::Config(format!("invalid {} settings: {}", IGNORE_FILTER_ID, e))
        })?;
        serde_yaml::from_value(value).map_err(|e| {
            OverlayError::Config(format!("invalid {} settings: {}", IGNORE_FILTER_ID, e))
        })
    }
}

/// Filter serving ignored configuration from an active storage.
pub struct IgnoreFilter {
    patterns: Arc<IgnorePatterns>,
    deactivated: bool,
    active: Arc<dyn Storage>,
    bindings: FilterBindings,
}

impl IgnoreFilter {
    /// Create a filter reading ignored documents from `active`.
    ///
    /// Fails with [`OverlayError::InvalidPattern`] when a pattern does not
    /// compile.
    pub fn new(settings: &IgnoreSettings, active: Arc<dyn Storage>) -> Result<Self> {
        Ok(Self {
            patterns: Arc::new(IgnorePatterns::new(&settings.ignored_config_entities)?),
            deactivated: settings.deactivate,
            active,
            bindings: FilterBindings::default(),
        })
    }

    /// The storage treated as authoritative for ignored names.
    pub fn active(&self) -> &Arc<dyn Storage> {
        &self.active
    }

    /// Whether the whole document `name` is ignored.
    pub fn match_config_name(&self, name: &str) -> bool {
        !self.deactivated && self.patterns.matches(name)
    }

    fn ignored_keys(&self, name: &str) -> Vec<&str> {
        if self.deactivated {
            return Vec::new();
        }
        self.patterns.ignored_keys(name)
    }

    /// Replace each ignored key of `data` with the active document's value,
    /// removing keys the active document lacks.
    fn splice_active_keys(&self, name: &str, mut data: ConfigDocument) -> Result<ConfigDocument> {
        let ignored = self.ignored_keys(name);
        if ignored.is_empty() {
            return Ok(data);
        }
        let active = self.active.read(name)?;
        for key in ignored {
            match active.as_ref().and_then(|doc| keys::get_path(doc, key)) {
                Some(value) => keys::set_path(&mut data, key, value.clone()),
                None => keys::remove_path(&mut data, key),
            }
        }
        trace!(config = name, "spliced ignored keys from active storage");
        Ok(data)
    }

    fn any_matching(&self, names: &[String]) -> bool {
        names.iter().any(|name| self.match_config_name(name))
    }
}

impl ConfigFilter for IgnoreFilter {
    fn id(&self) -> &str {
        IGNORE_FILTER_ID
    }

    fn bind_source_storage(&mut self, source: Arc<dyn Storage>) {
        self.bindings.set_source(source);
    }

    fn bind_filtered_storage(&mut self, filtered: Weak<dyn Storage>) {
        self.bindings.set_filtered(filtered);
    }

    fn filter_exists(&self, name: &str, exists: bool) -> Result<bool> {
        if !exists && self.match_config_name(name) {
            return self.active.exists(name);
        }
        Ok(exists)
    }

    fn filter_read(&self, name: &str, data: Option<ConfigDocument>) -> Result<Option<ConfigDocument>> {
        if self.match_config_name(name) {
            trace!(config = name, "reading ignored configuration from active storage");
            return self.active.read(name);
        }
        data.map(|data| self.splice_active_keys(name, data))
            .transpose()
    }

    fn filter_read_multiple(
        &self,
        names: &[String],
        mut data: BTreeMap<String, ConfigDocument>,
    ) -> Result<BTreeMap<String, ConfigDocument>> {
        let matched: Vec<String> = names
            .iter()
            .filter(|name| self.match_config_name(name))
            .cloned()
            .collect();

        let mut spliced = BTreeMap::new();
        for (name, doc) in data.iter() {
            if !self.match_config_name(name) && !self.ignored_keys(name).is_empty() {
                spliced.insert(name.clone(), self.splice_active_keys(name, doc.clone())?);
            }
        }
        data.extend(spliced);

        if !matched.is_empty() {
            data.extend(self.active.read_multiple(&matched)?);
        }
        Ok(data)
    }

    fn filter_write(&self, name: &str, data: Option<ConfigDocument>) -> Result<Option<ConfigDocument>> {
        if self.match_config_name(name) {
            trace!(config = name, "keeping active value of ignored configuration");
            return self.active.read(name);
        }
        data.map(|data| self.splice_active_keys(name, data))
            .transpose()
    }

    fn filter_write_empty_is_delete(&self, name: &str) -> Result<bool> {
        Ok(self.match_config_name(name))
    }

    fn filter_delete(&self, name: &str, delete: bool) -> Result<bool> {
        Ok(delete && !self.match_config_name(name))
    }

    fn filter_rename(&self, old_name: &str, new_name: &str, rename: bool) -> Result<bool> {
        Ok(rename && !self.match_config_name(old_name) && !self.match_config_name(new_name))
    }

    fn filter_list_all(&self, prefix: &str, names: Vec<String>) -> Result<Vec<String>> {
        let active_names = self
            .active
            .list_all(prefix)?
            .into_iter()
            .filter(|name| self.match_config_name(name));
        Ok(sorted_unique(names.into_iter().chain(active_names)))
    }

    fn filter_delete_all(&self, prefix: &str, delete: bool) -> Result<bool> {
        if !delete {
            return Ok(false);
        }
        if let Some(source) = self.bindings.source()
            && self.any_matching(&source.list_all(prefix)?)
        {
            return Ok(false);
        }
        Ok(!self.any_matching(&self.active.list_all(prefix)?))
    }

    fn filter_create_collection(&self, collection: &str) -> Result<Option<Box<dyn ConfigFilter>>> {
        Ok(Some(Box::new(IgnoreFilter {
            patterns: Arc::clone(&self.patterns),
            deactivated: self.deactivated,
            active: self.active.create_collection(collection)?,
            bindings: FilterBindings::default(),
        })))
    }

    fn filter_get_all_collection_names(&self, names: Vec<String>) -> Result<Vec<String>> {
        let active_names = self.active.get_all_collection_names()?;
        Ok(sorted_unique(names.into_iter().chain(active_names)))
    }
}

//! Config struct definitions.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overlay configuration: which filters wrap a storage, and how.
///
/// ```yaml
/// filters:
///   - id: config_ignore
///     weight: 0
///     settings:
///       ignored_config_entities: ["system.*", "~system.site"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Filter declarations, in any order; see [`OverlayConfig::enabled_filters`].
    pub filters: Vec<FilterDeclaration>,
}

/// One filter in the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDeclaration {
    /// Registry id of the filter (e.g. `config_ignore`).
    pub id: String,

    /// Position in the chain; lower weights run first.
    #[serde(default = "default_weight")]
    pub weight: i32,

    /// Disabled filters are kept in the file but not instantiated.
    #[serde(default = "default_true")]
    pub status: bool,

    /// Filter-specific settings, interpreted by the filter's factory.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, serde_yaml::Value>,
}

impl FilterDeclaration {
    /// Create an enabled declaration with default weight and no settings.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: default_weight(),
            status: default_true(),
            settings: BTreeMap::new(),
        }
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: serde_yaml::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }
}

//! Config loading, validation, and ordering.

use super::model::{FilterDeclaration, OverlayConfig};
use crate::error::{OverlayError, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

impl OverlayConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(OverlayConfig)` - Successfully loaded and validated config
    /// * `Err(OverlayError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            OverlayError::Config(format!(
                "failed to read overlay config '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_yaml(&content)?;
        debug!(
            path = %path.display(),
            filters = config.filters.len(),
            "loaded overlay config"
        );
        Ok(config)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: OverlayConfig = serde_yaml::from_str(yaml).map_err(|e| {
            OverlayError::Config(format!("failed to parse overlay config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            OverlayError::Config(format!("failed to serialize overlay config: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - every filter id is non-empty
    /// - filter ids are unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for filter in &self.filters {
            if filter.id.trim().is_empty() {
                return Err(OverlayError::Config(
                    "config validation failed: filter id must not be empty".to_string(),
                ));
            }
            if !seen.insert(filter.id.as_str()) {
                return Err(OverlayError::Config(format!(
                    "config validation failed: filter '{}' is declared more than once",
                    filter.id
                )));
            }
        }
        Ok(())
    }

    /// Enabled filters in chain order: ascending weight, then id.
    pub fn enabled_filters(&self) -> Vec<&FilterDeclaration> {
        let mut enabled: Vec<&FilterDeclaration> =
            self.filters.iter().filter(|f| f.status).collect();
        enabled.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.id.cmp(&b.id)));
        enabled
    }
}

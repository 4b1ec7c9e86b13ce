//! Filter instantiation from declarative configuration.
//!
//! The registry maps filter ids to factories. An [`OverlayConfig`] names
//! filters by id; [`FilterRegistry::build_chain`] turns the enabled
//! declarations into filter instances in chain order.

use crate::config::{FilterDeclaration, OverlayConfig};
use crate::error::{OverlayError, Result};
use crate::filter::{ConfigFilter, FilteredStorage};
use crate::ignore::{IGNORE_FILTER_ID, IgnoreFilter, IgnoreSettings};
use crate::storage::Storage;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Collaborators available to filter factories.
#[derive(Clone)]
pub struct FilterContext {
    /// The live configuration store.
    pub active: Arc<dyn Storage>,
}

impl FilterContext {
    pub fn new(active: Arc<dyn Storage>) -> Self {
        Self { active }
    }
}

/// Builds a filter instance from its declaration.
pub type FilterFactory = fn(&FilterDeclaration, &FilterContext) -> Result<Box<dyn ConfigFilter>>;

/// Known filter factories, keyed by id.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    factories: BTreeMap<String, FilterFactory>,
}

impl FilterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in filters registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(IGNORE_FILTER_ID, ignore_factory);
        registry
    }

    /// Register (or replace) the factory for `id`.
    pub fn register(&mut self, id: impl Into<String>, factory: FilterFactory) {
        self.factories.insert(id.into(), factory);
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Instantiate the enabled filters of `config` in chain order.
    pub fn build_chain(
        &self,
        config: &OverlayConfig,
        context: &FilterContext,
    ) -> Result<Vec<Box<dyn ConfigFilter>>> {
        config
            .enabled_filters()
            .into_iter()
            .map(|declaration| {
                let factory = self
                    .factories
                    .get(&declaration.id)
                    .ok_or_else(|| OverlayError::UnknownFilter(declaration.id.clone()))?;
                debug!(
                    filter = %declaration.id,
                    weight = declaration.weight,
                    "instantiating filter"
                );
                factory(declaration, context)
            })
            .collect()
    }

    /// Wrap `storage` with the filters of `config`.
    pub fn build_storage(
        &self,
        storage: Arc<dyn Storage>,
        config: &OverlayConfig,
        context: &FilterContext,
    ) -> Result<Arc<FilteredStorage>> {
        let filters = self.build_chain(config, context)?;
        Ok(FilteredStorage::new(storage, filters))
    }
}

fn ignore_factory(
    declaration: &FilterDeclaration,
    context: &FilterContext,
) -> Result<Box<dyn ConfigFilter>> {
    let settings = IgnoreSettings::from_mapping(&declaration.settings)?;
    Ok(Box::new(IgnoreFilter::new(
        &settings,
        Arc::clone(&context.active),
    )?))
}

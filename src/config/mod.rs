//! Declarative overlay configuration.
//!
//! This module defines the [`OverlayConfig`] struct that represents an
//! overlay YAML file: the ordered list of filters to stack over a storage.
//! Parsing is forward-compatible (unknown fields are ignored) and every
//! field has a default.

mod model;
mod operations;
pub mod types;


pub use model::{FilterDeclaration, OverlayConfig};

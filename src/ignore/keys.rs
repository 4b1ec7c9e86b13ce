//! Nested key access within configuration documents.
//!
//! Key paths are dot-separated: `page.front` addresses `front` inside the
//! mapping stored under `page`.

use crate::storage::ConfigDocument;
use serde_yaml::{Mapping, Value};

pub(crate) fn get_path<'a>(doc: &'a ConfigDocument, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_mapping()?.get(part)?;
    }
    Some(current)
}

/// Set `path` to `value`, creating or replacing intermediate mappings.
pub(crate) fn set_path(doc: &mut ConfigDocument, path: &str, value: Value) {
    let mut parts: Vec<&str> = path.split('.').collect();
    let Some(last) = parts.pop() else {
        return;
    };
    let Some((first, middle)) = parts.split_first() else {
        doc.insert(last.to_string(), value);
        return;
    };

    let mut current = doc
        .entry(first.to_string())
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    for part in middle {
        current = ensure_mapping(current)
            .entry(Value::String(part.to_string()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }
    ensure_mapping(current).insert(Value::String(last.to_string()), value);
}

/// Remove `path` if present. Missing intermediate keys are not an error.
pub(crate) fn remove_path(doc: &mut ConfigDocument, path: &str) {
    let mut parts: Vec<&str> = path.split('.').collect();
    let Some(last) = parts.pop() else {
        return;
    };
    let Some((first, middle)) = parts.split_first() else {
        doc.remove(last);
        return;
    };

    let Some(mut current) = doc.get_mut(*first) else {
        return;
    };
    for part in middle {
        let Some(next) = current.as_mapping_mut().and_then(|m| m.get_mut(*part)) else {
            return;
        };
        current = next;
    }
    if let Some(mapping) = current.as_mapping_mut() {
        mapping.remove(last);
    }
}

fn ensure_mapping(value: &mut Value) -> &mut Mapping {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(mapping) => mapping,
        _ => unreachable!("value was just replaced with a mapping"),
    }
}

//! The `read` command.

use super::open_overlay;
use crate::cli::{OutputFormat, ReadArgs};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, Result};
use crate::storage::{ConfigDocument, Storage};
use std::collections::BTreeMap;

pub(crate) fn cmd_read(overlay: &OverlayConfig, args: ReadArgs) -> Result<()> {
    let storage = open_overlay(
        overlay,
        &args.storage.storage,
        args.storage.active.as_deref(),
        &args.storage.collection,
    )?;

    let documents = storage.read_multiple(&args.names)?;
    print!("{}", render(&*storage, &documents, args.format)?);

    let missing: Vec<&str> = args
        .names
        .iter()
        .filter(|name| !documents.contains_key(name.as_str()))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(OverlayError::UserError(format!(
            "configuration not found: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Render documents in the requested format.
///
/// YAML output separates documents with `--- # <name>` markers; JSON output
/// is a single object keyed by name.
pub(crate) fn render(
    storage: &dyn Storage,
    documents: &BTreeMap<String, ConfigDocument>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            let mut output = String::new();
            for (name, data) in documents {
                output.push_str(&format!("--- # {}\n", name));
                output.push_str(&storage.encode(data)?);
            }
            Ok(output)
        }
        OutputFormat::Json => {
            let mut output = serde_json::to_string_pretty(documents).map_err(|e| {
                OverlayError::Serialization(format!("failed to render JSON: {}", e))
            })?;
            output.push('\n');
            Ok(output)
        }
    }
}

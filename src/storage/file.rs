//! Directory-backed storage: one YAML file per configuration name.
//!
//! Layout:
//! - default collection: `<dir>/<name>.yml`
//! - collection `a.b`: `<dir>/a/b/<name>.yml`

use super::{ConfigDocument, DEFAULT_COLLECTION, Storage, sorted_unique, validate_name};
use crate::error::{OverlayError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

const EXTENSION: &str = "yml";

/// Storage that keeps each document in its own YAML file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
    collection: String,
}

impl FileStorage {
    /// Create a storage rooted at `directory`, scoped to the default collection.
    ///
    /// The directory is created lazily on first write.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Root directory of the store (shared by all collections).
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Directory holding this collection's files.
    pub fn collection_path(&self) -> PathBuf {
        if self.collection.is_empty() {
            self.directory.clone()
        } else {
            self.collection
                .split('.')
                .fold(self.directory.clone(), |path, part| path.join(part))
        }
    }

    /// Path of the file backing `name`.
    ///
    /// Fails with [`OverlayError::InvalidName`] for names that cannot be
    /// mapped onto a file inside the store.
    pub fn file_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.collection_path().join(format!("{}.{}", name, EXTENSION)))
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(OverlayError::Io(format!(
                "failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Names of `.yml` files directly inside `dir`, ignoring dot-files.
    fn names_in(dir: &Path) -> Result<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(OverlayError::Io(format!(
                    "failed to read directory '{}': {}",
                    dir.display(),
                    e
                )));
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                OverlayError::Io(format!("failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && !stem.starts_with('.')
                && validate_name(stem).is_ok()
            {
                names.push(stem.to_string());
            }
        }
        Ok(names)
    }

    /// Walk subdirectories of `dir`, collecting dotted collection names of
    /// every directory that holds at least one document.
    fn collect_collections(dir: &Path, prefix: &str, found: &mut Vec<String>) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(OverlayError::Io(format!(
                    "failed to read directory '{}': {}",
                    dir.display(),
                    e
                )));
            }
        };

        for entry in entries {
            let entry = entry.map_err(|e| {
                OverlayError::Io(format!("failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(part) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if part.starts_with('.') || validate_collection_segment(part).is_err() {
                continue;
            }
            let collection = if prefix.is_empty() {
                part.to_string()
            } else {
                format!("{}.{}", prefix, part)
            };
            if !Self::names_in(&path)?.is_empty() {
                found.push(collection.clone());
            }
            Self::collect_collections(&path, &collection, found)?;
        }
        Ok(())
    }
}

/// A collection segment becomes one directory level, so it must be a plain
/// non-empty file name.
fn validate_collection_segment(segment: &str) -> Result<()> {
    validate_name(segment)
}

impl Storage for FileStorage {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.file_path(name)?.is_file())
    }

    fn read(&self, name: &str) -> Result<Option<ConfigDocument>> {
        let path = self.file_path(name)?;
        match self.read_file(&path)? {
            Some(content) => match self.decode(&content) {
                Ok(doc) => Ok(Some(doc)),
                Err(OverlayError::Serialization(msg)) => Err(OverlayError::Serialization(
                    format!("{} ('{}')", msg, path.display()),
                )),
                Err(e) => Err(e),
            },
            None => Ok(None),
        }
    }

    fn write(&self, name: &str, data: &ConfigDocument) -> Result<bool> {
        let path = self.file_path(name)?;
        let content = self.encode(data)?;
        trace!(path = %path.display(), "writing configuration file");
        crate::fs::atomic_write(&path, content.as_bytes())?;
        Ok(true)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let path = self.file_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(OverlayError::Io(format!(
                "failed to delete '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<bool> {
        let from = self.file_path(old_name)?;
        let to = self.file_path(new_name)?;
        if !from.is_file() {
            return Ok(false);
        }
        fs::rename(&from, &to).map_err(|e| {
            OverlayError::Io(format!(
                "failed to rename '{}' to '{}': {}",
                from.display(),
                to.display(),
                e
            ))
        })?;
        Ok(true)
    }

    fn list_all(&self, prefix: &str) -> Result<Vec<String>> {
        let names = Self::names_in(&self.collection_path())?;
        Ok(sorted_unique(
            names.into_iter().filter(|name| name.starts_with(prefix)),
        ))
    }

    fn delete_all(&self, prefix: &str) -> Result<bool> {
        let mut success = true;
        for name in self.list_all(prefix)? {
            success &= self.delete(&name)?;
        }
        Ok(success)
    }

    fn create_collection(&self, collection: &str) -> Result<Arc<dyn Storage>> {
        if !collection.is_empty() {
            for segment in collection.split('.') {
                validate_collection_segment(segment)
                    .map_err(|_| OverlayError::InvalidName(collection.to_string()))?;
            }
        }
        Ok(Arc::new(Self {
            directory: self.directory.clone(),
            collection: collection.to_string(),
        }))
    }

    fn get_all_collection_names(&self) -> Result<Vec<String>> {
        let mut found = Vec::new();
        Self::collect_collections(&self.directory, "", &mut found)?;
        Ok(sorted_unique(found))
    }

    fn get_collection_name(&self) -> String {
        self.collection.clone()
    }
}

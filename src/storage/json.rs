//! JSON file-backed key/value store.
//!
//! This module provides a durable [`KeyValueStore`] that keeps every item in a
//! single human-readable JSON file. Writes go through immediately and use atomic
//! file replacement (write-to-temp + rename) so a crash never leaves a half-written
//! file behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(log n) - the whole file is loaded into memory once
//! - **Write**: O(n) - serializes and writes the entire map
//! - **Best for**: small preference maps written on user interaction

use crate::domain::error::{Result, TableError};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the file format for future migrations.
    version: u32,

    #[serde(default)]
    items: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            items: BTreeMap::new(),
        }
    }
}

/// JSON file key/value store.
///
/// # Thread Safety
///
/// This type is not `Sync`. It is meant to be owned by the UI thread and shared
/// between tables through `Rc`.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "items": {
///     "users.columns": "{\"email\":false}"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
    data: RefCell<StoreData>,
}

impl JsonFileStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store; the file is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but cannot be read
    /// - The file exists but is not a valid store document
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tablestate::storage::{JsonFileStore, KeyValueStore};
    ///
    /// let store = JsonFileStore::new("/tmp/tablestate/preferences.json")?;
    /// store.set_item("users.columns", "{}")?;
    /// # Ok::<(), tablestate::TableError>(())
    /// ```
    pub fn new(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON key/value store");

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(item_count = data.items.len(), "store opened");

        Ok(Self {
            file_path,
            data: RefCell::new(data),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| TableError::Storage(format!("failed to parse store file: {e}")))?;

        tracing::debug!(version = data.version, items = data.items.len(), "loaded store data");
        Ok(data)
    }

    /// Atomically replaces the file with `data`.
    fn persist(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| TableError::Storage(format!("failed to serialize store: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, items = data.items.len(), "store written");
        Ok(())
    }

    /// Applies `change` to a copy of the items, writes the copy, and only then
    /// makes it the in-memory state. A failed write leaves memory untouched.
    fn commit(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<()> {
        let mut next = self.data.borrow().clone();
        if !change(&mut next.items) {
            return Ok(());
        }
        self.persist(&next)?;
        *self.data.borrow_mut() = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set_item", key = %key).entered();

        self.commit(|items| {
            items.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_remove_item", key = %key).entered();

        self.commit(|items| items.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        {
            let store = JsonFileStore::new(&path).unwrap();
            store.set_item("users.columns", r#"{"email":false}"#).unwrap();
            store.set_item("logs.columns", "{}").unwrap();
            store.remove_item("logs.columns").unwrap();
        }

        let reopened = JsonFileStore::new(&path).unwrap();
        assert_eq!(
            reopened.get_item("users.columns").unwrap().as_deref(),
            Some(r#"{"email":false}"#)
        );
        assert_eq!(reopened.get_item("logs.columns").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(JsonFileStore::new(&path), Err(TableError::Storage(_))));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = JsonFileStore::new(&path).unwrap();
        store.set_item("k", "v").unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn failed_write_leaves_memory_and_disk_in_agreement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = JsonFileStore::new(&path).unwrap();
        store.set_item("logs.columns", "{}").unwrap();

        // A directory in the temp file's place makes every write fail.
        std::fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(store.set_item("users.columns", r#"{"email":false}"#).is_err());
        assert!(store.remove_item("logs.columns").is_err());

        assert_eq!(store.get_item("users.columns").unwrap(), None);
        assert_eq!(store.get_item("logs.columns").unwrap().as_deref(), Some("{}"));
        drop(store);

        let reopened = JsonFileStore::new(&path).unwrap();
        assert_eq!(reopened.get_item("users.columns").unwrap(), None);
        assert_eq!(reopened.get_item("logs.columns").unwrap().as_deref(), Some("{}"));
    }
}

//! Key/value store abstraction.
//!
//! This module defines the [`KeyValueStore`] trait used to persist table
//! preferences. The shape mirrors a browser's local storage: string keys, string
//! values, synchronous access. Methods take `&self` so one store can be shared by
//! every table on a page; implementations use interior mutability.

use crate::domain::error::Result;

/// Synchronous string key/value storage.
///
/// # Implementations
///
/// - [`MemoryStore`](super::MemoryStore): in-process map, for tests and hosts
///   without durable storage
/// - [`JsonFileStore`](super::JsonFileStore): JSON file with atomic writes
///
/// # Examples
///
/// ```
/// use tablestate::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set_item("users.columns", r#"{"email":false}"#)?;
/// assert_eq!(store.get_item("users.columns")?.as_deref(), Some(r#"{"email":false}"#));
/// assert_eq!(store.get_item("logs.columns")?, None);
/// # Ok::<(), tablestate::TableError>(())
/// ```
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `Ok(None)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or cannot complete the write.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot complete the write.
    fn remove_item(&self, key: &str) -> Result<()>;
}

//! In-memory backend.

use super::{KeyValueStore, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local key/value store.
///
/// Batch operations run under a single write lock, so they are trivially
/// all-or-nothing.
///
/// # Example
///
/// ```
/// use almacen_runtime::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("token", "abc").unwrap();
/// assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut map = self.entries.write();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.entries.write();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

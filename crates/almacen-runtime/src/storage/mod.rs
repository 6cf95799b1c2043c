//! Durable key/value storage port.
//!
//! The session lives in a small string-to-string store scoped to one
//! origin, the same shape as a browser's local storage. Backends:
//!
//! ```text
//! KeyValueStore trait
//!        │
//!        ├── MemoryStore     ← process-local, tests and the `memory` backend
//!        └── LocalFileStore  ← one JSON file per origin, atomic rename
//! ```
//!
//! # Batch Writes
//!
//! [`KeyValueStore::set_entries`] and [`KeyValueStore::remove_entries`]
//! are all-or-nothing from the caller's perspective. The default
//! implementations snapshot the affected keys and restore them if a
//! single-key operation fails partway; backends that can commit a batch
//! natively override them.

mod error;
mod local;
mod memory;

pub use error::StorageError;
pub use local::{default_storage_dir, LocalFileStore};
pub use memory::MemoryStore;

use crate::config::{StorageBackend, StorageConfig};
use std::sync::Arc;
use tracing::warn;

/// Origin-scoped string key/value store.
///
/// Implementations must be `Send + Sync`; all operations are synchronous.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` if unset.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Sets `key` to `value`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Writes every entry or none of them.
    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let keys: Vec<&str> = entries.iter().map(|(key, _)| *key).collect();
        let snapshot = snapshot(self, &keys)?;
        for (done, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.set(key, value) {
                restore(self, &snapshot[..=done]);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Removes every key or none of them.
    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        let snapshot = snapshot(self, keys)?;
        for (done, key) in keys.iter().enumerate() {
            if let Err(e) = self.remove(key) {
                restore(self, &snapshot[..=done]);
                return Err(e);
            }
        }
        Ok(())
    }
}

type Snapshot<'k> = Vec<(&'k str, Option<String>)>;

fn snapshot<'k, S: KeyValueStore + ?Sized>(
    store: &S,
    keys: &[&'k str],
) -> Result<Snapshot<'k>, StorageError> {
    keys.iter()
        .map(|key| Ok((*key, store.get(key)?)))
        .collect()
}

fn restore<S: KeyValueStore + ?Sized>(store: &S, snapshot: &[(&str, Option<String>)]) {
    for (key, previous) in snapshot {
        let result = match previous {
            Some(value) => store.set(key, value),
            None => store.remove(key),
        };
        if let Err(e) = result {
            warn!(key = %key, error = %e, "Failed to roll back storage key");
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        (**self).set_entries(entries)
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_entries(keys)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        (**self).set_entries(entries)
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_entries(keys)
    }
}

/// Opens the backend selected by `config`.
///
/// # Errors
///
/// Returns [`StorageError::DirectoryCreation`] if the file backend's
/// directory cannot be created.
pub fn open(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StorageBackend::File => Ok(Box::new(LocalFileStore::new(
            config.resolved_path(),
            &config.origin,
        )?)),
    }
}

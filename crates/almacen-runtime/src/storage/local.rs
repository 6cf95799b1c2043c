//! Local file backend.
//!
//! Each origin gets one JSON object file in the storage directory:
//!
//! ```text
//! ~/.almacen/storage/
//! ├── default.json
//! ├── admin.example.com.json
//! └── ...
//! ```

use super::{KeyValueStore, StorageError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

type Entries = BTreeMap<String, String>;

/// File-backed key/value store for one origin.
///
/// # Features
///
/// - Pretty-printed JSON object, one file per origin
/// - Atomic writes (write to a uniquely named temp file, then rename), so a
///   batch lands whole even with several writers on one origin
/// - Automatic directory creation and `~` expansion
/// - An unreadable file reads as empty and is replaced on the next write
///
/// # Example
///
/// ```no_run
/// use almacen_runtime::storage::{KeyValueStore, LocalFileStore};
/// use std::path::PathBuf;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalFileStore::new(PathBuf::from("~/.almacen/storage"), "default")?;
/// store.set_entries(&[("token", "abc"), ("user", "{}")])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LocalFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalFileStore {
    /// Opens (creating the directory if needed) the store for `origin`
    /// under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryCreation` if the directory cannot be
    /// created.
    pub fn new(dir: PathBuf, origin: &str) -> Result<Self, StorageError> {
        let dir = expand_tilde(&dir);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| StorageError::directory_creation(&dir, e))?;
        }
        Ok(Self {
            path: dir.join(format!("{}.json", file_stem(origin))),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let json = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&json) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Unreadable storage file, treating as empty"
                );
                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_entries()?;
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl KeyValueStore for LocalFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_entries(&[(key, value)])
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_entries(&[key])
    }

    fn set_entries(&self, batch: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|entries| {
            for (key, value) in batch {
                entries.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}

/// Maps an origin to a safe file stem.
fn file_stem(origin: &str) -> String {
    let stem: String = origin
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "default".to_string()
    } else {
        stem
    }
}

/// Expands `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Returns the default storage directory (`~/.almacen/storage`).
#[must_use]
pub fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".almacen")
        .join("storage")
}

//! Configuration types.

use crate::storage::default_storage_dir;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration.
///
/// Built from [`AlmacenConfig::default`] with each [`ConfigLayer`] merged
/// on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlmacenConfig {
    /// Enables debug logging.
    pub debug: bool,

    /// Session storage settings.
    pub storage: StorageConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AlmacenConfig {
    /// Merges `layer` into `self`.
    ///
    /// Every value the layer sets overrides `self`, including values equal
    /// to the default. Unset values leave `self` untouched.
    pub fn merge(&mut self, layer: &ConfigLayer) {
        if let Some(debug) = layer.debug {
            self.debug = debug;
        }
        self.storage.merge(&layer.storage);
        self.logging.merge(&layer.logging);
    }
}

/// One config file's contents. Keys absent from the file stay `None`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigLayer {
    pub debug: Option<bool>,
    pub storage: StorageLayer,
    pub logging: LoggingLayer,
}

impl ConfigLayer {
    /// Deserializes from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// `[storage]` table of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageLayer {
    pub backend: Option<StorageBackend>,
    pub path: Option<PathBuf>,
    pub origin: Option<String>,
}

/// `[logging]` table of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingLayer {
    pub level: Option<String>,
}

/// Which [`KeyValueStore`](crate::storage::KeyValueStore) backs the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per origin under the storage directory.
    #[default]
    File,
    /// Process-local; the session is lost on exit.
    Memory,
}

impl StorageBackend {
    /// Parses `"file"` or `"memory"` (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Session storage configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Storage backend.
    pub backend: StorageBackend,

    /// Storage directory (`~/.almacen/storage` if unset).
    pub path: Option<PathBuf>,

    /// Origin the session belongs to. Each origin has its own session.
    pub origin: String,
}

/// Origin used when none is configured.
pub const DEFAULT_ORIGIN: &str = "default";

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            origin: DEFAULT_ORIGIN.into(),
        }
    }
}

impl StorageConfig {
    /// Returns the storage directory, falling back to the default.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_storage_dir)
    }

    fn merge(&mut self, layer: &StorageLayer) {
        if let Some(backend) = layer.backend {
            self.backend = backend;
        }
        if layer.path.is_some() {
            self.path.clone_from(&layer.path);
        }
        if let Some(ref origin) = layer.origin {
            self.origin.clone_from(origin);
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    /// (`error`, `warn`, `info`, `debug` or `trace`).
    pub level: String,
}

/// Log level used when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, layer: &LoggingLayer) {
        if let Some(ref level) = layer.level {
            self.level.clone_from(level);
        }
    }
}

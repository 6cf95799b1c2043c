//! Storage error types.

use almacen_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](super::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error while reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key/value map could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage directory creation failed.
    #[error("failed to create storage directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Creates a DirectoryCreation error.
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Creates an Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

impl ErrorCode for StorageError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STORAGE_IO",
            Self::Serialization(_) => "STORAGE_SERIALIZATION",
            Self::DirectoryCreation { .. } => "STORAGE_DIRECTORY_CREATION",
            Self::Unavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable(_))
    }
}

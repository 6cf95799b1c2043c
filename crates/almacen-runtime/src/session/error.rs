//! Session error types.

use crate::storage::StorageError;
use almacen_types::ErrorCode;
use thiserror::Error;

/// Errors raised while writing a session.
///
/// Reads never fail: an unreadable token or user is reported as absent.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Refused to store an empty token.
    #[error("refusing to store an empty token")]
    EmptyToken,

    /// The user record could not be encoded.
    #[error("failed to encode user record: {0}")]
    Encode(#[source] serde_json::Error),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ErrorCode for SessionError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyToken => "SESSION_EMPTY_TOKEN",
            Self::Encode(_) => "SESSION_ENCODE",
            Self::Storage(_) => "SESSION_STORAGE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_recoverable(),
            Self::EmptyToken | Self::Encode(_) => false,
        }
    }
}

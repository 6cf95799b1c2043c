//! Login flow errors.

use crate::session::SessionError;
use almacen_types::ErrorCode;
use thiserror::Error;

/// Errors raised by the login/logout flow or an [`AuthService`](super::AuthService).
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server answered `success: false`.
    #[error("login rejected: {message}")]
    Rejected { message: String },

    /// The server reported success without a token or user.
    #[error("login response is missing the token or user")]
    IncompleteResponse,

    /// The server issued a token that is already expired.
    #[error("received an expired token")]
    TokenExpired,

    /// The request did not complete.
    #[error("transport error: {0}")]
    Transport(String),

    /// The session could not be written.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Creates a Rejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates a Transport error.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport(reason.into())
    }
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "AUTH_REJECTED",
            Self::IncompleteResponse => "AUTH_INCOMPLETE_RESPONSE",
            Self::TokenExpired => "AUTH_TOKEN_EXPIRED",
            Self::Transport(_) => "AUTH_TRANSPORT",
            Self::Session(_) => "AUTH_SESSION",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Rejected { .. } | Self::Transport(_) => true,
            Self::Session(e) => e.is_recoverable(),
            Self::IncompleteResponse | Self::TokenExpired => false,
        }
    }
}

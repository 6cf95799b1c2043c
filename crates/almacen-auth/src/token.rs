//! Bearer token expiry.
//!
//! Tokens are consumed, never produced or signature-checked here. The
//! only thing read from them is the `exp` claim:
//!
//! ```text
//! <header> . <base64url JSON payload with "exp"> . <signature>
//! ```
//!
//! Any failure to read `exp` means the token is treated as expired.

use almacen_types::ErrorCode;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// base64url, padding optional.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a token's payload could not be read.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Not three dot-separated segments.
    #[error("malformed token: expected 3 segments, found {segments}")]
    Malformed { segments: usize },

    /// The payload segment is not valid base64url.
    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The payload is not JSON, or `exp` is missing or not an integer.
    #[error("token payload is invalid: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ErrorCode for TokenError {
    fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "TOKEN_MALFORMED",
            Self::Encoding(_) => "TOKEN_ENCODING",
            Self::Payload(_) => "TOKEN_PAYLOAD",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Claims read from the payload segment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Every other claim, untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl TokenClaims {
    /// Returns `true` if the claims are expired at `now_ms`
    /// (milliseconds since the epoch). Equality counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.exp.saturating_mul(1000)
    }

    /// Returns the expiry instant, if representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Decodes the payload segment of `token`.
///
/// # Errors
///
/// Returns [`TokenError`] describing the first problem found.
///
/// # Example
///
/// ```
/// use almacen_auth::token::{decode_claims, TokenError};
///
/// // {"exp":1700000000}
/// let claims = decode_claims("h.eyJleHAiOjE3MDAwMDAwMDB9.s").unwrap();
/// assert_eq!(claims.exp, 1_700_000_000);
///
/// assert!(matches!(decode_claims("only.two"), Err(TokenError::Malformed { segments: 2 })));
/// ```
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed {
            segments: segments.len(),
        });
    }
    let payload = PAYLOAD_ENGINE.decode(segments[1])?;
    Ok(serde_json::from_slice(&payload)?)
}

/// Returns `true` if `token` is expired at `now_ms`, or unreadable.
#[must_use]
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.is_expired_at(now_ms),
        Err(e) => {
            debug!(code = e.code(), error = %e, "Unreadable token treated as expired");
            true
        }
    }
}

/// Returns `true` if `token` is expired at `now`, or unreadable.
#[must_use]
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    is_expired_at(token, now.timestamp_millis())
}

/// Returns `true` if `token` is expired right now, or unreadable.
#[must_use]
pub fn is_expired_now(token: &str) -> bool {
    is_expired(token, Utc::now())
}

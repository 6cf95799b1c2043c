//! Machine-readable error codes shared by every Almacén crate.
//!
//! Each error enum in the workspace implements [`ErrorCode`] so the CLI
//! (and any future front-end) can branch on a stable code instead of
//! matching display strings.
//!
//! # Example
//!
//! ```
//! use almacen_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Missing,
//!     Offline,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing => "LOOKUP_MISSING",
//!             Self::Offline => "LOOKUP_OFFLINE",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Offline)
//!     }
//! }
//!
//! assert_eq!(LookupError::Offline.code(), "LOOKUP_OFFLINE");
//! assert!(!LookupError::Missing.is_recoverable());
//! ```

/// Stable error code interface.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**, prefixed with the owning domain
///   (`STORAGE_`, `SESSION_`, `AUTH_`, `ACCESS_`, `TOKEN_`, `CONFIG_`)
/// - Codes are part of the public contract and do not change once shipped
pub trait ErrorCode {
    /// Returns the machine-readable code.
    fn code(&self) -> &'static str;

    /// Returns `true` if retrying or a user action can fix the condition.
    ///
    /// An expired session is recoverable (log in again); a role that lacks
    /// a capability is not.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, carries `expected_prefix`
/// and is UPPER_SNAKE_CASE.
///
/// Intended for unit tests that walk every variant of an error enum.
///
/// # Panics
///
/// Panics with a descriptive message when any check fails.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();
    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Runs [`assert_error_code`] over a list of variants.
///
/// # Panics
///
/// Panics on the first variant that fails validation.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

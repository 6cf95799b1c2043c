//! Access denied reasons.
//!
//! The boolean predicates on [`AccessPolicy`](crate::AccessPolicy) are
//! what UI code normally calls. [`AccessDenied`] is for callers that need
//! to tell the user *why*:
//!
//! ```text
//! no user stored ─────────────► NoSession
//! user.rol not a known Role ──► UnknownRole
//! role not in permitted set ──► CapabilityDenied
//! ```

use crate::Capability;
use almacen_types::{ErrorCode, Role};
use thiserror::Error;

/// Why a capability check failed.
///
/// # Example
///
/// ```
/// use almacen_auth::{AccessDenied, Capability};
/// use almacen_types::{ErrorCode, Role};
///
/// let err = AccessDenied::CapabilityDenied {
///     capability: Capability::ManageUsers,
///     role: Role::Vendedor,
/// };
/// assert!(err.to_string().contains("manage_users"));
/// assert_eq!(err.code(), "ACCESS_CAPABILITY_DENIED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// No user is stored.
    #[error("access denied: no active session")]
    NoSession,

    /// The stored user's role is not one of the known roles.
    #[error("access denied: unknown role '{0}'")]
    UnknownRole(String),

    /// The role is known but not permitted.
    #[error("access denied: '{capability}' is not available to role {role}")]
    CapabilityDenied {
        /// The capability that was checked.
        capability: Capability,
        /// The role of the current user.
        role: Role,
    },
}

impl ErrorCode for AccessDenied {
    fn code(&self) -> &'static str {
        match self {
            Self::NoSession => "ACCESS_NO_SESSION",
            Self::UnknownRole(_) => "ACCESS_UNKNOWN_ROLE",
            Self::CapabilityDenied { .. } => "ACCESS_CAPABILITY_DENIED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Logging in fixes a missing session; nothing fixes the others.
        matches!(self, Self::NoSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almacen_types::assert_error_codes;

    #[test]
    fn display_messages() {
        assert!(AccessDenied::NoSession
            .to_string()
            .contains("no active session"));
        assert!(AccessDenied::UnknownRole("Jefe".into())
            .to_string()
            .contains("'Jefe'"));
        let denied = AccessDenied::CapabilityDenied {
            capability: Capability::CancelInvoices,
            role: Role::Cajero,
        };
        let msg = denied.to_string();
        assert!(msg.contains("cancel_invoices"), "got: {msg}");
        assert!(msg.contains("Cajero"), "got: {msg}");
    }

    #[test]
    fn codes_follow_convention() {
        assert_error_codes(
            &[
                AccessDenied::NoSession,
                AccessDenied::UnknownRole("x".into()),
                AccessDenied::CapabilityDenied {
                    capability: Capability::ManageRoles,
                    role: Role::Gerente,
                },
            ],
            "ACCESS_",
        );
    }

    #[test]
    fn only_missing_session_is_recoverable() {
        assert!(AccessDenied::NoSession.is_recoverable());
        assert!(!AccessDenied::UnknownRole("x".into()).is_recoverable());
    }
}

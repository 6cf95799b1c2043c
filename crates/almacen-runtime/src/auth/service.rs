//! The authentication service contract.

use super::AuthError;
use almacen_types::User;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Login form input.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Username.
    pub usuario: String,
    /// Password, sent once and never stored.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(usuario: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            usuario: usuario.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("usuario", &self.usuario)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of the login endpoint's response.
///
/// ```
/// use almacen_runtime::auth::LoginResponse;
///
/// let response: LoginResponse =
///     serde_json::from_str(r#"{"success": false, "message": "Usuario inactivo"}"#).unwrap();
/// assert!(!response.success);
/// assert!(response.token.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    /// Whether the credentials were accepted.
    pub success: bool,
    /// Bearer token, present on success.
    pub token: Option<String>,
    /// User profile, present on success.
    pub user: Option<User>,
    /// Human-readable message, usually present on failure.
    pub message: Option<String>,
}

impl LoginResponse {
    /// A successful response carrying `token` and `user`.
    #[must_use]
    pub fn success(token: impl Into<String>, user: User) -> Self {
        Self {
            success: true,
            token: Some(token.into()),
            user: Some(user),
            message: None,
        }
    }

    /// A failed response carrying `message`.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Remote authentication endpoint.
///
/// Implementations perform the network call; the flow functions in this
/// module decide what to persist.
pub trait AuthService: Send + Sync {
    /// Submits credentials.
    ///
    /// A rejected login is a normal `Ok` response with `success: false`;
    /// `Err` is reserved for requests that did not complete.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, AuthError>> + Send;

    /// Notifies the server that the session ended.
    fn logout(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
}

//! The session store.

use super::SessionError;
use crate::storage::KeyValueStore;
use almacen_auth::{token, AccessPolicy, IdentitySource};
use almacen_types::User;
use chrono::Utc;
use tracing::{debug, warn};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-encoded [`User`].
pub const USER_KEY: &str = "user";

/// A complete session: token plus user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// What the `user` key holds.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredUser {
    /// A readable user record.
    Present(User),
    /// Nothing stored.
    Absent,
    /// Something stored that does not decode as a user.
    Corrupt {
        /// Decoder or storage error message.
        reason: String,
    },
}

impl StoredUser {
    /// Returns the user, collapsing `Absent` and `Corrupt` to `None`.
    #[must_use]
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Present(user) => Some(user),
            Self::Absent | Self::Corrupt { .. } => None,
        }
    }

    /// Returns `true` for a record that exists but cannot be read.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Durable session over a [`KeyValueStore`].
///
/// Construct one per process and pass it by reference. The token and user
/// are only ever written together and removed together.
///
/// # Example
///
/// ```
/// use almacen_runtime::session::SessionStore;
/// use almacen_runtime::storage::MemoryStore;
/// use almacen_types::{Role, User};
///
/// let session = SessionStore::new(MemoryStore::new());
/// assert!(!session.is_authenticated());
///
/// session.set_session("h.p.s", &User::new(2, "", Role::Cajero)).unwrap();
/// assert!(session.is_authenticated());
/// assert!(session.policy().can_access_pos());
///
/// session.clear().unwrap();
/// assert!(session.user().is_none());
/// ```
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Wraps `storage`.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persists `token` and `user` together, replacing any prior session.
    ///
    /// # Errors
    ///
    /// - [`SessionError::EmptyToken`] if `token` is empty
    /// - [`SessionError::Encode`] if `user` cannot be serialized
    /// - [`SessionError::Storage`] if the write fails (nothing is written)
    pub fn set_session(&self, token: &str, user: &User) -> Result<(), SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let encoded = user.to_json().map_err(SessionError::Encode)?;
        self.storage
            .set_entries(&[(TOKEN_KEY, token), (USER_KEY, &encoded)])?;
        debug!(user_id = %user.id, rol = %user.rol, "Session stored");
        Ok(())
    }

    /// Returns the stored token, if any.
    ///
    /// An empty value and a failed read are both reported as `None`.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(key = TOKEN_KEY, error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Reads the user record, distinguishing absent from unreadable.
    #[must_use]
    pub fn stored_user(&self) -> StoredUser {
        let raw = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredUser::Absent,
            Err(e) => {
                warn!(key = USER_KEY, error = %e, "Failed to read session user");
                return StoredUser::Corrupt {
                    reason: e.to_string(),
                };
            }
        };
        match User::from_json(&raw) {
            Ok(user) => StoredUser::Present(user),
            Err(e) => {
                warn!(key = USER_KEY, error = %e, "Stored user record is unreadable");
                StoredUser::Corrupt {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Returns the stored user, or `None` if absent or unreadable.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.stored_user().into_user()
    }

    /// Returns the full session when both halves are present.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            token: self.token()?,
            user: self.user()?,
        })
    }

    /// Returns `true` if both a token and a readable user are stored.
    ///
    /// Token expiry is not consulted; see [`is_active`](Self::is_active).
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Returns `true` if authenticated and the token is not expired at
    /// `now_ms`.
    #[must_use]
    pub fn is_active_at(&self, now_ms: i64) -> bool {
        self.session()
            .is_some_and(|s| !token::is_expired_at(&s.token, now_ms))
    }

    /// [`is_active_at`](Self::is_active_at) against the system clock.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now().timestamp_millis())
    }

    /// Removes the token and user. Clearing an empty session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the removal fails (both keys are
    /// left as they were).
    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.remove_entries(&[TOKEN_KEY, USER_KEY])?;
        debug!("Session cleared");
        Ok(())
    }

    /// Returns an access policy reading from this session.
    #[must_use]
    pub fn policy(&self) -> AccessPolicy<'_, Self> {
        AccessPolicy::new(self)
    }
}

impl<S: KeyValueStore> IdentitySource for SessionStore<S> {
    fn current_user(&self) -> Option<User> {
        self.user()
    }
}

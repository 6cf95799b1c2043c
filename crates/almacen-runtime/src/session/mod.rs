//! Durable authenticated session.
//!
//! The session is two keys in an origin-scoped [`KeyValueStore`]:
//!
//! ```text
//! "token" → opaque bearer token (JWT-shaped)
//! "user"  → JSON-encoded User { id, nombre, rol, .. }
//! ```
//!
//! [`SessionStore`] owns both keys. It writes them together, removes them
//! together, and is the [`IdentitySource`] that access checks read from.
//!
//! # Failure Semantics
//!
//! Writes report errors. Reads never do: a missing, empty or unreadable
//! value is "not logged in", and unreadable values are logged at `warn`.
//! [`SessionStore::stored_user`] is available when the caller needs to
//! tell "absent" from "corrupt".
//!
//! # Example
//!
//! ```no_run
//! use almacen_runtime::session::SessionStore;
//! use almacen_runtime::storage::LocalFileStore;
//! use almacen_types::{Role, User};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = LocalFileStore::new(PathBuf::from("~/.almacen/storage"), "default")?;
//! let session = SessionStore::new(storage);
//!
//! session.set_session("h.p.s", &User::new(1, "Ana Lopez", Role::Administrador))?;
//! if session.policy().can_manage_users() {
//!     println!("{} may manage users", session.user().map(|u| u.nombre).unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`KeyValueStore`]: crate::storage::KeyValueStore
//! [`IdentitySource`]: almacen_auth::IdentitySource

mod error;
mod store;

pub use error::SessionError;
pub use store::{Session, SessionStore, StoredUser, TOKEN_KEY, USER_KEY};

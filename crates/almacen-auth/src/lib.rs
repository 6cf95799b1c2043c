//! Authorization core for the Almacén admin client.
//!
//! Two questions are answered here, both without I/O:
//!
//! - **May the current user do X?**: [`AccessPolicy`] over the static
//!   [`Capability`] table, reading the user from an [`IdentitySource`].
//! - **Is this bearer token still valid?**: [`token::is_expired_at`]
//!   and friends, which read the `exp` claim and fail closed.
//!
//! # Crate Architecture
//!
//! ```text
//! almacen-types   (Role, RoleSet, User)
//!       ↑
//! almacen-auth    (Capability, AccessPolicy, IdentitySource, token)  ◄── THIS CRATE
//!       ↑
//! almacen-runtime (SessionStore implements IdentitySource)
//! ```
//!
//! # Design Principles
//!
//! - **Fail closed**: no user, unknown role, unreadable token → denied / expired
//! - **Data, not logic**: role membership lives in one exhaustive `match`
//! - **No caching**: every check re-reads the identity source

pub mod capability;
pub mod error;
pub mod policy;
pub mod token;

pub use capability::Capability;
pub use error::AccessDenied;
pub use policy::{AccessPolicy, IdentitySource};
pub use token::{TokenClaims, TokenError};

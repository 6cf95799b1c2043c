//! Almacén Runtime - session, login flow and configuration.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  almacen-types : Role, RoleSet, User, ErrorCode             │
//! │  almacen-auth  : Capability, AccessPolicy, token expiry     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  storage/ : KeyValueStore, MemoryStore, LocalFileStore      │
//! │  session/ : SessionStore (IdentitySource), StoredUser       │
//! │  auth/    : AuthService, login, logout, handle_status       │
//! │  config/  : AlmacenConfig, ConfigLoader, ConfigResolver     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  almacen-cli : `almacen` binary                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`storage`] - Durable Key/Value Port
//!
//! - [`KeyValueStore`](storage::KeyValueStore): origin-scoped string store
//!   with all-or-nothing batch writes
//! - [`open`](storage::open): selects a backend from [`StorageConfig`](config::StorageConfig)
//!
//! ## [`session`] - Authenticated Session
//!
//! - [`SessionStore`](session::SessionStore): owns the `token` and `user`
//!   keys and implements [`IdentitySource`](almacen_auth::IdentitySource)
//!
//! ## [`auth`] - Login Flow
//!
//! - [`login`](auth::login) / [`logout`](auth::logout) over an
//!   [`AuthService`](auth::AuthService)
//! - [`handle_status`](auth::handle_status): clears the session on 401
//!
//! ## [`config`] - Layered Configuration
//!
//! - [`ConfigLoader`](config::ConfigLoader): defaults, global file,
//!   project file and `ALMACEN_*` environment
//!
//! # Example
//!
//! ```
//! use almacen_runtime::config::{ConfigLoader, StorageBackend};
//! use almacen_runtime::session::SessionStore;
//! use almacen_runtime::storage;
//! use almacen_types::{Role, User};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = ConfigLoader::new()
//!     .skip_global_config()
//!     .skip_env_vars()
//!     .load()?;
//! config.storage.backend = StorageBackend::Memory;
//!
//! let session = SessionStore::new(storage::open(&config.storage)?);
//! session.set_session("h.p.s", &User::new(2, "", Role::Cajero))?;
//!
//! let policy = session.policy();
//! assert!(policy.can_access_pos());
//! assert!(!policy.can_create_products());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod auth;
pub mod config;
pub mod session;
pub mod storage;

pub use auth::{AuthError, AuthService, Credentials, LoginResponse};
pub use config::{AlmacenConfig, ConfigError, ConfigLoader};
pub use session::{Session, SessionError, SessionStore, StoredUser};
pub use storage::{KeyValueStore, LocalFileStore, MemoryStore, StorageError};

//! Core types for the Almacén admin client.
//!
//! This crate holds the identity vocabulary shared by the authorization
//! and runtime layers. It has no storage or policy logic.
//!
//! # Crate Architecture
//!
//! ```text
//! almacen-types    : Role, RoleSet, User, UserId, ErrorCode  ◄── HERE
//!       ↑
//! almacen-auth     : Capability table, AccessPolicy, token expiry
//!       ↑
//! almacen-runtime  : storage port, SessionStore, login flow, config
//!       ↑
//! almacen-cli      : `almacen` binary
//! ```

mod error;
mod role;
mod user;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use role::{Role, RoleSet};
pub use user::{User, UserId};

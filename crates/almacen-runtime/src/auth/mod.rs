//! Authentication flow over a remote [`AuthService`].
//!
//! ```text
//! Credentials ──► AuthService::login ──► LoginResponse
//!                                            │ success + token + user
//!                                            │ token not expired
//!                                            ▼
//!                                  SessionStore::set_session
//!
//! AuthService::logout ──(errors logged)──► SessionStore::clear
//! API response 401 ─────────────────────► SessionStore::clear
//! ```
//!
//! Transport is left to the [`AuthService`] implementation.

mod error;
mod flow;
mod service;

pub use error::AuthError;
pub use flow::{handle_status, login, logout, UNAUTHORIZED};
pub use service::{AuthService, Credentials, LoginResponse};

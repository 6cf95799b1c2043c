//! The authenticated user's profile record.

use crate::Role;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Server-side user id.
///
/// Backends disagree on the shape: some send a number, others an opaque
/// string. Both are kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl PartialEq<u64> for UserId {
    fn eq(&self, other: &u64) -> bool {
        matches!(self, Self::Number(n) if n == other)
    }
}

impl PartialEq<&str> for UserId {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Self::Text(s) if s == other)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// User profile as returned by the login endpoint and persisted under the
/// `user` storage key.
///
/// `rol` keeps the raw role string so that a record with an unknown role
/// survives a save/load cycle unchanged; [`User::role`] interprets it.
/// Fields other than `id`, `nombre` and `rol` are carried in `extra`.
/// A missing or `null` `nombre` reads as empty.
///
/// # Example
///
/// ```
/// use almacen_types::{Role, User};
///
/// let user = User::from_json(r#"{"id": 2, "rol": "Cajero", "sucursal": 4}"#).unwrap();
/// assert_eq!(user.role(), Some(Role::Cajero));
/// assert_eq!(user.nombre, "");
/// assert_eq!(user.extra["sucursal"], 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-side user id.
    pub id: UserId,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nombre: String,
    /// Role name as sent by the server.
    pub rol: String,
    /// Any other profile fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Creates a user with a known role and no extra fields.
    #[must_use]
    pub fn new(id: u64, nombre: impl Into<String>, rol: Role) -> Self {
        Self::with_role_name(id, nombre, rol.as_str())
    }

    /// Creates a user from a raw role string (which may be unknown).
    #[must_use]
    pub fn with_role_name(
        id: impl Into<UserId>,
        nombre: impl Into<String>,
        rol: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
            rol: rol.into(),
            extra: Map::new(),
        }
    }

    /// Returns the parsed role, or `None` if `rol` is not a known role name.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.rol)
    }

    /// Serializes the record to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a record from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, `id` is missing or neither
    /// a number nor a string, or `rol` is missing or not a string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nombre.is_empty() {
            write!(f, "#{} ({})", self.id, self.rol)
        } else {
            write!(f, "{} #{} ({})", self.nombre, self.id, self.rol)
        }
    }
}

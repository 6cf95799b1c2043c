//! Role vocabulary.
//!
//! A [`Role`] is the authorization class carried by the logged-in user.
//! Roles have no identity beyond their name: they are lookup keys into the
//! capability table. [`RoleSet`] is the bitflags set used to express
//! "which roles may do X".
//!
//! # Example
//!
//! ```
//! use almacen_types::{Role, RoleSet};
//!
//! assert_eq!(Role::parse("Cajero"), Some(Role::Cajero));
//! assert_eq!(Role::parse("cajero"), None); // exact match only
//!
//! let back_office = RoleSet::ADMINISTRADOR | RoleSet::GERENTE;
//! assert!(back_office.contains_role(Role::Gerente));
//! assert!(!back_office.contains_role(Role::Vendedor));
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// The closed set of roles known to the admin client.
///
/// The wire spelling (stored user record, server responses) is exactly the
/// variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Full access, including users, roles, branches and configuration.
    Administrador,
    /// Warehouse clerk: stock, purchases, order confirmation.
    Almacenista,
    /// Cashier: point of sale and invoicing.
    Cajero,
    /// Branch manager: pricing, approvals, reports.
    Gerente,
    /// Salesperson: orders and point of sale.
    Vendedor,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Administrador,
        Role::Almacenista,
        Role::Cajero,
        Role::Gerente,
        Role::Vendedor,
    ];

    /// Returns the wire spelling of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrador => "Administrador",
            Self::Almacenista => "Almacenista",
            Self::Cajero => "Cajero",
            Self::Gerente => "Gerente",
            Self::Vendedor => "Vendedor",
        }
    }

    /// Parses a role name.
    ///
    /// Matching is exact and case-sensitive. Unknown or misspelled names
    /// return `None`; callers treat that as "no role" and deny.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of roles.
    ///
    /// Used as the static permitted-role table of each capability.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RoleSet: u8 {
        const ADMINISTRADOR = 0b0000_0001;
        const ALMACENISTA   = 0b0000_0010;
        const CAJERO        = 0b0000_0100;
        const GERENTE       = 0b0000_1000;
        const VENDEDOR      = 0b0001_0000;
    }
}

impl RoleSet {
    /// Only the administrator.
    pub const ADMIN_ONLY: Self = Self::ADMINISTRADOR;

    /// Every role.
    pub const EVERYONE: Self = Self::ADMINISTRADOR
        .union(Self::ALMACENISTA)
        .union(Self::CAJERO)
        .union(Self::GERENTE)
        .union(Self::VENDEDOR);

    /// Returns `true` if `role` is a member of the set.
    #[must_use]
    pub fn contains_role(self, role: Role) -> bool {
        self.contains(Self::from(role))
    }

    /// Returns the member roles in declaration order.
    #[must_use]
    pub fn roles(self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.contains_role(*role))
            .collect()
    }
}

impl From<Role> for RoleSet {
    fn from(role: Role) -> Self {
        match role {
            Role::Administrador => Self::ADMINISTRADOR,
            Role::Almacenista => Self::ALMACENISTA,
            Role::Cajero => Self::CAJERO,
            Role::Gerente => Self::GERENTE,
            Role::Vendedor => Self::VENDEDOR,
        }
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, role| set | Self::from(role))
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.roles().into_iter().map(Role::as_str).collect();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_is_exact() {
        assert_eq!(Role::parse("Administrador"), Some(Role::Administrador));
        assert_eq!(Role::parse("Almacenista"), Some(Role::Almacenista));
        assert_eq!(Role::parse("ADMINISTRADOR"), None);
        assert_eq!(Role::parse("Administrador "), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Supervisor"), None);
    }

    #[test]
    fn as_str_roundtrips_through_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn serde_uses_wire_spelling() {
        let json = serde_json::to_string(&Role::Gerente).expect("serialize");
        assert_eq!(json, "\"Gerente\"");
        let parsed: Role = serde_json::from_str("\"Vendedor\"").expect("deserialize");
        assert_eq!(parsed, Role::Vendedor);
    }

    #[test]
    fn everyone_contains_all_roles() {
        assert_eq!(RoleSet::EVERYONE.roles(), Role::ALL.to_vec());
        assert_eq!(RoleSet::EVERYONE, RoleSet::all());
    }

    #[test]
    fn empty_set_displays_none() {
        assert!(RoleSet::empty().roles().is_empty());
        assert_eq!(RoleSet::empty().to_string(), "(none)");
    }

    #[test]
    fn display_lists_members() {
        let set = RoleSet::CAJERO | RoleSet::ADMINISTRADOR;
        assert_eq!(set.to_string(), "Administrador | Cajero");
    }

    #[test]
    fn collect_from_roles() {
        let set: RoleSet = [Role::Gerente, Role::Vendedor].into_iter().collect();
        assert_eq!(set, RoleSet::GERENTE | RoleSet::VENDEDOR);
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn membership_matches_construction(
            members in prop::collection::vec(any_role(), 0..5),
            candidate in any_role(),
        ) {
            let set: RoleSet = members.iter().copied().collect();
            prop_assert_eq!(set.contains_role(candidate), members.contains(&candidate));
        }
    }
}

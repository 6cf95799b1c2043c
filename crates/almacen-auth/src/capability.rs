//! Capability table.
//!
//! A [`Capability`] is a named, gated action in the admin client. Each one
//! is bound at compile time to the [`RoleSet`] allowed to perform it; the
//! table below is plain data and is the only place role membership is
//! decided.
//!
//! | Area | Capability | Roles |
//! |------|------------|-------|
//! | Products | `view_products` | everyone |
//! | | `create_products`, `edit_products` | Administrador, Almacenista, Gerente |
//! | | `delete_products` | Administrador |
//! | Prices | `view_prices` | everyone |
//! | | `manage_prices` | Administrador, Gerente |
//! | Purchases | `view_purchases`, `create_purchases` | Administrador, Almacenista, Gerente |
//! | | `approve_purchases` | Administrador, Gerente |
//! | | `cancel_purchases` | Administrador |
//! | Invoices | `view_invoices`, `create_invoices` | Administrador, Cajero, Gerente, Vendedor |
//! | | `cancel_invoices` | Administrador, Gerente |
//! | Orders | `view_orders` | everyone |
//! | | `create_orders` | Administrador, Cajero, Gerente, Vendedor |
//! | | `confirm_orders` | Administrador, Almacenista, Gerente |
//! | Providers | `view_providers` | Administrador, Almacenista, Gerente |
//! | | `manage_providers` | Administrador, Gerente |
//! | Stock | `manage_inventory` | Administrador, Almacenista |
//! | Reports | `view_reports` | Administrador, Gerente |
//! | POS | `access_pos` | Administrador, Cajero, Gerente, Vendedor |
//! | Admin | `manage_branches`, `manage_roles`, `manage_users`, `manage_configuration` | Administrador |
//!
//! # Example
//!
//! ```
//! use almacen_auth::Capability;
//! use almacen_types::Role;
//!
//! let cap = Capability::parse("access_pos").unwrap();
//! assert!(cap.permits(Role::Cajero));
//! assert!(!Capability::CreateProducts.permits(Role::Cajero));
//! ```

use almacen_types::{Role, RoleSet};
use serde::{Deserialize, Serialize};

/// Declares the capability enum together with its snake_case names.
macro_rules! capabilities {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// A gated action in the admin client.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Capability {
            $($(#[$doc])* $variant,)+
        }

        impl Capability {
            /// Every capability, in declaration order.
            pub const ALL: &'static [Capability] = &[$(Capability::$variant,)+];

            /// Returns the snake_case name used by the CLI and in logs.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

capabilities! {
    /// Browse the product catalogue.
    ViewProducts => "view_products",
    /// Register new products.
    CreateProducts => "create_products",
    /// Edit product data.
    EditProducts => "edit_products",
    /// Remove products.
    DeleteProducts => "delete_products",
    /// Read price lists.
    ViewPrices => "view_prices",
    /// Change prices and price lists.
    ManagePrices => "manage_prices",
    /// List purchase orders.
    ViewPurchases => "view_purchases",
    /// Draft purchase orders.
    CreatePurchases => "create_purchases",
    /// Approve purchase orders.
    ApprovePurchases => "approve_purchases",
    /// Cancel purchase orders.
    CancelPurchases => "cancel_purchases",
    /// List invoices.
    ViewInvoices => "view_invoices",
    /// Issue invoices.
    CreateInvoices => "create_invoices",
    /// Void issued invoices.
    CancelInvoices => "cancel_invoices",
    /// List customer orders.
    ViewOrders => "view_orders",
    /// Take customer orders.
    CreateOrders => "create_orders",
    /// Confirm orders for dispatch.
    ConfirmOrders => "confirm_orders",
    /// List providers.
    ViewProviders => "view_providers",
    /// Create and edit providers.
    ManageProviders => "manage_providers",
    /// Adjust stock levels.
    ManageInventory => "manage_inventory",
    /// Sales and stock reports.
    ViewReports => "view_reports",
    /// Point of sale screen.
    AccessPos => "access_pos",
    /// Create and edit branches.
    ManageBranches => "manage_branches",
    /// Create and edit roles.
    ManageRoles => "manage_roles",
    /// Create, edit and deactivate users.
    ManageUsers => "manage_users",
    /// System configuration.
    ManageConfiguration => "manage_configuration",
}

const STOCK: RoleSet = RoleSet::ADMINISTRADOR
    .union(RoleSet::ALMACENISTA)
    .union(RoleSet::GERENTE);
const MANAGEMENT: RoleSet = RoleSet::ADMINISTRADOR.union(RoleSet::GERENTE);
const SALES: RoleSet = RoleSet::ADMINISTRADOR
    .union(RoleSet::CAJERO)
    .union(RoleSet::GERENTE)
    .union(RoleSet::VENDEDOR);

impl Capability {
    /// Returns the roles allowed to exercise this capability.
    #[must_use]
    pub const fn permitted_roles(self) -> RoleSet {
        match self {
            Self::ViewProducts | Self::ViewPrices | Self::ViewOrders => RoleSet::EVERYONE,
            Self::CreateProducts | Self::EditProducts => STOCK,
            Self::DeleteProducts => RoleSet::ADMIN_ONLY,
            Self::ManagePrices => MANAGEMENT,
            Self::ViewPurchases | Self::CreatePurchases => STOCK,
            Self::ApprovePurchases => MANAGEMENT,
            Self::CancelPurchases => RoleSet::ADMIN_ONLY,
            Self::ViewInvoices | Self::CreateInvoices => SALES,
            Self::CancelInvoices => MANAGEMENT,
            Self::CreateOrders => SALES,
            Self::ConfirmOrders => STOCK,
            Self::ViewProviders => STOCK,
            Self::ManageProviders => MANAGEMENT,
            Self::ManageInventory => RoleSet::ADMINISTRADOR.union(RoleSet::ALMACENISTA),
            Self::ViewReports => MANAGEMENT,
            Self::AccessPos => SALES,
            Self::ManageBranches
            | Self::ManageRoles
            | Self::ManageUsers
            | Self::ManageConfiguration => RoleSet::ADMIN_ONLY,
        }
    }

    /// Returns `true` if `role` may exercise this capability.
    #[must_use]
    pub fn permits(self, role: Role) -> bool {
        self.permitted_roles().contains_role(role)
    }

    /// Parses a snake_case capability name. Exact match.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cap| cap.name() == name)
    }

    /// Returns every capability granted to `role`.
    #[must_use]
    pub fn granted_to(role: Role) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|cap| cap.permits(role))
            .collect()
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

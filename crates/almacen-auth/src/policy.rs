//! Role-based access policy.
//!
//! [`AccessPolicy`] answers "may the current user do X?" from the role of
//! whoever [`IdentitySource`] reports right now. It performs no I/O of its
//! own and caches nothing: two calls separated by a login or logout see
//! different users.
//!
//! # Architecture
//!
//! ```text
//! IdentitySource trait (almacen-auth)     ← abstract "who is logged in"
//!          │
//!          └── SessionStore (almacen-runtime)  ← reads the durable session
//!
//! AccessPolicy ── current_user() ──► Role::parse(rol) ──► Capability::permitted_roles()
//! ```
//!
//! Every inconclusive case (no user, unknown role) resolves to `false`.

use crate::{AccessDenied, Capability};
use almacen_types::{Role, RoleSet, User};
use tracing::debug;

/// Source of the currently authenticated user.
pub trait IdentitySource {
    /// Returns the current user, or `None` when nobody is logged in or the
    /// stored record cannot be read.
    fn current_user(&self) -> Option<User>;
}

impl<T: IdentitySource + ?Sized> IdentitySource for &T {
    fn current_user(&self) -> Option<User> {
        (**self).current_user()
    }
}

/// Capability checks bound to an identity source.
///
/// # Example
///
/// ```
/// use almacen_auth::{AccessPolicy, Capability, IdentitySource};
/// use almacen_types::{Role, User};
///
/// struct Fixed(Option<User>);
///
/// impl IdentitySource for Fixed {
///     fn current_user(&self) -> Option<User> {
///         self.0.clone()
///     }
/// }
///
/// let cashier = Fixed(Some(User::new(2, "", Role::Cajero)));
/// let policy = AccessPolicy::new(&cashier);
/// assert!(policy.can_access_pos());
/// assert!(!policy.can_create_products());
///
/// let nobody = Fixed(None);
/// assert!(!AccessPolicy::new(&nobody).can(Capability::ViewProducts));
/// ```
#[derive(Debug)]
pub struct AccessPolicy<'a, I: IdentitySource + ?Sized> {
    identity: &'a I,
}

impl<I: IdentitySource + ?Sized> Clone for AccessPolicy<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: IdentitySource + ?Sized> Copy for AccessPolicy<'_, I> {}

impl<'a, I: IdentitySource + ?Sized> AccessPolicy<'a, I> {
    /// Creates a policy reading from `identity`.
    #[must_use]
    pub fn new(identity: &'a I) -> Self {
        Self { identity }
    }

    /// Resolves the current user's role.
    ///
    /// # Errors
    ///
    /// [`AccessDenied::NoSession`] when no user is present,
    /// [`AccessDenied::UnknownRole`] when `rol` is not a known role.
    pub fn current_role(&self) -> Result<Role, AccessDenied> {
        let user = self.identity.current_user().ok_or(AccessDenied::NoSession)?;
        match user.role() {
            Some(role) => Ok(role),
            None => {
                debug!(user_id = %user.id, rol = %user.rol, "Unknown role, denying");
                Err(AccessDenied::UnknownRole(user.rol))
            }
        }
    }

    /// Returns `true` if a user is present and holds exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.current_role().is_ok_and(|current| current == role)
    }

    /// Returns `true` if a user is present and holds one of `roles`.
    ///
    /// An empty slice is always `false`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.has_role_in(roles.iter().copied().collect())
    }

    /// Returns `true` if a user is present and its role is in `set`.
    #[must_use]
    pub fn has_role_in(&self, set: RoleSet) -> bool {
        !set.is_empty()
            && self
                .current_role()
                .is_ok_and(|current| set.contains_role(current))
    }

    /// Shorthand for `has_role(Role::Administrador)`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Administrador)
    }

    /// Returns `true` if the current user may exercise `capability`.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.check(capability).is_ok()
    }

    /// Like [`can`](Self::can) but reports the reason for a denial.
    ///
    /// # Errors
    ///
    /// Returns the [`AccessDenied`] variant matching the failed step.
    pub fn check(&self, capability: Capability) -> Result<(), AccessDenied> {
        let role = self.current_role()?;
        if capability.permits(role) {
            Ok(())
        } else {
            Err(AccessDenied::CapabilityDenied { capability, role })
        }
    }

    /// Returns every capability the current user holds (empty when denied
    /// outright).
    #[must_use]
    pub fn allowed_capabilities(&self) -> Vec<Capability> {
        self.current_role()
            .map(Capability::granted_to)
            .unwrap_or_default()
    }
}

/// One named predicate per capability.
macro_rules! capability_checks {
    ($($method:ident => $cap:ident,)+) => {
        impl<I: IdentitySource + ?Sized> AccessPolicy<'_, I> {
            $(
                #[doc = concat!("Shorthand for `can(Capability::", stringify!($cap), ")`.")]
                #[must_use]
                pub fn $method(&self) -> bool {
                    self.can(Capability::$cap)
                }
            )+
        }
    };
}

capability_checks! {
    can_view_products => ViewProducts,
    can_create_products => CreateProducts,
    can_edit_products => EditProducts,
    can_delete_products => DeleteProducts,
    can_view_prices => ViewPrices,
    can_manage_prices => ManagePrices,
    can_view_purchases => ViewPurchases,
    can_create_purchases => CreatePurchases,
    can_approve_purchases => ApprovePurchases,
    can_cancel_purchases => CancelPurchases,
    can_view_invoices => ViewInvoices,
    can_create_invoices => CreateInvoices,
    can_cancel_invoices => CancelInvoices,
    can_view_orders => ViewOrders,
    can_create_orders => CreateOrders,
    can_confirm_orders => ConfirmOrders,
    can_view_providers => ViewProviders,
    can_manage_providers => ManageProviders,
    can_manage_inventory => ManageInventory,
    can_view_reports => ViewReports,
    can_access_pos => AccessPos,
    can_manage_branches => ManageBranches,
    can_manage_roles => ManageRoles,
    can_manage_users => ManageUsers,
    can_manage_configuration => ManageConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;

    /// Identity whose user can be swapped between calls.
    #[derive(Default)]
    struct SwappableIdentity(RefCell<Option<User>>);

    impl SwappableIdentity {
        fn with(user: User) -> Self {
            Self(RefCell::new(Some(user)))
        }

        fn set(&self, user: Option<User>) {
            *self.0.borrow_mut() = user;
        }
    }

    impl IdentitySource for SwappableIdentity {
        fn current_user(&self) -> Option<User> {
            self.0.borrow().clone()
        }
    }

    #[test]
    fn absent_user_denies_everything() {
        let identity = SwappableIdentity::default();
        let policy = AccessPolicy::new(&identity);

        assert!(!policy.is_admin());
        assert!(!policy.has_role(Role::Cajero));
        assert!(!policy.has_any_role(&Role::ALL));
        for cap in Capability::ALL {
            assert!(!policy.can(*cap), "{cap} allowed without a user");
        }
        assert_eq!(policy.check(Capability::ViewProducts), Err(AccessDenied::NoSession));
        assert!(policy.allowed_capabilities().is_empty());
    }

    #[test]
    fn unknown_role_denies_everything() {
        let identity = SwappableIdentity::with(User::with_role_name(9_u64, "Eve", "administrador"));
        let policy = AccessPolicy::new(&identity);

        assert!(!policy.is_admin());
        assert!(!policy.has_any_role(&Role::ALL));
        for cap in Capability::ALL {
            assert!(!policy.can(*cap));
        }
        assert_eq!(
            policy.check(Capability::ViewProducts),
            Err(AccessDenied::UnknownRole("administrador".into()))
        );
    }

    #[test]
    fn administrador_scenario() {
        let identity = SwappableIdentity::with(User::new(1, "Ana Lopez", Role::Administrador));
        let policy = AccessPolicy::new(&identity);

        assert!(policy.is_admin());
        assert!(policy.can_manage_users());
        assert!(policy.can_manage_configuration());
        assert_eq!(policy.allowed_capabilities(), Capability::ALL.to_vec());
    }

    #[test]
    fn cajero_scenario() {
        let identity = SwappableIdentity::with(User::new(2, "", Role::Cajero));
        let policy = AccessPolicy::new(&identity);

        assert!(!policy.can_create_products());
        assert!(policy.can_access_pos());
        assert!(!policy.is_admin());
        assert_eq!(
            policy.check(Capability::CreateProducts),
            Err(AccessDenied::CapabilityDenied {
                capability: Capability::CreateProducts,
                role: Role::Cajero,
            })
        );
    }

    #[test]
    fn has_any_role_empty_is_false() {
        let identity = SwappableIdentity::with(User::new(1, "Ana", Role::Administrador));
        let policy = AccessPolicy::new(&identity);
        assert!(!policy.has_any_role(&[]));
        assert!(!policy.has_role_in(RoleSet::empty()));
    }

    #[test]
    fn has_any_role_membership() {
        let identity = SwappableIdentity::with(User::new(5, "Rosa", Role::Gerente));
        let policy = AccessPolicy::new(&identity);
        assert!(policy.has_any_role(&[Role::Cajero, Role::Gerente]));
        assert!(!policy.has_any_role(&[Role::Cajero, Role::Vendedor]));
    }

    #[test]
    fn re_reads_identity_on_every_call() {
        let identity = SwappableIdentity::with(User::new(2, "", Role::Cajero));
        let policy = AccessPolicy::new(&identity);
        assert!(!policy.can_manage_users());

        identity.set(Some(User::new(1, "Ana", Role::Administrador)));
        assert!(policy.can_manage_users());

        identity.set(None);
        assert!(!policy.can_view_products());
    }

    #[test]
    fn named_predicates_agree_with_can() {
        let identity = SwappableIdentity::with(User::new(3, "Luis", Role::Almacenista));
        let policy = AccessPolicy::new(&identity);
        assert_eq!(policy.can_create_products(), policy.can(Capability::CreateProducts));
        assert_eq!(policy.can_cancel_invoices(), policy.can(Capability::CancelInvoices));
        assert_eq!(policy.can_manage_inventory(), policy.can(Capability::ManageInventory));
        assert_eq!(policy.can_access_pos(), policy.can(Capability::AccessPos));
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn any_capability() -> impl Strategy<Value = Capability> {
        prop::sample::select(Capability::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn predicate_true_exactly_for_permitted_roles(role in any_role(), cap in any_capability()) {
            let identity = SwappableIdentity::with(User::new(1, "", role));
            let policy = AccessPolicy::new(&identity);
            prop_assert_eq!(policy.can(cap), cap.permitted_roles().contains_role(role));
        }

        #[test]
        fn has_role_is_exact(stored in any_role(), candidate in any_role()) {
            let identity = SwappableIdentity::with(User::new(1, "", stored));
            prop_assert_eq!(AccessPolicy::new(&identity).has_role(candidate), stored == candidate);
        }
    }
}

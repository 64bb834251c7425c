use serde::{Deserialize, Serialize};

use atlaserp_core::{AccountId, TenantId};

use crate::{Module, ModuleGrants, Role};

/// The authenticated identity and authorization attributes resolved for a
/// request.
///
/// Contexts are immutable once built. The two constructors are the only way
/// to obtain one, and both enforce the structural invariants:
/// - `role == SuperAdmin` implies all modules granted,
/// - an anonymous context has no tenant and no grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    pub account_id: AccountId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub tenant_id: Option<TenantId>,
    pub modules: ModuleGrants,
    pub authenticated: bool,
}

impl SecurityContext {
    /// The empty, not-logged-in context. Every carrier decode failure and
    /// every request without a carrier resolves to this.
    pub fn anonymous() -> Self {
        Self {
            account_id: AccountId::from_uuid(uuid::Uuid::nil()),
            email: String::new(),
            display_name: String::new(),
            role: Role::Staff,
            tenant_id: None,
            modules: ModuleGrants::none(),
            authenticated: false,
        }
    }

    /// Build a logged-in context. Super-admin contexts get the all-true
    /// grant set regardless of what was passed in; super-admins are also
    /// tenant-agnostic, so any supplied tenant is discarded.
    pub fn authenticated(
        account_id: AccountId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        tenant_id: Option<TenantId>,
        modules: ModuleGrants,
    ) -> Self {
        let (tenant_id, modules) = if role.is_admin() {
            (None, ModuleGrants::all())
        } else {
            (tenant_id, modules)
        };

        Self {
            account_id,
            email: email.into(),
            display_name: display_name.into(),
            role,
            tenant_id,
            modules,
            authenticated: true,
        }
    }

    /// True iff this context is logged in and granted `module`.
    pub fn has_module(&self, module: Module) -> bool {
        self.authenticated && self.modules.get(module)
    }

    /// True iff this context is a logged-in super-admin.
    pub fn is_admin(&self) -> bool {
        self.authenticated && self.role.is_admin()
    }
}

impl Default for SecurityContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_context(modules: ModuleGrants) -> SecurityContext {
        SecurityContext::authenticated(
            AccountId::new(),
            "staff@example.com",
            "Staff Member",
            Role::Staff,
            Some(TenantId::new()),
            modules,
        )
    }

    #[test]
    fn super_admin_always_has_all_modules() {
        let ctx = SecurityContext::authenticated(
            AccountId::new(),
            "root@example.com",
            "Root",
            Role::SuperAdmin,
            Some(TenantId::new()),
            ModuleGrants::none(),
        );

        assert_eq!(ctx.modules, ModuleGrants::all());
        assert_eq!(ctx.tenant_id, None);
        for module in Module::ALL {
            assert!(ctx.has_module(module));
        }
    }

    #[test]
    fn anonymous_context_grants_nothing() {
        let ctx = SecurityContext::anonymous();
        assert!(!ctx.authenticated);
        assert!(!ctx.is_admin());
        for module in Module::ALL {
            assert!(!ctx.has_module(module));
        }
        assert_eq!(ctx.tenant_id, None);
    }

    #[test]
    fn staff_module_grants_are_respected() {
        let ctx = staff_context(ModuleGrants::none().with(Module::Hr, true));
        assert!(ctx.has_module(Module::Hr));
        assert!(!ctx.has_module(Module::Crm));
        assert!(!ctx.is_admin());
    }

    #[test]
    fn owner_is_not_admin_even_with_all_modules() {
        let ctx = SecurityContext::authenticated(
            AccountId::new(),
            "owner@example.com",
            "Owner",
            Role::Owner,
            Some(TenantId::new()),
            ModuleGrants::all(),
        );
        assert!(!ctx.is_admin());
    }
}

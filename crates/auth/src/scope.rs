//! Tenancy scoping.
//!
//! Every data-access handler derives one of these from the context and
//! applies it to every read, update, delete, and create. Super-admin
//! sessions scope globally and may act on an explicitly named tenant;
//! everyone else is pinned to their own tenant, and client-supplied tenant
//! identifiers are ignored.

use atlaserp_core::{DomainError, TenantId};

use crate::{AuthError, SecurityContext};

/// The scoping predicate derived from a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TenantScope {
    /// Super-admin: no tenant filter.
    Global,
    /// Owner/staff: records must carry exactly this tenant.
    Tenant(TenantId),
}

impl TenantScope {
    /// Derive the scope for a context.
    ///
    /// An authenticated non-admin without a tenant association cannot touch
    /// tenant-scoped data at all.
    pub fn for_context(ctx: &SecurityContext) -> Result<Self, AuthError> {
        if !ctx.authenticated {
            return Err(AuthError::Unauthenticated);
        }
        if ctx.is_admin() {
            return Ok(TenantScope::Global);
        }
        match ctx.tenant_id {
            Some(tenant_id) => Ok(TenantScope::Tenant(tenant_id)),
            None => Err(AuthError::Forbidden),
        }
    }

    /// Whether a record belonging to `record_tenant` is visible in this
    /// scope. A `false` here must surface as not-found, never as a distinct
    /// "wrong tenant" signal.
    pub fn can_access(&self, record_tenant: TenantId) -> bool {
        match self {
            TenantScope::Global => true,
            TenantScope::Tenant(own) => *own == record_tenant,
        }
    }

    /// The tenant to stamp on a newly created record.
    ///
    /// Non-admin scopes use their own tenant and discard whatever the client
    /// sent; the global scope requires the payload to name a tenant
    /// explicitly.
    pub fn tenant_for_create(&self, requested: Option<TenantId>) -> Result<TenantId, DomainError> {
        match self {
            TenantScope::Tenant(own) => Ok(*own),
            TenantScope::Global => {
                requested.ok_or_else(|| DomainError::validation("tenant_id is required"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModuleGrants, Role};
    use atlaserp_core::AccountId;

    fn owner(tenant_id: TenantId) -> SecurityContext {
        SecurityContext::authenticated(
            AccountId::new(),
            "owner@example.com",
            "Owner",
            Role::Owner,
            Some(tenant_id),
            ModuleGrants::all(),
        )
    }

    #[test]
    fn admin_scope_is_global() {
        let admin = SecurityContext::authenticated(
            AccountId::new(),
            "root@example.com",
            "Root",
            Role::SuperAdmin,
            None,
            ModuleGrants::all(),
        );
        let scope = TenantScope::for_context(&admin).unwrap();
        assert_eq!(scope, TenantScope::Global);
        assert!(scope.can_access(TenantId::new()));
    }

    #[test]
    fn non_admin_scope_matches_only_its_own_tenant() {
        let tenant = TenantId::new();
        let scope = TenantScope::for_context(&owner(tenant)).unwrap();
        assert!(scope.can_access(tenant));
        assert!(!scope.can_access(TenantId::new()));
    }

    #[test]
    fn anonymous_has_no_scope() {
        let err = TenantScope::for_context(&SecurityContext::anonymous()).unwrap_err();
        assert_eq!(err, AuthError::Unauthenticated);
    }

    #[test]
    fn creates_stamp_the_session_tenant_ignoring_client_input() {
        let tenant = TenantId::new();
        let scope = TenantScope::for_context(&owner(tenant)).unwrap();

        // Client tries to plant a foreign tenant id; it is discarded.
        let foreign = TenantId::new();
        assert_eq!(scope.tenant_for_create(Some(foreign)).unwrap(), tenant);
        assert_eq!(scope.tenant_for_create(None).unwrap(), tenant);
    }

    #[test]
    fn global_creates_require_an_explicit_tenant() {
        let scope = TenantScope::Global;
        let tenant = TenantId::new();
        assert_eq!(scope.tenant_for_create(Some(tenant)).unwrap(), tenant);
        assert!(scope.tenant_for_create(None).is_err());
    }
}

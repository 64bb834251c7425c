//! Store wiring shared by every handler.

use chrono::Utc;
use uuid::Uuid;

use atlaserp_auth::{AccountRecord, ModuleGrants, Role, TenantScope, password};
use atlaserp_core::DomainError;
use atlaserp_core::TenantId;
use atlaserp_infra::{
    InMemoryAccountStore, InMemoryTenantRegistry, InMemoryTenantStore, TenantStore,
};

use crate::app::records::{AttendanceRecord, Contact, Employee, Product, SaleRecord, TenantRecord};

/// All application state handlers reach through an `Extension`.
pub struct AppServices {
    pub accounts: InMemoryAccountStore,
    pub tenants: InMemoryTenantRegistry,
    pub contacts: InMemoryTenantStore<Uuid, Contact>,
    pub employees: InMemoryTenantStore<Uuid, Employee>,
    pub attendance: InMemoryTenantStore<Uuid, AttendanceRecord>,
    pub products: InMemoryTenantStore<Uuid, Product>,
    pub sales: InMemoryTenantStore<Uuid, SaleRecord>,
}

impl AppServices {
    pub fn new() -> Self {
        Self {
            accounts: InMemoryAccountStore::new(),
            tenants: InMemoryTenantRegistry::new(),
            contacts: InMemoryTenantStore::new(),
            employees: InMemoryTenantStore::new(),
            attendance: InMemoryTenantStore::new(),
            products: InMemoryTenantStore::new(),
            sales: InMemoryTenantStore::new(),
        }
    }

    /// Drop every business record scoped to `tenant_id`. Runs when a tenant
    /// registration is deleted; accounts pointing at the tenant survive and
    /// simply have nothing left to see.
    pub fn purge_tenant(&self, tenant_id: TenantId) {
        self.contacts.clear_tenant(tenant_id);
        self.employees.clear_tenant(tenant_id);
        self.attendance.clear_tenant(tenant_id);
        self.products.clear_tenant(tenant_id);
        self.sales.clear_tenant(tenant_id);
        tracing::info!(%tenant_id, "purged tenant-scoped records");
    }

    /// Seed the initial super-admin if the email is not taken yet.
    ///
    /// Called once at startup; deployments that already hold the account get
    /// a no-op.
    pub fn bootstrap_admin(
        &self,
        email: &str,
        password_input: &str,
        display_name: &str,
    ) -> Result<(), DomainError> {
        if self.accounts.find_by_email(email).is_some() {
            return Ok(());
        }

        let hash = password::hash_password(password_input)
            .map_err(|_| DomainError::invariant("admin password hashing failed"))?;
        let account = AccountRecord::new(
            email,
            hash,
            display_name,
            Role::SuperAdmin,
            None,
            ModuleGrants::all(),
            Utc::now(),
        )?;
        let id = self.accounts.insert(account)?;
        tracing::info!(%id, "bootstrapped super-admin account");
        Ok(())
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new()
    }
}

/// List records visible under `scope`.
pub fn list_scoped<V>(store: &InMemoryTenantStore<Uuid, V>, scope: TenantScope) -> Vec<V>
where
    V: TenantRecord + Clone + Send + Sync + 'static,
{
    match scope {
        TenantScope::Global => store.list_all(),
        TenantScope::Tenant(tenant_id) => store.list(tenant_id),
    }
}

/// Fetch one record visible under `scope`.
///
/// A record that exists in a tenant the scope cannot see resolves to
/// `NotFound`, same as a record that does not exist.
pub fn find_scoped<V>(
    store: &InMemoryTenantStore<Uuid, V>,
    scope: TenantScope,
    id: Uuid,
) -> Result<V, DomainError>
where
    V: TenantRecord + Clone + Send + Sync + 'static,
{
    let found = match scope {
        TenantScope::Tenant(tenant_id) => store.get(tenant_id, &id),
        TenantScope::Global => store.get_any(&id),
    };
    found.ok_or(DomainError::NotFound)
}

/// Remove one record visible under `scope`.
pub fn remove_scoped<V>(
    store: &InMemoryTenantStore<Uuid, V>,
    scope: TenantScope,
    id: Uuid,
) -> Result<V, DomainError>
where
    V: TenantRecord + Clone + Send + Sync + 'static,
{
    let record = find_scoped(store, scope, id)?;
    store
        .remove(record.tenant_id(), &id)
        .ok_or(DomainError::NotFound)
}

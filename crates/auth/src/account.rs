use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlaserp_core::{AccountId, DomainError, TenantId};

use crate::{ModuleGrants, Role};

/// The single place the role/module rule lives: a super-admin account always
/// carries the all-true grant set, no matter what was submitted.
pub fn effective_modules(role: Role, requested: ModuleGrants) -> ModuleGrants {
    if role.is_admin() {
        ModuleGrants::all()
    } else {
        requested
    }
}

/// A stored login account.
///
/// The email is normalized to lower-case and unique across the deployment.
/// `password_hash` is an Argon2 PHC string — the plaintext never appears
/// anywhere in this type or its construction paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub tenant_id: Option<TenantId>,
    pub modules: ModuleGrants,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        tenant_id: Option<TenantId>,
        modules: ModuleGrants,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let email = email.into().trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        let display_name = display_name.into().trim().to_string();
        if display_name.is_empty() {
            return Err(DomainError::validation("display name cannot be empty"));
        }

        Ok(Self {
            id: AccountId::new(),
            email,
            password_hash: password_hash.into(),
            display_name,
            role,
            tenant_id,
            modules: effective_modules(role, modules),
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update.
    ///
    /// The module-forcing rule is re-applied after the update, so a change
    /// that only touches `role` still ends up with a consistent grant set.
    pub fn apply_update(&mut self, update: AccountUpdate, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(email) = update.email {
            let email = email.trim().to_lowercase();
            if email.is_empty() || !email.contains('@') {
                return Err(DomainError::validation("invalid email format"));
            }
            self.email = email;
        }
        if let Some(display_name) = update.display_name {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(DomainError::validation("display name cannot be empty"));
            }
            self.display_name = display_name;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(tenant_id) = update.tenant_id {
            self.tenant_id = tenant_id;
        }
        if let Some(modules) = update.modules {
            self.modules = modules;
        }
        if let Some(password_hash) = update.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(active) = update.active {
            self.active = active;
        }

        self.modules = effective_modules(self.role, self.modules);
        self.updated_at = now;
        Ok(())
    }
}

/// Partial account update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    /// `Some(None)` clears the tenant association.
    pub tenant_id: Option<Option<TenantId>>,
    pub modules: Option<ModuleGrants>,
    pub password_hash: Option<String>,
    pub active: Option<bool>,
}

//! Request/response DTOs shared across route files.

use serde::{Deserialize, Deserializer, Serialize};

use atlaserp_auth::{AccountRecord, ModuleGrants, Role, SecurityContext};
use atlaserp_core::{AccountId, TenantId};

/// Login payload. Fields are optional so a missing field maps to a 400
/// instead of a body-rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The identity view returned by login and `/api/auth/me`.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: AccountId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub tenant_id: Option<TenantId>,
    pub modules: ModuleGrants,
}

impl SessionUser {
    pub fn from_context(ctx: &SecurityContext) -> Self {
        Self {
            id: ctx.account_id,
            email: ctx.email.clone(),
            name: ctx.display_name.clone(),
            role: ctx.role,
            tenant_id: ctx.tenant_id,
            modules: ctx.modules,
        }
    }
}

/// The account view on the admin surface. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: AccountId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub tenant_id: Option<TenantId>,
    pub modules: ModuleGrants,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountRecord> for UserView {
    fn from(account: AccountRecord) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.display_name,
            role: account.role,
            tenant_id: account.tenant_id,
            modules: account.modules,
            active: account.active,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub tenant_id: Option<TenantId>,
    pub modules: Option<ModuleGrants>,
}

/// Partial account update. `tenant_id` distinguishes "absent" (leave as-is)
/// from an explicit `null` (clear the tenant association).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    /// Empty strings are treated as "keep the current password".
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "double_option")]
    pub tenant_id: Option<Option<TenantId>>,
    pub modules: Option<ModuleGrants>,
    pub active: Option<bool>,
}

/// Present-but-null vs absent for optional nullable fields.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

//! Tenant ("company") and account management. Every handler re-checks the
//! super-admin guard even though the route table already gates the
//! `/api/admin` prefix.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use atlaserp_auth::{
    AccountRecord, AccountUpdate, ModuleGrants, SecurityContext, password, require_admin,
};
use atlaserp_core::{AccountId, TenantId};
use atlaserp_infra::TenantProfile;

use crate::app::dto::{CreateUserRequest, UpdateUserRequest, UserView};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", axum::routing::put(update_user).delete(delete_user))
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/:id",
            axum::routing::put(update_company).delete(delete_company),
        )
}

async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    let users: Vec<UserView> = services
        .accounts
        .list()
        .into_iter()
        .map(UserView::from)
        .collect();
    Json(json!({ "users": users })).into_response()
}

async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Json(body): Json<CreateUserRequest>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    let (Some(email), Some(password_input), Some(name), Some(role)) =
        (body.email, body.password, body.name, body.role)
    else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "email, password, name and role are required",
        );
    };

    // Accounts may only point at registered tenants.
    if let Some(tenant_id) = body.tenant_id {
        if !services.tenants.contains(tenant_id) {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "unknown tenant_id",
            );
        }
    }

    let hash = match password::hash_password(&password_input) {
        Ok(hash) => hash,
        Err(err) => return errors::auth_error(&err),
    };

    // Role/module forcing happens inside the record constructor.
    let account = match AccountRecord::new(
        email,
        hash,
        name,
        role,
        body.tenant_id,
        body.modules.unwrap_or_else(ModuleGrants::none),
        Utc::now(),
    ) {
        Ok(account) => account,
        Err(err) => return errors::domain_error(&err),
    };

    match services.accounts.insert(account) {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    let id = AccountId::from_uuid(id);
    let Some(mut account) = services.accounts.get(id) else {
        return errors::domain_error(&atlaserp_core::DomainError::NotFound);
    };

    if let Some(Some(tenant_id)) = body.tenant_id {
        if !services.tenants.contains(tenant_id) {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "unknown tenant_id",
            );
        }
    }

    // Blank password means "leave it alone" (admin form resubmission).
    let password_hash = match body.password.filter(|p| !p.is_empty()) {
        Some(plain) => match password::hash_password(&plain) {
            Ok(hash) => Some(hash),
            Err(err) => return errors::auth_error(&err),
        },
        None => None,
    };

    let update = AccountUpdate {
        email: body.email,
        display_name: body.name,
        role: body.role,
        tenant_id: body.tenant_id,
        modules: body.modules,
        password_hash,
        active: body.active,
    };

    if let Err(err) = account.apply_update(update, Utc::now()) {
        return errors::domain_error(&err);
    }
    if let Err(err) = services.accounts.update(account.clone()) {
        return errors::domain_error(&err);
    }

    Json(json!({ "user": UserView::from(account) })).into_response()
}

async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    match services.accounts.remove(AccountId::from_uuid(id)) {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

#[derive(Debug, Deserialize)]
struct CreateCompany {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateCompany {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    industry: Option<String>,
    active: Option<bool>,
}

async fn list_companies(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    Json(json!({ "companies": services.tenants.list() })).into_response()
}

async fn create_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Json(body): Json<CreateCompany>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    let Some(name) = body.name else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", "name is required");
    };

    let mut profile = match TenantProfile::new(name, Utc::now()) {
        Ok(profile) => profile,
        Err(err) => return errors::domain_error(&err),
    };
    profile.email = body.email;
    profile.phone = body.phone;
    profile.address = body.address;
    profile.industry = body.industry;

    match services.tenants.insert(profile.clone()) {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id, "company": profile })))
            .into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

async fn update_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCompany>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    let id = TenantId::from_uuid(id);
    let Some(mut profile) = services.tenants.get(id) else {
        return errors::domain_error(&atlaserp_core::DomainError::NotFound);
    };

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "name cannot be empty",
            );
        }
        profile.name = name;
    }
    if let Some(email) = body.email {
        profile.email = Some(email);
    }
    if let Some(phone) = body.phone {
        profile.phone = Some(phone);
    }
    if let Some(address) = body.address {
        profile.address = Some(address);
    }
    if let Some(industry) = body.industry {
        profile.industry = Some(industry);
    }
    if let Some(active) = body.active {
        profile.active = active;
    }
    profile.updated_at = Utc::now();

    if let Err(err) = services.tenants.update(profile.clone()) {
        return errors::domain_error(&err);
    }
    Json(json!({ "company": profile })).into_response()
}

async fn delete_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(err) = require_admin(&ctx) {
        return errors::auth_error(&err);
    }

    let removed = match services.tenants.remove(TenantId::from_uuid(id)) {
        Ok(removed) => removed,
        Err(err) => return errors::domain_error(&err),
    };

    // Deleting the registration takes the tenant's business data with it.
    services.purge_tenant(removed.id);
    Json(json!({ "ok": true })).into_response()
}

//! CRM contacts (customers and suppliers).

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

use atlaserp_auth::{Module, SecurityContext, TenantScope, require_module};
use atlaserp_core::TenantId;
use atlaserp_infra::TenantStore;

use crate::app::errors;
use crate::app::records::{Contact, ContactType};
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/contacts", get(list).post(create))
        .route("/contacts/:id", get(fetch).put(update).delete(remove))
}

/// Module grant first, then tenancy scope. Both come from the context the
/// route guard injected.
fn authorize(ctx: &SecurityContext) -> Result<TenantScope, Response> {
    require_module(ctx, Module::Crm).map_err(|err| errors::auth_error(&err))?;
    TenantScope::for_context(ctx).map_err(|err| errors::auth_error(&err))
}

#[derive(Debug, Deserialize)]
struct CreateContact {
    name: Option<String>,
    #[serde(rename = "type")]
    contact_type: Option<ContactType>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    balance: Option<f64>,
    /// Only honored for super-admin sessions; everyone else gets their own
    /// tenant stamped regardless.
    tenant_id: Option<TenantId>,
}

#[derive(Debug, Deserialize)]
struct UpdateContact {
    name: Option<String>,
    #[serde(rename = "type")]
    contact_type: Option<ContactType>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    balance: Option<f64>,
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut contacts = services::list_scoped(&services.contacts, scope);
    contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(json!({ "contacts": contacts })).into_response()
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Json(body): Json<CreateContact>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let Some(name) = body.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", "name is required");
    };

    let tenant_id = match scope.tenant_for_create(body.tenant_id) {
        Ok(tenant_id) => tenant_id,
        Err(err) => return errors::domain_error(&err),
    };

    let now = Utc::now();
    let contact = Contact {
        id: Uuid::now_v7(),
        tenant_id,
        name,
        contact_type: body.contact_type.unwrap_or(ContactType::Customer),
        phone: body.phone,
        email: body.email,
        address: body.address,
        notes: body.notes,
        balance: body.balance.unwrap_or(0.0),
        created_by: ctx.account_id,
        created_at: now,
        updated_at: now,
    };
    services.contacts.upsert(tenant_id, contact.id, contact.clone());

    (StatusCode::CREATED, Json(json!({ "contact": contact }))).into_response()
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    match services::find_scoped(&services.contacts, scope, id) {
        Ok(contact) => Json(json!({ "contact": contact })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateContact>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut contact = match services::find_scoped(&services.contacts, scope, id) {
        Ok(contact) => contact,
        Err(err) => return errors::domain_error(&err),
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
        contact.name = name;
    }
    if let Some(contact_type) = body.contact_type {
        contact.contact_type = contact_type;
    }
    if let Some(phone) = body.phone {
        contact.phone = Some(phone);
    }
    if let Some(email) = body.email {
        contact.email = Some(email);
    }
    if let Some(address) = body.address {
        contact.address = Some(address);
    }
    if let Some(notes) = body.notes {
        contact.notes = Some(notes);
    }
    if let Some(balance) = body.balance {
        contact.balance = balance;
    }
    contact.updated_at = Utc::now();

    services
        .contacts
        .upsert(contact.tenant_id, contact.id, contact.clone());
    Json(json!({ "contact": contact })).into_response()
}

async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    match services::remove_scoped(&services.contacts, scope, id) {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

//! Recorded sales.

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
use crate::app::records::SaleRecord;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).delete(remove))
}

fn authorize(ctx: &SecurityContext) -> Result<TenantScope, Response> {
    require_module(ctx, Module::Sales).map_err(|err| errors::auth_error(&err))?;
    TenantScope::for_context(ctx).map_err(|err| errors::auth_error(&err))
}

#[derive(Debug, Deserialize)]
struct CreateSale {
    customer_name: Option<String>,
    total: Option<f64>,
    tenant_id: Option<TenantId>,
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut sales = services::list_scoped(&services.sales, scope);
    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(json!({ "sales": sales })).into_response()
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Json(body): Json<CreateSale>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let Some(total) = body.total else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", "total is required");
    };
    if !total.is_finite() || total < 0.0 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "total must be a non-negative number",
        );
    }

    let tenant_id = match scope.tenant_for_create(body.tenant_id) {
        Ok(tenant_id) => tenant_id,
        Err(err) => return errors::domain_error(&err),
    };

    let now = Utc::now();
    let sale = SaleRecord {
        id: Uuid::now_v7(),
        tenant_id,
        customer_name: body.customer_name,
        total,
        created_by: ctx.account_id,
        created_at: now,
        updated_at: now,
    };
    services.sales.upsert(tenant_id, sale.id, sale.clone());

    (StatusCode::CREATED, Json(json!({ "sale": sale }))).into_response()
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

    match services::find_scoped(&services.sales, scope, id) {
        Ok(sale) => Json(json!({ "sale": sale })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
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

    match services::remove_scoped(&services.sales, scope, id) {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

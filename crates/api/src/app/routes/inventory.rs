//! Inventory products.

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
use crate::app::records::Product;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/:id", get(fetch).put(update).delete(remove))
}

fn authorize(ctx: &SecurityContext) -> Result<TenantScope, Response> {
    require_module(ctx, Module::Inventory).map_err(|err| errors::auth_error(&err))?;
    TenantScope::for_context(ctx).map_err(|err| errors::auth_error(&err))
}

#[derive(Debug, Deserialize)]
struct CreateProduct {
    name: Option<String>,
    sku: Option<String>,
    price: Option<f64>,
    cost: Option<f64>,
    quantity: Option<i64>,
    tenant_id: Option<TenantId>,
}

#[derive(Debug, Deserialize)]
struct UpdateProduct {
    name: Option<String>,
    sku: Option<String>,
    price: Option<f64>,
    cost: Option<f64>,
    quantity: Option<i64>,
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut products = services::list_scoped(&services.products, scope);
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(json!({ "products": products })).into_response()
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Json(body): Json<CreateProduct>,
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
    let product = Product {
        id: Uuid::now_v7(),
        tenant_id,
        name,
        sku: body.sku,
        price: body.price.unwrap_or(0.0),
        cost: body.cost.unwrap_or(0.0),
        quantity: body.quantity.unwrap_or(0),
        created_by: ctx.account_id,
        created_at: now,
        updated_at: now,
    };
    services
        .products
        .upsert(tenant_id, product.id, product.clone());

    (StatusCode::CREATED, Json(json!({ "product": product }))).into_response()
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

    match services::find_scoped(&services.products, scope, id) {
        Ok(product) => Json(json!({ "product": product })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProduct>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut product = match services::find_scoped(&services.products, scope, id) {
        Ok(product) => product,
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
        product.name = name;
    }
    if let Some(sku) = body.sku {
        product.sku = Some(sku);
    }
    if let Some(price) = body.price {
        product.price = price;
    }
    if let Some(cost) = body.cost {
        product.cost = cost;
    }
    if let Some(quantity) = body.quantity {
        product.quantity = quantity;
    }
    product.updated_at = Utc::now();

    services
        .products
        .upsert(product.tenant_id, product.id, product.clone());
    Json(json!({ "product": product })).into_response()
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

    match services::remove_scoped(&services.products, scope, id) {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

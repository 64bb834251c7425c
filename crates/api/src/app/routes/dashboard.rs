//! Dashboard summary.
//!
//! Requires a session but no particular module grant; the numbers are still
//! tenant-scoped like everything else.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{Datelike, Utc};
use serde_json::json;

use atlaserp_auth::{SecurityContext, TenantScope, require_authenticated};

use crate::app::errors;
use crate::app::records::ContactType;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    // Both spellings resolve to the same summary.
    Router::new()
        .route("/", get(stats))
        .route("/stats", get(stats))
}

async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Response {
    if let Err(err) = require_authenticated(&ctx) {
        return errors::auth_error(&err);
    }
    let scope = match TenantScope::for_context(&ctx) {
        Ok(scope) => scope,
        Err(err) => return errors::auth_error(&err),
    };

    let customers = services::list_scoped(&services.contacts, scope)
        .into_iter()
        .filter(|c| c.contact_type == ContactType::Customer)
        .count();
    let products = services::list_scoped(&services.products, scope).len();
    let employees = services::list_scoped(&services.employees, scope).len();

    let now = Utc::now();
    let monthly_sales: f64 = services::list_scoped(&services.sales, scope)
        .into_iter()
        .filter(|s| s.created_at.year() == now.year() && s.created_at.month() == now.month())
        .map(|s| s.total)
        .sum();

    Json(json!({
        "customers": customers,
        "products": products,
        "employees": employees,
        "monthly_sales": monthly_sales,
    }))
    .into_response()
}

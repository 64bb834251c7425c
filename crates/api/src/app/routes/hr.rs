//! HR employees and their attendance log.

use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use atlaserp_auth::{Module, SecurityContext, TenantScope, require_module};
use atlaserp_core::TenantId;
use atlaserp_infra::TenantStore;

use crate::app::errors;
use crate::app::records::{AttendanceRecord, AttendanceStatus, Employee};
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/employees", get(list).post(create))
        .route("/employees/:id", get(fetch).put(update).delete(remove))
        .route("/attendance", get(list_attendance).post(create_attendance))
        .route("/attendance/:id", axum::routing::delete(remove_attendance))
}

fn authorize(ctx: &SecurityContext) -> Result<TenantScope, Response> {
    require_module(ctx, Module::Hr).map_err(|err| errors::auth_error(&err))?;
    TenantScope::for_context(ctx).map_err(|err| errors::auth_error(&err))
}

#[derive(Debug, Deserialize)]
struct CreateEmployee {
    name: Option<String>,
    position: Option<String>,
    phone: Option<String>,
    salary: Option<f64>,
    hired_at: Option<DateTime<Utc>>,
    tenant_id: Option<TenantId>,
}

#[derive(Debug, Deserialize)]
struct UpdateEmployee {
    name: Option<String>,
    position: Option<String>,
    phone: Option<String>,
    salary: Option<f64>,
    hired_at: Option<DateTime<Utc>>,
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut employees = services::list_scoped(&services.employees, scope);
    employees.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(json!({ "employees": employees })).into_response()
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Json(body): Json<CreateEmployee>,
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
    let employee = Employee {
        id: Uuid::now_v7(),
        tenant_id,
        name,
        position: body.position,
        phone: body.phone,
        salary: body.salary.unwrap_or(0.0),
        hired_at: body.hired_at,
        created_by: ctx.account_id,
        created_at: now,
        updated_at: now,
    };
    services
        .employees
        .upsert(tenant_id, employee.id, employee.clone());

    (StatusCode::CREATED, Json(json!({ "employee": employee }))).into_response()
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

    match services::find_scoped(&services.employees, scope, id) {
        Ok(employee) => Json(json!({ "employee": employee })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEmployee>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut employee = match services::find_scoped(&services.employees, scope, id) {
        Ok(employee) => employee,
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
        employee.name = name;
    }
    if let Some(position) = body.position {
        employee.position = Some(position);
    }
    if let Some(phone) = body.phone {
        employee.phone = Some(phone);
    }
    if let Some(salary) = body.salary {
        employee.salary = salary;
    }
    if let Some(hired_at) = body.hired_at {
        employee.hired_at = Some(hired_at);
    }
    employee.updated_at = Utc::now();

    services
        .employees
        .upsert(employee.tenant_id, employee.id, employee.clone());
    Json(json!({ "employee": employee })).into_response()
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

    match services::remove_scoped(&services.employees, scope, id) {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

#[derive(Debug, Deserialize)]
struct AttendanceQuery {
    employee_id: Option<Uuid>,
    month: Option<u32>,
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CreateAttendance {
    employee_id: Option<Uuid>,
    date: Option<DateTime<Utc>>,
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    status: Option<AttendanceStatus>,
    notes: Option<String>,
    tenant_id: Option<TenantId>,
}

async fn list_attendance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Query(query): Query<AttendanceQuery>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let mut entries = services::list_scoped(&services.attendance, scope);
    if let Some(employee_id) = query.employee_id {
        entries.retain(|e| e.employee_id == employee_id);
    }
    if let (Some(month), Some(year)) = (query.month, query.year) {
        entries.retain(|e| e.date.month() == month && e.date.year() == year);
    }
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    Json(json!({ "attendance": entries })).into_response()
}

async fn create_attendance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Json(body): Json<CreateAttendance>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let (Some(employee_id), Some(date), Some(status)) = (body.employee_id, body.date, body.status)
    else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "employee_id, date and status are required",
        );
    };

    let tenant_id = match scope.tenant_for_create(body.tenant_id) {
        Ok(tenant_id) => tenant_id,
        Err(err) => return errors::domain_error(&err),
    };

    // The entry must point at an employee the caller's scope can see, and
    // that employee must live in the entry's own tenant.
    match services::find_scoped(&services.employees, scope, employee_id) {
        Ok(employee) if employee.tenant_id == tenant_id => {}
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "unknown employee_id",
            );
        }
    }

    let now = Utc::now();
    let entry = AttendanceRecord {
        id: Uuid::now_v7(),
        tenant_id,
        employee_id,
        date,
        check_in: body.check_in,
        check_out: body.check_out,
        status,
        notes: body.notes,
        created_by: ctx.account_id,
        created_at: now,
        updated_at: now,
    };
    services.attendance.upsert(tenant_id, entry.id, entry.clone());

    (StatusCode::CREATED, Json(json!({ "attendance": entry }))).into_response()
}

async fn remove_attendance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SecurityContext>,
    Path(id): Path<Uuid>,
) -> Response {
    let scope = match authorize(&ctx) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    match services::remove_scoped(&services.attendance, scope, id) {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(err) => errors::domain_error(&err),
    }
}

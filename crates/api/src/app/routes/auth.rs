//! Login, logout, and session introspection.

use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;

use atlaserp_auth::{SecurityContext, SessionStore, require_authenticated, verify_credentials};

use crate::app::dto::{LoginRequest, SessionUser};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sessions): Extension<Arc<SessionStore>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "email and password are required",
        );
    };
    if email.trim().is_empty() || password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "email and password are required",
        );
    }

    let ctx = match verify_credentials(&services.accounts, &email, &password) {
        Ok(ctx) => ctx,
        Err(err) => return errors::auth_error(&err),
    };

    let carrier = sessions.create(&ctx);
    let cookie = sessions.session_cookie(&carrier);

    let mut response = Json(json!({ "user": SessionUser::from_context(&ctx) })).into_response();
    if let Ok(value) = header::HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

async fn logout(Extension(sessions): Extension<Arc<SessionStore>>) -> Response {
    // The carrier is client-held; logout is purely an instruction to drop it.
    let mut response = Json(json!({ "ok": true })).into_response();
    if let Ok(value) = header::HeaderValue::from_str(&sessions.clearing_cookie()) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

async fn me(Extension(ctx): Extension<SecurityContext>) -> Response {
    match require_authenticated(&ctx) {
        Ok(ctx) => Json(json!({ "user": SessionUser::from_context(ctx) })).into_response(),
        Err(err) => errors::auth_error(&err),
    }
}

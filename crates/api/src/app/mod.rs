//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store wiring + admin bootstrap
//! - `records.rs`: business record types held in the tenant stores
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Result;
use axum::{Extension, Router, routing::get};

use atlaserp_auth::{RouteTable, SessionStore};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod records;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Runtime configuration for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Session sealing secret; must be at least 32 bytes.
    pub session_secret: String,
    /// Emit the `Secure` cookie attribute (production deployments).
    pub secure_cookies: bool,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: &ApiConfig, services: Arc<AppServices>) -> Result<Router> {
    let sessions = Arc::new(SessionStore::new(
        &config.session_secret,
        config.secure_cookies,
    )?);
    let table = Arc::new(RouteTable::standard());

    let auth_state = middleware::AuthState {
        sessions: sessions.clone(),
        table,
    };

    // The route guard wraps everything, including the public auth routes:
    // those bypass via the table's allow-list but still get the resolved
    // context injected.
    let router = Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/auth", routes::auth::router())
        .nest("/api/admin", routes::admin::router())
        .nest("/api/crm", routes::crm::router())
        .nest("/api/hr", routes::hr::router())
        .nest("/api/inventory", routes::inventory::router())
        .nest("/api/sales", routes::sales::router())
        .nest("/api/dashboard", routes::dashboard::router())
        .layer(Extension(services))
        .layer(Extension(sessions))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::route_guard,
        ));

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use tower::ServiceExt;

    use atlaserp_auth::{AccountRecord, Module, ModuleGrants, Role, password};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn test_app() -> Router {
        let services = Arc::new(AppServices::new());
        let account = AccountRecord::new(
            "staff@example.com",
            password::hash_password("hunter2hunter2").unwrap(),
            "Staff",
            Role::Staff,
            Some(atlaserp_core::TenantId::new()),
            ModuleGrants::none().with(Module::Crm, true),
            Utc::now(),
        )
        .unwrap();
        services.accounts.insert(account).unwrap();

        let config = ApiConfig {
            session_secret: SECRET.to_string(),
            secure_cookies: false,
        };
        build_app(&config, services).unwrap()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn login_cookie(app: &Router) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"email":"staff@example.com","password":"hunter2hunter2"}"#,
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_reachable_without_a_session() {
        let response = test_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn guarded_api_routes_reject_anonymous_callers() {
        let response = test_app()
            .oneshot(get("/api/crm/contacts"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn page_denials_redirect_to_login() {
        let response = test_app().oneshot(get("/dashboard")).await.unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn a_session_cookie_opens_granted_routes_only() {
        let app = test_app();
        let cookie = login_cookie(&app).await;

        let mut granted = get("/api/crm/contacts");
        granted
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = app.clone().oneshot(granted).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Same session, ungranted module.
        let mut denied = get("/api/hr/employees");
        denied
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = app.oneshot(denied).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

use std::sync::Arc;

use anyhow::Context;

use atlaserp_api::app::{ApiConfig, AppServices, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    atlaserp_observability::init();

    let config = load_config();
    let services = Arc::new(AppServices::new());

    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let admin_password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "change-me-immediately".to_string());
    let admin_name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
    services
        .bootstrap_admin(&admin_email, &admin_password, &admin_name)
        .context("bootstrapping the initial super-admin")?;

    let app = build_app(&config, services).context("building the HTTP router")?;

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "listening");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}

fn load_config() -> ApiConfig {
    let session_secret = match std::env::var("SESSION_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            // Dev fallback; SessionStore enforces the length floor either way.
            tracing::warn!("SESSION_SECRET is not set; using an insecure development secret");
            "insecure-development-secret-0123456789abcdef".to_string()
        }
    };

    let secure_cookies = std::env::var("SECURE_COOKIES")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    ApiConfig {
        session_secret,
        secure_cookies,
    }
}

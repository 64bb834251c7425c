use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

/// Liveness probe; sits outside the authorization table on purpose.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

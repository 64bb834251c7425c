//! Consistent JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use atlaserp_auth::AuthError;
use atlaserp_core::DomainError;

/// Build a JSON error response of the shape `{"error": {"code", "message"}}`.
pub fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = Json(json!({
        "error": { "code": code, "message": message }
    }));
    (status, body).into_response()
}

/// Map an authorization failure to its HTTP shape.
///
/// Credential rejections carry one generic message regardless of whether the
/// email or the password was wrong.
pub fn auth_error(err: &AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        ),
        AuthError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        AuthError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "access denied"),
        AuthError::WeakSessionSecret(_) | AuthError::Hashing => {
            tracing::error!(error = %err, "internal auth failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error",
            )
        }
    }
}

/// Map a domain failure to its HTTP shape.
pub fn domain_error(err: &DomainError) -> Response {
    match err {
        DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_request", msg)
        }
        DomainError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "conflict", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant", msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_credential_failures_share_one_shape() {
        // Wrong email and wrong password must be indistinguishable; the
        // mapping has a single arm for both.
        let response = auth_error(&AuthError::InvalidCredentials);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = domain_error(&DomainError::NotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = domain_error(&DomainError::validation("tenant_id is required"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use atlaserp_auth::{
    RouteClass, RouteDecision, RouteTable, SESSION_COOKIE, SecurityContext, SessionStore,
    routes::DenialKind,
};

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<SessionStore>,
    pub table: Arc<RouteTable>,
}

/// Router-wide request gate.
///
/// Resolves the session from the carrier cookie, runs the route engine, and
/// either rejects the request before any handler executes or injects the
/// resolved [`SecurityContext`] as a request extension. The context is
/// injected on unmatched (public) paths too, so handlers like `/api/auth/me`
/// can still see who is calling.
pub async fn route_guard(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let class = request_class(&path);

    let ctx = match extract_carrier(req.headers()) {
        Some(carrier) => state.sessions.read(carrier),
        None => SecurityContext::anonymous(),
    };

    match state.table.evaluate(&path, class, &ctx) {
        RouteDecision::Permitted | RouteDecision::Unmatched => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        RouteDecision::Denied(denial) => {
            tracing::debug!(%path, kind = ?denial.kind, "request denied by route table");
            deny_response(denial.kind, denial.class)
        }
    }
}

/// `/api/...` requests get structured errors; everything else is treated as
/// browser navigation and redirected on denial.
fn request_class(path: &str) -> RouteClass {
    if path == "/api" || path.starts_with("/api/") {
        RouteClass::Api
    } else {
        RouteClass::Page
    }
}

fn deny_response(kind: DenialKind, class: RouteClass) -> Response {
    match (class, kind) {
        (RouteClass::Api, DenialKind::Unauthenticated) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        (RouteClass::Api, DenialKind::Forbidden) => {
            errors::json_error(StatusCode::FORBIDDEN, "forbidden", "access denied")
        }
        (RouteClass::Page, DenialKind::Unauthenticated) => Redirect::to("/login").into_response(),
        (RouteClass::Page, DenialKind::Forbidden) => Redirect::to("/dashboard").into_response(),
    }
}

/// Pull the session carrier out of the `Cookie` header, if present.
fn extract_carrier(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn carrier_is_found_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; erp_session=abc123; lang=en");
        assert_eq!(extract_carrier(&headers), Some("abc123"));
    }

    #[test]
    fn missing_cookie_header_yields_none() {
        assert_eq!(extract_carrier(&HeaderMap::new()), None);
    }

    #[test]
    fn unrelated_cookies_yield_none() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert_eq!(extract_carrier(&headers), None);
    }

    #[test]
    fn api_paths_classify_as_api() {
        assert_eq!(request_class("/api/hr/employees"), RouteClass::Api);
        assert_eq!(request_class("/api"), RouteClass::Api);
        assert_eq!(request_class("/hr"), RouteClass::Page);
        assert_eq!(request_class("/apiary"), RouteClass::Page);
    }
}

//! Route authorization engine.
//!
//! One declared table of path-prefix rules gates both browser pages and API
//! endpoints; the request class only changes how a denial is *rendered*
//! (redirect vs structured error), never whether access is granted. The
//! engine is pure: given a path, a class, and a context it produces a
//! decision and nothing else.

use crate::{Module, SecurityContext};

/// How the caller consumes a denial: browser navigation gets redirects,
/// programmatic API calls get structured errors. Chosen by the transport
/// layer from the request, passed in explicitly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteClass {
    Page,
    Api,
}

/// Access requirements for one path prefix. Immutable configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: &'static str,
    pub require_auth: bool,
    pub require_admin: bool,
    pub required_module: Option<Module>,
}

impl RouteRule {
    const fn authed(prefix: &'static str) -> Self {
        Self {
            prefix,
            require_auth: true,
            require_admin: false,
            required_module: None,
        }
    }

    const fn module(prefix: &'static str, module: Module) -> Self {
        Self {
            prefix,
            require_auth: true,
            require_admin: false,
            required_module: Some(module),
        }
    }

    const fn admin(prefix: &'static str) -> Self {
        Self {
            prefix,
            require_auth: true,
            require_admin: true,
            required_module: None,
        }
    }
}

/// Why a matched request was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DenialKind {
    /// No valid session where one is required. API: 401. Page: send to login.
    Unauthenticated,
    /// Authenticated but lacking admin rank or a module grant. API: 403.
    /// Page: send to the default landing page.
    Forbidden,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RouteDenial {
    pub kind: DenialKind,
    pub class: RouteClass,
}

/// Per-request outcome of the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Public path or no declared rule; the request proceeds unchanged.
    Unmatched,
    /// A rule matched and all of its requirements are satisfied.
    Permitted,
    /// A rule matched and was not satisfied.
    Denied(RouteDenial),
}

/// The declared path → access-rule mapping.
///
/// Public paths bypass matching entirely. Overlapping prefixes resolve by
/// longest-prefix-wins, independent of declaration order.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    public_exact: Vec<&'static str>,
    public_prefixes: Vec<&'static str>,
}

impl RouteTable {
    /// The deployed rule set: dashboard and the four module areas, page and
    /// API flavors, plus the admin surface.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                RouteRule::authed("/dashboard"),
                RouteRule::module("/crm", Module::Crm),
                RouteRule::module("/hr", Module::Hr),
                RouteRule::module("/inventory", Module::Inventory),
                RouteRule::module("/sales", Module::Sales),
                RouteRule::admin("/admin"),
                RouteRule::authed("/api/dashboard"),
                RouteRule::module("/api/crm", Module::Crm),
                RouteRule::module("/api/hr", Module::Hr),
                RouteRule::module("/api/inventory", Module::Inventory),
                RouteRule::module("/api/sales", Module::Sales),
                RouteRule::admin("/api/admin"),
            ],
            public_exact: vec![
                "/",
                "/login",
                "/api/auth/login",
                "/api/auth/logout",
                "/api/auth/me",
            ],
            public_prefixes: vec!["/static", "/assets"],
        }
    }

    /// Build a table from explicit rules (tests, alternate deployments).
    pub fn with_rules(rules: Vec<RouteRule>) -> Self {
        Self {
            rules,
            public_exact: Vec::new(),
            public_prefixes: Vec::new(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_exact.iter().any(|p| *p == path)
            || self.public_prefixes.iter().any(|p| prefix_matches(p, path))
    }

    /// Find the governing rule for a path, longest prefix winning.
    pub fn match_rule(&self, path: &str) -> Option<&RouteRule> {
        self.rules
            .iter()
            .filter(|rule| prefix_matches(rule.prefix, path))
            .max_by_key(|rule| rule.prefix.len())
    }

    /// Decide a request. Runs before any handler; side-effect-free.
    pub fn evaluate(&self, path: &str, class: RouteClass, ctx: &SecurityContext) -> RouteDecision {
        if self.is_public(path) {
            return RouteDecision::Unmatched;
        }

        let Some(rule) = self.match_rule(path) else {
            return RouteDecision::Unmatched;
        };

        if rule.require_auth && !ctx.authenticated {
            return RouteDecision::Denied(RouteDenial {
                kind: DenialKind::Unauthenticated,
                class,
            });
        }

        if rule.require_admin && !ctx.is_admin() {
            return RouteDecision::Denied(RouteDenial {
                kind: DenialKind::Forbidden,
                class,
            });
        }

        if let Some(module) = rule.required_module {
            if !ctx.has_module(module) {
                return RouteDecision::Denied(RouteDenial {
                    kind: DenialKind::Forbidden,
                    class,
                });
            }
        }

        RouteDecision::Permitted
    }
}

/// A path matches a prefix if it equals it or continues past a `/` boundary;
/// `/crm-reports` must not match `/crm`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

//! `atlaserp-auth` — authorization and tenancy-isolation core.
//!
//! This crate is intentionally decoupled from HTTP and storage: every check
//! takes the resolved [`SecurityContext`] as an explicit argument, and the
//! only I/O-shaped seam is the [`AccountDirectory`] lookup trait implemented
//! by the account-management collaborator.

pub mod account;
pub mod context;
pub mod credentials;
pub mod error;
pub mod guards;
pub mod module;
pub mod password;
pub mod role;
pub mod routes;
pub mod scope;
pub mod session;

pub use account::{AccountRecord, AccountUpdate, effective_modules};
pub use context::SecurityContext;
pub use credentials::{AccountDirectory, verify_credentials};
pub use error::AuthError;
pub use guards::{require_admin, require_authenticated, require_module};
pub use module::{Module, ModuleGrants};
pub use role::Role;
pub use routes::{RouteClass, RouteDecision, RouteDenial, RouteRule, RouteTable};
pub use scope::TenantScope;
pub use session::{SESSION_COOKIE, SESSION_TTL_SECS, SessionStore};

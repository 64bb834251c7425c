//! `atlaserp-api` — HTTP surface over the authorization core.
//!
//! The route authorization engine runs as router-wide middleware before any
//! handler; handlers re-check with the request guards and scope every data
//! access through [`atlaserp_auth::TenantScope`].

pub mod app;
pub mod middleware;

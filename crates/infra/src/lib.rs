//! `atlaserp-infra` — storage collaborators for the authorization core.
//!
//! In-memory implementations only: the core's contracts are trait-shaped so
//! a persistent backend can replace these without touching auth logic.

pub mod accounts;
pub mod tenant_store;
pub mod tenants;

pub use accounts::InMemoryAccountStore;
pub use tenant_store::{InMemoryTenantStore, TenantStore};
pub use tenants::{InMemoryTenantRegistry, TenantProfile};

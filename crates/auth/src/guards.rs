//! Handler-local request guards.
//!
//! A second enforcement layer inside individual handlers, independent of the
//! route table — and the only layer for any route the table does not cover.
//! Guards take the resolved context as an explicit argument and know nothing
//! about HTTP; failures carry enough to map to a status code upstream.

use crate::{AuthError, Module, SecurityContext};

/// Fail with [`AuthError::Unauthenticated`] unless the context is logged in.
pub fn require_authenticated(ctx: &SecurityContext) -> Result<&SecurityContext, AuthError> {
    if ctx.authenticated {
        Ok(ctx)
    } else {
        Err(AuthError::Unauthenticated)
    }
}

/// Authenticated *and* granted `module`, else [`AuthError::Forbidden`].
pub fn require_module(ctx: &SecurityContext, module: Module) -> Result<&SecurityContext, AuthError> {
    let ctx = require_authenticated(ctx)?;
    if ctx.has_module(module) {
        Ok(ctx)
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Authenticated *and* super-admin, else [`AuthError::Forbidden`].
pub fn require_admin(ctx: &SecurityContext) -> Result<&SecurityContext, AuthError> {
    let ctx = require_authenticated(ctx)?;
    if ctx.is_admin() {
        Ok(ctx)
    } else {
        Err(AuthError::Forbidden)
    }
}

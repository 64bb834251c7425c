use thiserror::Error;

/// Authorization-core error taxonomy.
///
/// These are transport-agnostic: the HTTP layer maps them to status codes
/// (401 for `Unauthenticated`/`InvalidCredentials`, 403 for `Forbidden`).
/// Carrier decode/decrypt failures never appear here — the session store
/// folds them into "no session" before any caller can observe them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Login failed. Deliberately identical for unknown email and wrong
    /// password so callers cannot enumerate accounts.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No valid session (missing, expired, or unreadable carrier).
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated but lacking admin rank or a module grant.
    #[error("access denied")]
    Forbidden,

    /// The configured session secret is too short to derive a key from.
    #[error("session secret must be at least {0} bytes")]
    WeakSessionSecret(usize),

    /// Password hashing failed (malformed parameters, never user input).
    #[error("password hashing failed")]
    Hashing,
}

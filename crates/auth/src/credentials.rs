//! Credential verification (login-time only).

use crate::{AccountRecord, AuthError, SecurityContext, password};

/// Read-only account lookup owned by the account-management collaborator.
///
/// Implementations must only return active accounts; the verifier treats a
/// `None` exactly like a failed password check.
pub trait AccountDirectory: Send + Sync {
    fn find_active_by_email(&self, email: &str) -> Option<AccountRecord>;
}

/// Verify an email/password pair and build the resulting [`SecurityContext`].
///
/// The email is lower-cased before lookup. Unknown email and wrong password
/// fail with the *identical* [`AuthError::InvalidCredentials`] value so the
/// two cases cannot be told apart from outside. The password itself is never
/// logged.
pub fn verify_credentials<D: AccountDirectory + ?Sized>(
    directory: &D,
    email: &str,
    password_input: &str,
) -> Result<SecurityContext, AuthError> {
    let email = email.trim().to_lowercase();

    let Some(account) = directory.find_active_by_email(&email) else {
        tracing::debug!(%email, "login rejected");
        return Err(AuthError::InvalidCredentials);
    };

    if !password::verify_password(&account.password_hash, password_input) {
        tracing::debug!(%email, "login rejected");
        return Err(AuthError::InvalidCredentials);
    }

    tracing::info!(%email, role = %account.role, "login accepted");

    Ok(SecurityContext::authenticated(
        account.id,
        account.email,
        account.display_name,
        account.role,
        account.tenant_id,
        account.modules,
    ))
}

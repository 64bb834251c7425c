//! Client-held session carriers.
//!
//! A carrier is an encrypted, integrity-protected blob handed to the client
//! as a cookie and read back on every request. There is no server-side
//! session table: the carrier *is* the session, logout is an instruction to
//! the client to discard it, and expiry is detected lazily on decode.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::{AuthError, SecurityContext};

/// Cookie name carrying the sealed session.
pub const SESSION_COOKIE: &str = "erp_session";

/// Fixed absolute session lifetime: one week, no sliding renewal.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// What actually gets sealed into the carrier.
#[derive(Debug, Serialize, Deserialize)]
struct CarrierPayload {
    context: SecurityContext,
    expires_at: DateTime<Utc>,
}

/// Issues and reads sealed session carriers.
///
/// The key is process-wide configuration loaded once at startup; rotating it
/// invalidates every outstanding session, which is acceptable.
pub struct SessionStore {
    cipher: ChaCha20Poly1305,
    secure_cookies: bool,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Build a store from the configured secret.
    ///
    /// The secret must be at least 32 bytes; the key is its first 32 bytes.
    pub fn new(secret: &str, secure_cookies: bool) -> Result<Self, AuthError> {
        let bytes = secret.as_bytes();
        if bytes.len() < KEY_LEN {
            return Err(AuthError::WeakSessionSecret(KEY_LEN));
        }

        let key = Key::from_slice(&bytes[..KEY_LEN]);
        Ok(Self {
            cipher: ChaCha20Poly1305::new(key),
            secure_cookies,
        })
    }

    /// Seal a context into a carrier string, expiring one week from now.
    pub fn create(&self, context: &SecurityContext) -> String {
        self.create_at(context, Utc::now())
    }

    /// Read a carrier back into a context.
    ///
    /// Tampering, truncation, malformed encoding, bad payloads, and expiry
    /// all fold into [`SecurityContext::anonymous`] — callers only ever see
    /// "authenticated with context C" or "not authenticated".
    pub fn read(&self, carrier: &str) -> SecurityContext {
        self.read_at(carrier, Utc::now())
    }

    pub(crate) fn create_at(&self, context: &SecurityContext, now: DateTime<Utc>) -> String {
        let payload = CarrierPayload {
            context: context.clone(),
            expires_at: now + Duration::seconds(SESSION_TTL_SECS),
        };

        // Serialization of a plain struct with no map keys cannot fail.
        let plaintext = serde_json::to_vec(&payload).unwrap_or_default();

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let Ok(ciphertext) = self.cipher.encrypt(nonce, plaintext.as_slice()) else {
            // ChaCha20-Poly1305 encryption is infallible for in-memory
            // payloads of this size; fall back to an unreadable carrier.
            return String::new();
        };

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Base64UrlUnpadded::encode_string(&sealed)
    }

    pub(crate) fn read_at(&self, carrier: &str, now: DateTime<Utc>) -> SecurityContext {
        let Ok(sealed) = Base64UrlUnpadded::decode_vec(carrier) else {
            return SecurityContext::anonymous();
        };
        if sealed.len() <= NONCE_LEN {
            return SecurityContext::anonymous();
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let Ok(plaintext) = self.cipher.decrypt(nonce, ciphertext) else {
            tracing::debug!("session carrier failed authentication");
            return SecurityContext::anonymous();
        };

        let Ok(payload) = serde_json::from_slice::<CarrierPayload>(&plaintext) else {
            return SecurityContext::anonymous();
        };

        if now >= payload.expires_at {
            return SecurityContext::anonymous();
        }

        payload.context
    }

    /// `Set-Cookie` value installing a carrier on the client.
    pub fn session_cookie(&self, carrier: &str) -> String {
        format!(
            "{SESSION_COOKIE}={carrier}; Path=/; Max-Age={SESSION_TTL_SECS}; HttpOnly; SameSite=Lax{}",
            self.secure_suffix()
        )
    }

    /// `Set-Cookie` value instructing the client to discard its carrier.
    ///
    /// This is the entirety of logout: with no server-side table there is
    /// nothing else to invalidate.
    pub fn clearing_cookie(&self) -> String {
        format!(
            "{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax{}",
            self.secure_suffix()
        )
    }

    fn secure_suffix(&self) -> &'static str {
        if self.secure_cookies { "; Secure" } else { "" }
    }
}

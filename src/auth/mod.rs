//! Authentication — credentials and per-request signing.
//!
//! ## Security Model
//!
//! - Every request carries a `sig` header of the form
//!   `<authorizerId>.<secret>.<hmacHex>.<base64Time>`. The HMAC is keyed with
//!   the private key and covers the exact request body plus the timestamp.
//! - The secret travels inside the header, so the token must only be sent over
//!   TLS. The SDK never logs it.
//! - [`Credentials`] is validated once at construction and never mutated.
//!   `Debug` output redacts the secret and private key.

pub mod signature;

pub use signature::{Clock, FixedClock, SignatureParts, SignatureToken, Signer, SystemClock};

use crate::error::ConfigError;

// ============================================================================
// Credentials
// ============================================================================

/// The three identity values issued by USF.
#[derive(Clone)]
pub struct Credentials {
    authorizer_id: String,
    secret: String,
    private_key: String,
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// Fails if any value is empty.
    pub fn new(
        authorizer_id: impl Into<String>,
        secret: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let authorizer_id = require("authorizer_id", authorizer_id.into())?;
        let secret = require("secret", secret.into())?;
        let private_key = require("private_key", private_key.into())?;

        Ok(Self {
            authorizer_id,
            secret,
            private_key,
        })
    }

    pub fn authorizer_id(&self) -> &str {
        &self.authorizer_id
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    pub(crate) fn private_key(&self) -> &[u8] {
        self.private_key.as_bytes()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("authorizer_id", &self.authorizer_id)
            .field("secret", &"<redacted>")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

fn require(field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::MissingCredential(field));
    }
    Ok(value)
}

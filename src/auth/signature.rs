//! Request signing — HMAC-SHA256 over the serialized body plus a timestamp.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::auth::Credentials;
use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// Clock
// ============================================================================

/// Source of the millisecond timestamp bound into each signature.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current Unix time in milliseconds.
    fn now_millis(&self) -> Result<u64, AuthError>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Result<u64, AuthError> {
        let millis = Utc::now().timestamp_millis();
        u64::try_from(millis)
            .map_err(|_| AuthError::Signature(format!("system time before UNIX epoch: {millis}")))
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> Result<u64, AuthError> {
        Ok(self.0)
    }
}

// ============================================================================
// Signature token
// ============================================================================

/// The `sig` header value: `<authorizerId>.<secret>.<hmacHex>.<base64Time>`.
///
/// Contains the shared secret. Do not log it.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureToken(String);

impl SignatureToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The four dot-separated segments, in order.
    ///
    /// The authorizer id and secret are split from the left and the time from
    /// the right, so the HMAC segment is always the hex digest.
    pub fn parts(&self) -> Option<SignatureParts<'_>> {
        let (rest, b64_time) = self.0.rsplit_once('.')?;
        let (rest, hmac_hex) = rest.rsplit_once('.')?;
        let (authorizer_id, secret) = rest.split_once('.')?;
        Some(SignatureParts {
            authorizer_id,
            secret,
            hmac_hex,
            b64_time,
        })
    }
}

impl std::fmt::Display for SignatureToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for SignatureToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SignatureToken(<redacted>)")
    }
}

/// Borrowed view of a token's segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureParts<'a> {
    pub authorizer_id: &'a str,
    pub secret: &'a str,
    pub hmac_hex: &'a str,
    pub b64_time: &'a str,
}

// ============================================================================
// Signer
// ============================================================================

/// Produces signature tokens for a fixed set of credentials.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Arc<Credentials>,
    clock: Arc<dyn Clock>,
}

impl Signer {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    pub fn with_clock(credentials: Arc<Credentials>, clock: Arc<dyn Clock>) -> Self {
        Self { credentials, clock }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign any serializable payload at the current time.
    pub fn sign<T: Serialize + ?Sized>(&self, payload: &T) -> Result<SignatureToken, AuthError> {
        let json = to_json(payload)?;
        self.sign_serialized(&json)
    }

    /// Sign an already-serialized JSON payload at the current time.
    ///
    /// The transport signs the exact string it sends as the body.
    pub fn sign_serialized(&self, json: &str) -> Result<SignatureToken, AuthError> {
        let time = self.clock.now_millis()?;
        self.sign_serialized_at(json, time)
    }

    /// Sign a payload at an explicit instant.
    pub fn sign_at<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        time_ms: u64,
    ) -> Result<SignatureToken, AuthError> {
        let json = to_json(payload)?;
        self.sign_serialized_at(&json, time_ms)
    }

    fn sign_serialized_at(&self, json: &str, time_ms: u64) -> Result<SignatureToken, AuthError> {
        let time = time_ms.to_string();

        let mut mac = HmacSha256::new_from_slice(self.credentials.private_key())
            .map_err(|e| AuthError::Signature(e.to_string()))?;
        mac.update(json.as_bytes());
        mac.update(time.as_bytes());
        let hmac_hex = hex::encode(mac.finalize().into_bytes());

        let b64_time = BASE64.encode(time.as_bytes());

        Ok(SignatureToken(format!(
            "{}.{}.{}.{}",
            self.credentials.authorizer_id(),
            self.credentials.secret(),
            hmac_hex,
            b64_time
        )))
    }
}

fn to_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, AuthError> {
    serde_json::to_string(payload).map_err(|e| AuthError::Signature(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TIME: u64 = 1_700_000_000_000;

    fn signer_with_key(key: &str) -> Signer {
        let creds = Credentials::new("auth-1", "s3cret", key).unwrap();
        Signer::with_clock(Arc::new(creds), Arc::new(FixedClock(TIME)))
    }

    fn hmac_of(token: &SignatureToken) -> String {
        token.parts().unwrap().hmac_hex.to_string()
    }

    #[test]
    fn test_sign_known_vector() {
        let signer = signer_with_key("test-private-key");
        let token = signer.sign(&json!(["find", {"x": 1}, null])).unwrap();

        assert_eq!(
            token.as_str(),
            "auth-1.s3cret.007f75e6dabe38251d9986c49b99d0ea63d66e09a0d8dbbc16fe1fa4205aaf2a.MTcwMDAwMDAwMDAwMA=="
        );
    }

    #[test]
    fn test_sign_parts() {
        let signer = signer_with_key("test-private-key");
        let token = signer.sign(&json!(["find", null])).unwrap();
        let parts = token.parts().unwrap();

        assert_eq!(parts.authorizer_id, "auth-1");
        assert_eq!(parts.secret, "s3cret");
        assert_eq!(parts.hmac_hex.len(), 64);
        assert!(parts.hmac_hex.chars().all(|c| c.is_ascii_hexdigit()));
        let decoded = BASE64.decode(parts.b64_time).unwrap();
        assert_eq!(decoded, TIME.to_string().as_bytes());
    }

    #[test]
    fn test_sign_is_deterministic_at_fixed_time() {
        let signer = signer_with_key("k");
        let payload = json!(["create", null, {"sku": "A", "qty": 1}, null]);
        assert_eq!(signer.sign(&payload).unwrap(), signer.sign(&payload).unwrap());
    }

    #[test]
    fn test_sign_changes_with_payload() {
        let signer = signer_with_key("k");
        let a = signer.sign(&json!(["find", {"x": 1}, null])).unwrap();
        let b = signer.sign(&json!(["find", {"x": 2}, null])).unwrap();
        assert_ne!(hmac_of(&a), hmac_of(&b));
    }

    #[test]
    fn test_sign_changes_with_time() {
        let signer = signer_with_key("k");
        let payload = json!(["find", {"x": 1}, null]);
        let a = signer.sign_at(&payload, TIME).unwrap();
        let b = signer.sign_at(&payload, TIME + 1).unwrap();
        assert_ne!(hmac_of(&a), hmac_of(&b));
    }

    #[test]
    fn test_sign_changes_with_key() {
        let payload = json!(["find", {"x": 1}, null]);
        let a = signer_with_key("key-a").sign(&payload).unwrap();
        let b = signer_with_key("key-b").sign(&payload).unwrap();
        assert_ne!(hmac_of(&a), hmac_of(&b));
    }

    #[test]
    fn test_sign_serialized_matches_sign() {
        let signer = signer_with_key("k");
        let payload = json!(["aggregate", [{"$match": {"qty": {"$gt": 0}}}]]);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            signer.sign(&payload).unwrap(),
            signer.sign_serialized(&json).unwrap()
        );
    }

    #[test]
    fn test_parts_with_dotted_secret() {
        let creds = Credentials::new("auth", "se.cret", "k").unwrap();
        let signer = Signer::with_clock(Arc::new(creds), Arc::new(FixedClock(TIME)));
        let token = signer.sign(&json!([])).unwrap();
        let parts = token.parts().unwrap();
        assert_eq!(parts.authorizer_id, "auth");
        assert_eq!(parts.secret, "se.cret");
        assert_eq!(parts.hmac_hex.len(), 64);
    }

    #[test]
    fn test_token_debug_redacts() {
        let token = signer_with_key("k").sign(&json!([])).unwrap();
        assert!(!format!("{:?}", token).contains("s3cret"));
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now_millis().unwrap() > TIME);
    }
}

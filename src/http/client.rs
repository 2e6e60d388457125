//! Low-level transport — `UsfHttp`.
//!
//! One signed POST per call. Classifies the result as success, API-reported
//! failure, or a fatal transport/decode fault. Reconciliation with silent mode
//! happens one layer up.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use crate::auth::{SignatureToken, Signer};
use crate::domain::request::CanonicalRequest;
use crate::error::{AuthError, HttpError, RemoteError, SdkError};

/// Header carrying the signature token.
pub const SIG_HEADER: &str = "sig";

/// Classified result of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// 2xx with a JSON body.
    Success(Value),
    /// Non-2xx; the body normalized to the API error shape.
    Rejected(RemoteError),
}

/// Low-level HTTP client for the USF endpoint.
#[derive(Debug, Clone)]
pub struct UsfHttp {
    base_url: String,
    client: Client,
    signer: Signer,
    extra_headers: HeaderMap,
}

impl UsfHttp {
    pub fn new(base_url: impl Into<String>, client: Client, signer: Signer) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            signer,
            extra_headers: HeaderMap::new(),
        }
    }

    /// Headers added to every request, after `Content-Type` and before `sig`.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers = headers;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Sign and send a canonical request.
    ///
    /// The body is serialized once; that same string is signed and sent.
    pub async fn dispatch(&self, request: &CanonicalRequest) -> Result<Dispatched, SdkError> {
        let body = request.to_json()?;
        let sig = self.signer.sign_serialized(&body)?;
        let operation = request.operation().unwrap_or("unknown");

        let mut headers = self.extra_headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(SIG_HEADER), sig_header_value(&sig)?);

        tracing::debug!(operation, url = %self.base_url, "Sending USF request");
        let resp = self
            .client
            .post(&self.base_url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(operation, "USF request failed: {}", e);
                HttpError::Network(e)
            })?;

        let status = resp.status();
        tracing::debug!(operation, status = status.as_u16(), "USF response received");

        if status.is_success() {
            let bytes = resp.bytes().await.map_err(HttpError::Network)?;
            let value = serde_json::from_slice::<Value>(&bytes)
                .map_err(|e| HttpError::Decode(e.to_string()))?;
            return Ok(Dispatched::Success(value));
        }

        let text = match resp.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                None
            }
        };

        let error = RemoteError::from_body(status.as_u16(), text.as_deref());
        tracing::warn!(
            operation,
            status = status.as_u16(),
            code = error.code(),
            "USF API returned an error"
        );
        Ok(Dispatched::Rejected(error))
    }
}

fn sig_header_value(sig: &SignatureToken) -> Result<HeaderValue, AuthError> {
    let mut value = HeaderValue::from_str(sig.as_str())
        .map_err(|e| AuthError::Signature(format!("token is not a valid header value: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credentials, FixedClock};
    use std::sync::Arc;

    #[test]
    fn test_sig_header_value_is_sensitive() {
        let creds = Credentials::new("auth", "secret", "key").unwrap();
        let signer = Signer::with_clock(Arc::new(creds), Arc::new(FixedClock(1)));
        let sig = signer.sign(&serde_json::json!([])).unwrap();
        let value = sig_header_value(&sig).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), sig.as_str());
    }

    #[test]
    fn test_sig_header_value_rejects_control_chars() {
        let creds = Credentials::new("auth\n", "secret", "key").unwrap();
        let signer = Signer::with_clock(Arc::new(creds), Arc::new(FixedClock(1)));
        let sig = signer.sign(&serde_json::json!([])).unwrap();
        assert!(matches!(
            sig_header_value(&sig),
            Err(AuthError::Signature(_))
        ));
    }
}

//! Unified SDK error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code used when a failed response body is not the structured error shape.
pub const PARSE_ERROR_CODE: &str = "PARSE_ERROR";

/// Code used when a failed response carries no body at all.
pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// An error reported by the USF API. Only raised when silent mode is off.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A successful response that does not fit the caller's declared type.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl SdkError {
    /// The remote error, if this is an API-reported failure.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            SdkError::Remote(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this error came from the transport rather than the API.
    pub fn is_network(&self) -> bool {
        #[cfg(feature = "http")]
        {
            matches!(self, SdkError::Http(HttpError::Network(_)))
        }
        #[cfg(not(feature = "http"))]
        {
            false
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

/// Construction-time errors. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[cfg(feature = "http")]
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Request signing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Failed to generate signature: {0}")]
    Signature(String),
}

/// Transport-layer errors. Never absorbed by silent mode.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// An error reported by the USF API in a non-2xx response.
///
/// Serializes as `{"error":{"message":…,"code":…}}`, the same shape the API
/// sends. In silent mode this is returned as data; otherwise it is raised and
/// its `Display` is exactly the API's message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", .error.message)]
pub struct RemoteError {
    /// HTTP status of the response. Not part of the wire body.
    #[serde(skip)]
    pub status: u16,
    pub error: ErrorDetail,
}

/// The `error` object inside a failed response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
}

impl RemoteError {
    pub fn new(status: u16, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            error: ErrorDetail {
                message: message.into(),
                code: code.into(),
            },
        }
    }

    /// Build from a failed response body.
    ///
    /// Structured bodies are used as-is. A JSON body with an `error.message`
    /// string keeps that message even when `code` is missing or not a string.
    /// Any other text becomes the message with code `PARSE_ERROR`, and an
    /// empty body falls back to `NETWORK_ERROR`.
    pub fn from_body(status: u16, body: Option<&str>) -> Self {
        let text = match body {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Self::new(status, "Failed to fetch", NETWORK_ERROR_CODE),
        };

        if let Ok(mut parsed) = serde_json::from_str::<RemoteError>(text) {
            parsed.status = status;
            return parsed;
        }

        serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|value| lenient_detail(&value))
            .map(|(message, code)| Self::new(status, message, code))
            .unwrap_or_else(|| Self::new(status, text, PARSE_ERROR_CODE))
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }

    pub fn code(&self) -> &str {
        &self.error.code
    }
}

/// `error.message` from a body that does not match [`ErrorDetail`] exactly.
fn lenient_detail(value: &serde_json::Value) -> Option<(String, String)> {
    let message = value.pointer("/error/message")?.as_str()?.to_string();
    let code = match value.pointer("/error/code") {
        Some(serde_json::Value::String(code)) => code.clone(),
        Some(serde_json::Value::Null) | None => PARSE_ERROR_CODE.to_string(),
        Some(other) => other.to_string(),
    };
    Some((message, code))
}

//! High-level client — `UsfClient`, its builder, and result reconciliation.
//!
//! The typed operation methods live on the inventory sub-client
//! (`client.inventory()`); everything funnels through [`UsfClient::dispatch`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{Clock, Credentials, Signer, SystemClock};
use crate::domain::inventory::client::Inventory;
use crate::domain::request::{encode, OperationDescriptor};
use crate::domain::response::{ApiResult, Reply};
use crate::error::{ConfigError, SdkError};
use crate::http::{Dispatched, UsfHttp};

// Re-export sub-client types for convenience.
pub use crate::domain::inventory::client::Inventory as InventoryClient;

/// The primary entry point for the USF SDK.
///
/// Cheap to clone; clones share the connection pool and the immutable
/// credentials. Concurrent calls are fully independent.
#[derive(Debug, Clone)]
pub struct UsfClient {
    pub(crate) http: UsfHttp,
    silent_return: bool,
}

impl UsfClient {
    /// Client with default settings: silent mode on, default endpoint.
    pub fn new(credentials: Credentials) -> Result<Self, SdkError> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> UsfClientBuilder {
        UsfClientBuilder::new(credentials)
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn inventory(&self) -> Inventory<'_> {
        Inventory { client: self }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Whether API-reported errors are returned as [`Reply::Failed`].
    pub fn silent_return(&self) -> bool {
        self.silent_return
    }

    pub fn credentials(&self) -> &Credentials {
        self.http.signer().credentials()
    }

    // ── Core entry points ────────────────────────────────────────────────

    /// Encode, sign, send, and reconcile one operation.
    pub async fn dispatch(&self, descriptor: OperationDescriptor) -> Result<Reply<Value>, SdkError> {
        let request = encode(descriptor);
        let outcome = self.http.dispatch(&request).await?;
        reconcile(outcome, self.silent_return)
    }

    /// [`dispatch`](Self::dispatch), decoding the success body into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        descriptor: OperationDescriptor,
    ) -> Result<Reply<T>, SdkError> {
        self.dispatch(descriptor).await?.decode()
    }

    /// [`dispatch`](Self::dispatch), decoding into the [`ApiResult`] variant
    /// fixed for the operation.
    pub async fn execute(&self, descriptor: OperationDescriptor) -> Result<ApiResult, SdkError> {
        let kind = descriptor.operation.result_kind();
        match self.dispatch(descriptor).await? {
            Reply::Success(body) => ApiResult::from_body(kind, body),
            Reply::Failed(e) => Ok(ApiResult::Error(e)),
        }
    }
}

/// Apply the silent/throwing policy to a transport outcome.
///
/// Only API-reported errors are subject to silent mode. Signature, network,
/// and decode failures never reach here; they are always raised.
pub fn reconcile(outcome: Dispatched, silent_return: bool) -> Result<Reply<Value>, SdkError> {
    match outcome {
        Dispatched::Success(body) => Ok(Reply::Success(body)),
        Dispatched::Rejected(error) if silent_return => {
            tracing::debug!(code = error.code(), "Returning API error as data");
            Ok(Reply::Failed(error))
        }
        Dispatched::Rejected(error) => Err(SdkError::Remote(error)),
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

/// Builder for [`UsfClient`].
#[derive(Debug)]
pub struct UsfClientBuilder {
    credentials: Credentials,
    base_url: String,
    silent_return: bool,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
    http_client: Option<Client>,
    clock: Arc<dyn Clock>,
}

impl UsfClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            silent_return: true,
            timeout: None,
            headers: Vec::new(),
            http_client: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Override the endpoint (used verbatim as the POST target).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Return API-reported errors as data (`true`, default) or raise them.
    pub fn silent_return(mut self, silent: bool) -> Self {
        self.silent_return = silent;
        self
    }

    /// Request timeout. Unset by default.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header to every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Use a pre-built `reqwest::Client`.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Time source for signatures.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<UsfClient, SdkError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in self.headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                ConfigError::InvalidHeader(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| {
                ConfigError::InvalidHeader(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(ConfigError::HttpClient)?
            }
        };

        let signer = Signer::with_clock(Arc::new(self.credentials), self.clock);

        Ok(UsfClient {
            http: UsfHttp::new(self.base_url, client, signer).with_headers(headers),
            silent_return: self.silent_return,
        })
    }
}

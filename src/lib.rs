//! # USF SDK
//!
//! A typed Rust client for the USF inventory API.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Operations, request encoding, response shapes (always available)
//! 2. **Auth** — Credentials + HMAC request signing
//! 3. **HTTP** — `UsfHttp`, one signed POST per call
//! 4. **High-Level Client** — `UsfClient` with silent/throwing error policy and
//!    the `inventory()` sub-client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use usf_sdk::prelude::*;
//! use serde_json::json;
//!
//! let credentials = Credentials::new("authorizer-id", "secret", "private-key")?;
//! let client = UsfClient::new(credentials)?;
//!
//! match client.inventory().find(&json!({"sku": "A-100"}), None).await? {
//!     Reply::Success(items) => println!("{} items", items.len()),
//!     Reply::Failed(e) => println!("API error {}: {}", e.code(), e.message()),
//! }
//! ```
//!
//! With `silent_return(false)` API errors are raised as [`error::SdkError::Remote`]
//! instead of returned. Transport, signing, and decode failures are always raised.

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Operations, request encoding, response shapes, inventory wrappers.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Credentials and request signing.
pub mod auth;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// Signed HTTP transport.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `UsfClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Domain types
    pub use crate::domain::inventory::BulkOperation;
    pub use crate::domain::operation::{Operation, ResultKind, WireRule};
    pub use crate::domain::request::{encode, CanonicalRequest, OperationDescriptor, Options};
    pub use crate::domain::response::{
        ApiResult, BatchOutcome, DeleteOutcome, Document, Items, Reply, UpdateOutcome,
    };

    // Errors
    pub use crate::error::{AuthError, ConfigError, HttpError, RemoteError, SdkError, SdkResult};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Auth
    pub use crate::auth::{Clock, Credentials, FixedClock, SignatureToken, Signer, SystemClock};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{InventoryClient, UsfClient, UsfClientBuilder};
}

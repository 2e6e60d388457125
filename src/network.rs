//! Network URL constants for the USF SDK.

/// Default USF API endpoint. Every operation is a POST to this single URL.
pub const DEFAULT_API_URL: &str = "https://api.usf.dev/v1/inventory";

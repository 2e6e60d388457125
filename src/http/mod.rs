//! HTTP transport layer — `UsfHttp`, one signed POST per call.

pub mod client;

pub use client::{Dispatched, UsfHttp, SIG_HEADER};

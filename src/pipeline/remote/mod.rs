//! Optional remote extraction fallback.
//!
//! The remote service is an AI extractor that returns a JSON record for
//! a document it is better at than the local patterns. Everything here
//! is best-effort: the pipeline must behave identically, minus
//! enrichment, when the service is disabled, down or misbehaving.

pub mod breaker;
pub mod client;
pub mod parse;
pub mod resilient;

pub use breaker::{BreakerState, CircuitBreaker};
pub use client::HttpRemoteExtractor;
pub use resilient::ResilientExtractionClient;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("remote service returned status {status}")]
    Status { status: u16 },

    #[error("remote response was not well-formed JSON")]
    Malformed,
}

/// One attempt against the remote extraction service. Implementations
/// do a single call; retries, timeouts and the circuit breaker live in
/// [`ResilientExtractionClient`].
pub trait RemoteExtractor: Send + Sync {
    fn extract(
        &self,
        text: &str,
        source_file: Option<&str>,
    ) -> impl Future<Output = Result<serde_json::Value, RemoteError>> + Send;
}

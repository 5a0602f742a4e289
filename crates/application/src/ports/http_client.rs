//! HTTP Client port

use async_trait::async_trait;
use ldpcheck_domain::{RequestSpec, ResponseSnapshot};
use thiserror::Error;

/// Transport-level failures.
///
/// HTTP error statuses are never reported through this type: a 4xx or 5xx
/// response is a valid [`ResponseSnapshot`]. Every variant here means the
/// server could not be talked to, which is fatal to a conformance run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that expired.
        timeout_ms: u64,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name could not be resolved.
    #[error("could not resolve {host}: {message}")]
    DnsError {
        /// Target host.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests against the server under test.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failures (connection refused,
    /// DNS failure, timeout, malformed request). Any HTTP status is `Ok`.
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSnapshot, HttpClientError>;
}

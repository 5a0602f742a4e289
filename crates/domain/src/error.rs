//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value is invalid.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// No clause module carries this name.
    #[error("unknown module: {0} (expected post, get, head, delete or all)")]
    UnknownModule(String),

    /// No clause carries this identifier.
    #[error("unknown clause: {0}")]
    UnknownClause(String),

    /// The digest algorithm is not one this suite can compute.
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedDigestAlgorithm(String),

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

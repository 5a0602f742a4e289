//! Application error types

use ldpcheck_domain::DomainError;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Application-level errors. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The server could not be reached or a request timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// The root resource answered, but not with a success status.
    #[error("root not found at {url} (status {status}); is the server running at the root URL?")]
    RootUnavailable {
        /// Root URL that was probed.
        url: String,
        /// Status returned.
        status: u16,
    },
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

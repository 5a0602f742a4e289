//! Request verbs and `Allow` header parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// A request verb.
///
/// The harness only sends GET, POST, HEAD and DELETE. The other variants
/// appear when reading what a server advertises in `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Retrieve a representation.
    #[default]
    Get,
    /// Create a child of a container.
    Post,
    /// Replace a resource.
    Put,
    /// Modify a resource in place.
    Patch,
    /// Remove a resource.
    Delete,
    /// Headers of GET, no payload.
    Head,
    /// Capability discovery.
    Options,
}

impl HttpMethod {
    /// False for HEAD, whose responses never carry a payload.
    #[must_use]
    pub const fn has_response_body(self) -> bool {
        !matches!(self, Self::Head)
    }

    /// Wire token of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(token: &str) -> DomainResult<Self> {
        let token = token.trim();
        [
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Patch,
            Self::Delete,
            Self::Head,
            Self::Options,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(token))
        .ok_or_else(|| DomainError::UnsupportedMethod(token.to_string()))
    }
}

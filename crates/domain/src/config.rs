//! Harness configuration.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Root URL used when none is configured.
pub const DEFAULT_ROOT_URL: &str = "http://127.0.0.1:8080/rest";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

fn default_root_url() -> String {
    DEFAULT_ROOT_URL.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("ldpcheck/{}", env!("CARGO_PKG_VERSION"))
}

/// Settings for one conformance run.
///
/// Every field has a default, so a configuration file only needs the keys
/// it wants to change.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Root URL of the server under test.
    pub root_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// File uploaded as non-RDF content; a built-in payload when absent.
    pub fixture_path: Option<PathBuf>,
    /// Upload non-RDF content as multipart form data instead of a raw body.
    pub multipart_upload: bool,
    /// HTTP basic user name.
    pub username: Option<String>,
    /// HTTP basic password.
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            fixture_path: None,
            multipart_upload: false,
            username: None,
            password: None,
        }
    }
}

impl HarnessConfig {
    /// Checks the configuration and normalises the root URL.
    ///
    /// The root must be an absolute http(s) URL; a trailing slash is removed
    /// so that child URLs can be formed by plain concatenation.
    ///
    /// # Errors
    ///
    /// Returns an error if the root URL or the timeout is invalid, or if a
    /// password is given without a user name.
    pub fn validated(mut self) -> DomainResult<Self> {
        let parsed = Url::parse(self.root_url.trim())
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.root_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "root URL must use http or https: {}",
                self.root_url
            )));
        }
        self.root_url = parsed.as_str().trim_end_matches('/').to_string();

        if self.timeout_ms == 0 {
            return Err(DomainError::InvalidConfig(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(DomainError::InvalidConfig(
                "password given without username".to_string(),
            ));
        }
        Ok(self)
    }

    /// Returns the basic credentials, if configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, Option<&str>)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref()))
    }
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("root_url", &self.root_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("fixture_path", &self.fixture_path)
            .field("multipart_upload", &self.multipart_upload)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

//! What a clause sees of a server reply.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::link::parse_link_headers;
use crate::request::{Headers, HttpMethod};

/// A numeric status, displayed with its reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Wraps a numeric status.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// The numeric status.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.0, 200..=299)
    }

    const fn reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            307 => "Temporary Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            410 => "Gone",
            412 => "Precondition Failed",
            415 => "Unsupported Media Type",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A completed exchange: the request line that caused it and everything
/// the server sent back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSnapshot {
    /// Verb of the request.
    pub method: HttpMethod,
    /// Target of the request.
    pub url: String,
    /// Numeric status.
    pub status: u16,
    /// Headers in arrival order; a name sent twice appears twice.
    pub headers: Headers,
    /// Payload decoded as UTF-8, invalid sequences replaced.
    pub body: String,
    /// Payload as received.
    pub body_bytes: Vec<u8>,
    /// Time from send to last payload byte.
    pub duration: Duration,
}

impl ResponseSnapshot {
    /// Captures a reply. `body` is kept both raw and as lossy text.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        status: impl Into<StatusCode>,
        headers: Headers,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            status: status.into().as_u16(),
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
            body_bytes: body,
            duration,
        }
    }

    /// Status with its reason phrase.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }

    /// 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code().is_success()
    }

    /// First value of `name`, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The `Location` header.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("Location")
    }

    /// Targets of every link relation `rel`, across all `Link` headers.
    #[must_use]
    pub fn link_targets(&self, rel: &str) -> Vec<String> {
        parse_link_headers(self.headers.get_all("Link"))
            .into_iter()
            .filter(|link| link.has_rel(rel))
            .map(|link| link.target)
            .collect()
    }

    /// First target of link relation `rel`.
    #[must_use]
    pub fn link_target(&self, rel: &str) -> Option<String> {
        self.link_targets(rel).into_iter().next()
    }

    /// No payload bytes were received.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn body_is_empty(&self) -> bool {
        self.body_bytes.is_empty()
    }

    /// Elapsed time for log lines: milliseconds under a second, seconds above.
    #[must_use]
    pub fn duration_display(&self) -> String {
        if self.duration < Duration::from_secs(1) {
            format!("{} ms", self.duration.as_millis())
        } else {
            format!("{:.2} s", self.duration.as_secs_f64())
        }
    }
}

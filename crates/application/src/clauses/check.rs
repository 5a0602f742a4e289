//! Assertion helpers shared by the clauses.
//!
//! Each helper either returns what the clause needs next or a
//! [`ClauseError::Failed`] describing what was expected and what was seen.

use ldpcheck_domain::{ResponseSnapshot, StatusCode};

use super::ClauseError;

/// Formats `METHOD url` for failure messages.
fn origin(response: &ResponseSnapshot) -> String {
    format!("{} {}", response.method, response.url)
}

/// Fails unless `condition` holds.
pub fn ensure(condition: bool, reason: impl FnOnce() -> String) -> Result<(), ClauseError> {
    if condition {
        Ok(())
    } else {
        Err(ClauseError::Failed(reason()))
    }
}

/// Fails unless the response has exactly `expected` status.
pub fn expect_status(response: &ResponseSnapshot, expected: u16) -> Result<(), ClauseError> {
    ensure(response.status == expected, || {
        format!(
            "{}: expected {}, got {}",
            origin(response),
            StatusCode::new(expected),
            response.status_code()
        )
    })
}

/// Fails unless the response has a 2xx status.
pub fn expect_success(response: &ResponseSnapshot) -> Result<(), ClauseError> {
    ensure(response.is_success(), || {
        format!(
            "{}: expected a 2xx status, got {}",
            origin(response),
            response.status_code()
        )
    })
}

/// Returns the first value of a header that must be present.
pub fn require_header<'r>(
    response: &'r ResponseSnapshot,
    name: &str,
) -> Result<&'r str, ClauseError> {
    response
        .header(name)
        .ok_or_else(|| ClauseError::Failed(format!("{}: {name} header missing", origin(response))))
}

/// Fails if a header that must be absent is present.
pub fn expect_header_absent(response: &ResponseSnapshot, name: &str) -> Result<(), ClauseError> {
    match response.header(name) {
        None => Ok(()),
        Some(value) => Err(ClauseError::Failed(format!(
            "{}: {name} header must be absent, got {value:?}",
            origin(response)
        ))),
    }
}

/// Returns the target of a link with relation `rel` that must be present.
pub fn require_link(response: &ResponseSnapshot, rel: &str) -> Result<String, ClauseError> {
    response.link_target(rel).ok_or_else(|| {
        let links: Vec<String> = response.headers.get_all("Link").map(str::to_string).collect();
        ClauseError::Failed(format!(
            "{}: no Link with rel=\"{rel}\" (Link headers: {})",
            origin(response),
            if links.is_empty() {
                "none".to_string()
            } else {
                links.join(" | ")
            }
        ))
    })
}

/// Returns true if two URLs name the same resource, ignoring a trailing slash.
#[must_use]
pub fn same_resource(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

//! Resource registry and the cleanup phase that drains it.

use std::collections::BTreeSet;

use ldpcheck_domain::ldp::tombstone_url;
use ldpcheck_domain::{CleanupFailure, CleanupReport, RequestSpec};

use crate::ports::HttpClient;

/// Statuses meaning the resource is gone after a DELETE.
const fn resource_deleted(status: u16) -> bool {
    matches!(status, 200..=299 | 404 | 410)
}

/// Statuses meaning there is no tombstone left after a DELETE on it.
const fn tombstone_purged(status: u16) -> bool {
    matches!(status, 200..=299 | 404 | 405 | 410)
}

/// Server-side resources created during one module.
///
/// Registration is idempotent. Draining deletes every member and its
/// tombstone, then leaves the registry empty, so a second drain sends
/// nothing.
#[derive(Debug, Default, Clone)]
pub struct ResourceRegistry {
    resources: BTreeSet<String>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resources: BTreeSet::new(),
        }
    }

    /// Records a created resource. Returns false if it was already known.
    pub fn register(&mut self, url: impl Into<String>) -> bool {
        self.resources.insert(url.into())
    }

    /// Returns true if `url` is registered.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.resources.contains(url)
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterates over the registered URLs.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(String::as_str)
    }

    /// Deletes every registered resource and its tombstone.
    ///
    /// Resources are visited in reverse lexical order, which puts contained
    /// resources before their containers. Every failure is recorded and
    /// logged; none stops the drain.
    pub async fn drain<C: HttpClient + ?Sized>(&mut self, client: &C) -> CleanupReport {
        let resources = std::mem::take(&mut self.resources);
        let mut report = CleanupReport {
            resources: resources.len(),
            ..CleanupReport::default()
        };

        for url in resources.iter().rev() {
            Self::delete(client, url, resource_deleted, &mut report).await;
            Self::delete(client, &tombstone_url(url), tombstone_purged, &mut report).await;
        }

        if !report.is_clean() {
            tracing::warn!(
                failures = report.failures.len(),
                resources = report.resources,
                "cleanup left resources behind"
            );
        }
        report
    }

    async fn delete<C: HttpClient + ?Sized>(
        client: &C,
        url: &str,
        accept: fn(u16) -> bool,
        report: &mut CleanupReport,
    ) {
        report.requests += 1;
        let reason = match client.execute(&RequestSpec::delete(url)).await {
            Ok(response) if accept(response.status) => return,
            Ok(response) => response.status_code().to_string(),
            Err(e) => e.to_string(),
        };
        tracing::warn!(%url, %reason, "cleanup DELETE failed");
        report.failures.push(CleanupFailure {
            url: url.to_string(),
            reason,
        });
    }
}

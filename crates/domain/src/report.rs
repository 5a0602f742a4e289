//! Aggregated results of a conformance run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clause::{ClauseResult, Module};

/// A resource that could not be removed during cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupFailure {
    /// URL the DELETE was sent to.
    pub url: String,
    /// Status or transport error observed.
    pub reason: String,
}

/// Outcome of draining one module's resource registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Number of registered resources that were drained.
    pub resources: usize,
    /// Number of DELETE requests issued, tombstones included.
    pub requests: usize,
    /// Every deletion that did not succeed.
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// Returns true if every deletion succeeded.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Results of one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleReport {
    /// The module that was run.
    pub module: Module,
    /// Individual clause results, in run order.
    pub results: Vec<ClauseResult>,
    /// What cleanup did afterwards.
    pub cleanup: CleanupReport,
    /// Execution time in milliseconds, cleanup included.
    pub duration_ms: u64,
}

impl ModuleReport {
    /// Number of passed clauses.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// Number of failed clauses.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.failed()).count()
    }

    /// Number of skipped clauses.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.skipped()).count()
    }
}

/// Pass / fail / skip counts across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total number of clauses run or skipped.
    pub total: usize,
    /// Number of passed clauses.
    pub passed: usize,
    /// Number of failed clauses.
    pub failed: usize,
    /// Number of skipped clauses.
    pub skipped: usize,
}

impl Summary {
    /// Get pass rate as percentage of the clauses that were not skipped.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let ran = self.passed + self.failed;
        if ran == 0 {
            100.0
        } else {
            (self.passed as f64 / ran as f64) * 100.0
        }
    }
}

/// Full report of a conformance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Unique identifier of this run.
    pub run_id: Uuid,
    /// Root URL of the server under test.
    pub root_url: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-module results, in run order.
    pub modules: Vec<ModuleReport>,
}

impl ConformanceReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(root_url: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            root_url: root_url.into(),
            started_at,
            modules: Vec::new(),
        }
    }

    /// Appends a module report.
    pub fn push(&mut self, module: ModuleReport) {
        self.modules.push(module);
    }

    /// Iterates over every clause result of every module.
    pub fn results(&self) -> impl Iterator<Item = &ClauseResult> {
        self.modules.iter().flat_map(|m| m.results.iter())
    }

    /// Iterates over the failed clause results.
    pub fn failures(&self) -> impl Iterator<Item = &ClauseResult> {
        self.results().filter(|r| r.failed())
    }

    /// Computes the aggregate counts.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.results().fold(Summary::default(), |mut acc, r| {
            acc.total += 1;
            if r.passed() {
                acc.passed += 1;
            } else if r.failed() {
                acc.failed += 1;
            } else {
                acc.skipped += 1;
            }
            acc
        })
    }

    /// Returns true if no clause failed. Skips do not count as failures.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Number of cleanup failures across all modules.
    #[must_use]
    pub fn cleanup_failures(&self) -> usize {
        self.modules.iter().map(|m| m.cleanup.failures.len()).sum()
    }
}

//! Run conformance use case
//!
//! Drives the selected modules against a server: a root preflight, then each
//! module's clauses in declared order, then that module's cleanup phase.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ldpcheck_domain::ldp::allows;
use ldpcheck_domain::{
    BinaryFixture, ClauseId, ClauseResult, ConformanceReport, HttpMethod, Module, ModuleReport,
    RequestSpec,
};

use crate::clauses::{self, ClauseContext, ClauseError};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Clock, HttpClient, HttpClientError};
use crate::registry::ResourceRegistry;

const SKIP_NO_DELETE: &str = "server does not advertise DELETE in the root Allow header";
const SKIP_FAIL_FAST: &str = "not run: an earlier clause failed and fail-fast is on";

/// Run-wide settings.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root URL of the server, without trailing slash.
    pub root: String,
    /// Upload non-RDF content as multipart form data.
    pub multipart: bool,
    /// Stop running clauses after the first failure.
    pub fail_fast: bool,
}

impl RunOptions {
    /// Creates options for `root` with multipart and fail-fast off.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            multipart: false,
            fail_fast: false,
        }
    }
}

/// Which clauses a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    modules: Vec<Module>,
    clauses: Vec<ClauseId>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

impl Selection {
    /// Every clause of every module.
    #[must_use]
    pub fn all() -> Self {
        Self {
            modules: Module::all().to_vec(),
            clauses: Vec::new(),
        }
    }

    /// Restricts the run to `modules` (all when empty) and, when `clauses`
    /// is not empty, to those clause ids.
    #[must_use]
    pub fn new(modules: Vec<Module>, clauses: Vec<ClauseId>) -> Self {
        let mut modules = if modules.is_empty() {
            Module::all().to_vec()
        } else {
            modules
        };
        modules.sort_unstable();
        modules.dedup();
        Self { modules, clauses }
    }

    /// Returns the selected modules in run order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Returns true if `clause` is part of the run.
    #[must_use]
    pub fn includes(&self, clause: ClauseId) -> bool {
        self.modules.contains(&clause.module())
            && (self.clauses.is_empty() || self.clauses.contains(&clause))
    }

    /// Returns the selected clauses of `module` in declared order.
    pub fn clauses_of(&self, module: Module) -> impl Iterator<Item = ClauseId> + '_ {
        module.clauses().filter(|clause| self.includes(*clause))
    }
}

/// Use case for running the conformance suite.
///
/// # Example
///
/// ```ignore
/// let run = RunConformance::new(Arc::new(ReqwestHttpClient::new(&config)?), SystemClock);
/// let report = run
///     .execute(&RunOptions::new(&config.root_url), &Selection::all(), &fixture)
///     .await?;
/// ```
pub struct RunConformance<C: HttpClient, K: Clock> {
    client: Arc<C>,
    clock: K,
}

impl<C: HttpClient, K: Clock> RunConformance<C, K> {
    /// Creates the use case.
    pub const fn new(client: Arc<C>, clock: K) -> Self {
        Self { client, clock }
    }

    /// Runs the selected clauses and returns the report.
    ///
    /// Clause failures and skips are part of the report. Cleanup of the
    /// running module happens before any error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::RootUnavailable`] when the root does not
    /// answer 2xx, and [`ApplicationError::Http`] when the server becomes
    /// unreachable.
    pub async fn execute(
        &self,
        options: &RunOptions,
        selection: &Selection,
        fixture: &BinaryFixture,
    ) -> ApplicationResult<ConformanceReport> {
        let started_at = self.clock.now();
        let delete_supported = self.preflight(&options.root).await?;

        let mut report = ConformanceReport::new(options.root.as_str(), started_at);
        let mut halted = false;
        for &module in selection.modules() {
            let clauses: Vec<ClauseId> = selection.clauses_of(module).collect();
            if clauses.is_empty() {
                continue;
            }
            let module_report = self
                .run_module(module, &clauses, options, fixture, delete_supported, &mut halted)
                .await?;
            report.push(module_report);
        }

        let summary = report.summary();
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "run finished"
        );
        Ok(report)
    }

    /// GETs the root and reports whether its `Allow` header lists DELETE.
    async fn preflight(&self, root: &str) -> ApplicationResult<bool> {
        let response = self.client.execute(&RequestSpec::get(root)).await?;
        if !response.is_success() {
            return Err(ApplicationError::RootUnavailable {
                url: root.to_string(),
                status: response.status,
            });
        }
        let delete_supported = allows(&response.headers, HttpMethod::Delete);
        tracing::debug!(%root, delete_supported, "root preflight passed");
        Ok(delete_supported)
    }

    async fn run_module(
        &self,
        module: Module,
        clauses: &[ClauseId],
        options: &RunOptions,
        fixture: &BinaryFixture,
        delete_supported: bool,
        halted: &mut bool,
    ) -> ApplicationResult<ModuleReport> {
        let started = Instant::now();
        tracing::info!(%module, section = module.section(), "module started");

        let mut registry = ResourceRegistry::new();
        let mut results = Vec::with_capacity(clauses.len());
        let mut fatal: Option<HttpClientError> = None;

        for &clause in clauses {
            if *halted {
                results.push(ClauseResult::skip(clause, SKIP_FAIL_FAST));
                continue;
            }
            if clause.requires_delete() && !delete_supported {
                tracing::info!(%clause, "skipped: {SKIP_NO_DELETE}");
                results.push(ClauseResult::skip(clause, SKIP_NO_DELETE));
                continue;
            }

            let clause_started = Instant::now();
            let mut ctx = ClauseContext {
                client: self.client.as_ref(),
                registry: &mut registry,
                fixture,
                root: &options.root,
                multipart: options.multipart,
            };
            let outcome = clauses::execute(clause, &mut ctx).await;
            let elapsed = millis(clause_started.elapsed());

            let result = match outcome {
                Ok(()) => ClauseResult::pass(clause),
                Err(ClauseError::Failed(reason)) => ClauseResult::fail(clause, reason),
                Err(ClauseError::Fatal(error)) => {
                    tracing::error!(%clause, %error, "server unreachable, aborting run");
                    fatal = Some(error);
                    break;
                }
            }
            .with_duration_ms(elapsed);

            if result.failed() {
                tracing::warn!(%clause, section = %result.section, outcome = ?result.outcome, "clause failed");
                *halted = options.fail_fast;
            } else {
                tracing::info!(%clause, outcome = result.outcome.label(), "clause finished");
            }
            results.push(result);
        }

        let cleanup = registry.drain(self.client.as_ref()).await;
        if let Some(error) = fatal {
            return Err(error.into());
        }

        let report = ModuleReport {
            module,
            results,
            cleanup,
            duration_ms: millis(started.elapsed()),
        };
        tracing::info!(
            %module,
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "module finished"
        );
        Ok(report)
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use ldpcheck_domain::{Headers, ResponseSnapshot};
    use pretty_assertions::assert_eq;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
                .single()
                .unwrap_or_default()
        }
    }

    /// Answers every request with the same status and headers.
    struct StaticClient {
        status: u16,
        headers: Headers,
    }

    #[async_trait]
    impl HttpClient for StaticClient {
        async fn execute(
            &self,
            request: &RequestSpec,
        ) -> Result<ResponseSnapshot, HttpClientError> {
            Ok(ResponseSnapshot::new(
                request.method,
                request.url.clone(),
                self.status,
                self.headers.clone(),
                Vec::new(),
                Duration::ZERO,
            ))
        }
    }

    struct DownClient;

    #[async_trait]
    impl HttpClient for DownClient {
        async fn execute(&self, _: &RequestSpec) -> Result<ResponseSnapshot, HttpClientError> {
            Err(HttpClientError::ConnectionRefused {
                host: "127.0.0.1".to_string(),
                port: 8080,
            })
        }
    }

    fn run<C: HttpClient>(client: C) -> RunConformance<C, FixedClock> {
        RunConformance::new(Arc::new(client), FixedClock)
    }

    #[test]
    fn test_selection_filters() {
        let selection = Selection::new(vec![Module::Head, Module::Post, Module::Head], vec![]);
        assert_eq!(selection.modules(), &[Module::Post, Module::Head]);
        assert!(selection.includes(ClauseId::HeadNoBody));
        assert!(!selection.includes(ClauseId::WantDigest));

        let selection = Selection::new(vec![], vec![ClauseId::WantDigest]);
        assert_eq!(selection.modules().len(), Module::all().len());
        assert_eq!(
            selection.clauses_of(Module::Get).collect::<Vec<_>>(),
            vec![ClauseId::WantDigest]
        );
        assert_eq!(selection.clauses_of(Module::Post).count(), 0);
    }

    #[tokio::test]
    async fn test_root_not_found_aborts() {
        let result = run(StaticClient {
            status: 404,
            headers: Headers::new(),
        })
        .execute(&RunOptions::new("http://x/rest"), &Selection::all(), &BinaryFixture::builtin())
        .await;

        assert!(matches!(
            result,
            Err(ApplicationError::RootUnavailable { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_fatal() {
        let result = run(DownClient)
            .execute(&RunOptions::new("http://x/rest"), &Selection::all(), &BinaryFixture::builtin())
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Http(HttpClientError::ConnectionRefused { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_module_skipped_without_allow() {
        let selection = Selection::new(vec![Module::Delete], vec![]);
        let report = run(StaticClient {
            status: 200,
            headers: Headers::new().with("Allow", "GET, HEAD, POST"),
        })
        .execute(&RunOptions::new("http://x/rest"), &selection, &BinaryFixture::builtin())
        .await
        .unwrap_or_else(|e| panic!("run failed: {e}"));

        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.skipped, 3);
        assert!(report.all_passed());
        assert_eq!(report.started_at, FixedClock.now());
    }
}

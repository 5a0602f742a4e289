//! Report rendering: human-readable text or deterministic JSON.

use std::fmt;

use ldpcheck_domain::{ClauseOutcome, ConformanceReport, Summary};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

/// Error type for report rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Output format of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text for terminals.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Renders `report` in `format`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(report: &ConformanceReport, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(TextReport(report).to_string()),
        ReportFormat::Json => render_json(report),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a ConformanceReport,
    summary: Summary,
    duration_ms: u64,
}

/// Serializes the report, with its summary, as JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &ConformanceReport) -> Result<String, ReportError> {
    let value = JsonReport {
        report,
        summary: report.summary(),
        duration_ms: total_duration_ms(report),
    };
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

fn total_duration_ms(report: &ConformanceReport) -> u64 {
    report.modules.iter().map(|m| m.duration_ms).sum()
}

/// Plain-text view of a report.
pub struct TextReport<'a>(pub &'a ConformanceReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "LDP conformance of {}", report.root_url)?;
        writeln!(
            f,
            "run {} started {}",
            report.run_id,
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        for module in &report.modules {
            writeln!(f)?;
            writeln!(
                f,
                "{} (section {}): {} passed, {} failed, {} skipped in {} ms",
                module.module,
                module.module.section(),
                module.passed(),
                module.failed(),
                module.skipped(),
                module.duration_ms
            )?;
            for result in &module.results {
                writeln!(
                    f,
                    "  {:<4}  {:<6} {:<28} {}",
                    result.outcome.label(),
                    result.section,
                    result.clause,
                    result.description
                )?;
                match &result.outcome {
                    ClauseOutcome::Passed => {}
                    ClauseOutcome::Failed { reason } | ClauseOutcome::Skipped { reason } => {
                        writeln!(f, "        {reason}")?;
                    }
                }
            }
            let cleanup = &module.cleanup;
            writeln!(
                f,
                "  cleanup: {} resources, {} DELETE requests, {} failures",
                cleanup.resources,
                cleanup.requests,
                cleanup.failures.len()
            )?;
            for failure in &cleanup.failures {
                writeln!(f, "    {}: {}", failure.url, failure.reason)?;
            }
        }

        let failures: Vec<_> = report.failures().collect();
        if !failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures:")?;
            for result in failures {
                writeln!(f, "  [{}] {}: {}", result.section, result.clause, result.description)?;
                if let ClauseOutcome::Failed { reason } = &result.outcome {
                    writeln!(f, "    {reason}")?;
                }
            }
        }

        let summary = report.summary();
        writeln!(f)?;
        writeln!(
            f,
            "{} clauses: {} passed, {} failed, {} skipped ({:.1}% pass rate) in {} ms",
            summary.total,
            summary.passed,
            summary.failed,
            summary.skipped,
            summary.pass_rate(),
            total_duration_ms(report)
        )
    }
}

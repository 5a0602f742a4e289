//! Command-line arguments and how they layer over the configuration file.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use ldpcheck_application::Selection;
use ldpcheck_domain::{ClauseId, DomainResult, HarnessConfig, Module};
use ldpcheck_infrastructure::ReportFormat;

/// Output format of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON document.
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Check an LDP / Fedora server against the POST, GET, HEAD and DELETE
/// requirements of the Fedora API.
#[derive(Debug, Parser)]
#[command(name = "ldpcheck", version)]
pub struct Args {
    /// Root URL of the server under test.
    #[arg(long, env = "LDPCHECK_ROOT", value_name = "URL")]
    pub root: Option<String>,

    /// YAML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// File uploaded as non-RDF content (a built-in payload by default).
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// Module to run: post, get, head, delete or all. Repeatable.
    #[arg(long = "module", value_name = "NAME")]
    pub modules: Vec<String>,

    /// Only run this clause id. Repeatable.
    #[arg(long = "clause", value_name = "ID")]
    pub clauses: Vec<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "LDPCHECK_TIMEOUT_MS", value_name = "N")]
    pub timeout_ms: Option<u64>,

    /// HTTP basic user name.
    #[arg(long, env = "LDPCHECK_USER", value_name = "NAME")]
    pub user: Option<String>,

    /// HTTP basic password.
    #[arg(long, env = "LDPCHECK_PASSWORD", value_name = "PASS", hide_env_values = true)]
    pub password: Option<String>,

    /// Upload non-RDF content as multipart form data.
    #[arg(long)]
    pub multipart: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Stop running clauses after the first failure.
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the clause catalogue and exit.
    #[arg(long)]
    pub list: bool,

    /// More logging on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Layers the flags (and their environment variables) over `base`, then
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged configuration is invalid.
    pub fn apply(&self, mut base: HarnessConfig) -> DomainResult<HarnessConfig> {
        if let Some(root) = &self.root {
            base.root_url.clone_from(root);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            base.timeout_ms = timeout_ms;
        }
        if let Some(fixture) = &self.fixture {
            base.fixture_path = Some(fixture.clone());
        }
        if let Some(user) = &self.user {
            base.username = Some(user.clone());
        }
        if let Some(password) = &self.password {
            base.password = Some(password.clone());
        }
        base.multipart_upload |= self.multipart;
        base.validated()
    }

    /// Builds the clause selection.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown module name or clause id.
    pub fn selection(&self) -> DomainResult<Selection> {
        let mut modules = Vec::new();
        for name in &self.modules {
            if name.trim().eq_ignore_ascii_case("all") {
                modules = Module::all().to_vec();
                break;
            }
            modules.push(name.parse::<Module>()?);
        }
        let clauses = self
            .clauses
            .iter()
            .map(|id| id.parse::<ClauseId>())
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Selection::new(modules, clauses))
    }

    /// Default log filter for the verbosity flags.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// The clause catalogue, one line per clause, grouped by module.
#[must_use]
pub fn catalogue() -> String {
    let mut out = String::new();
    for &module in Module::all() {
        let _ = writeln!(out, "{module} (section {})", module.section());
        for clause in module.clauses() {
            let _ = writeln!(
                out,
                "  {:<6} {:<28} {}",
                clause.section(),
                clause,
                clause.description()
            );
        }
    }
    out
}

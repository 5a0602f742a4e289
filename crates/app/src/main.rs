//! ldpcheck - Main Entry Point
//!
//! Loads the configuration, runs the selected clauses against the server
//! and prints the report on stdout. Exit status: 0 when no clause failed,
//! 1 when any clause failed, 2 when the run could not complete.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ldpcheck_application::{RunConformance, RunOptions};
use ldpcheck_domain::HarnessConfig;
use ldpcheck_infrastructure::{
    ReqwestHttpClient, SystemClock, load_config, render, resolve_fixture,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.list {
        print!("{}", cli::catalogue());
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            tracing::error!(%error, "run aborted");
            eprintln!("ldpcheck: {error}");
            ExitCode::from(2)
        }
    }
}

/// Runs the suite and prints the report. Returns true if no clause failed.
async fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => load_config(path).await?,
        None => HarnessConfig::default(),
    };
    let config = args.apply(base)?;
    let selection = args.selection()?;
    let fixture = resolve_fixture(config.fixture_path.as_deref()).await?;

    tracing::info!(
        root = %config.root_url,
        fixture = %fixture.file_name,
        bytes = fixture.bytes.len(),
        "starting conformance run v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(ReqwestHttpClient::new(&config)?);
    let options = RunOptions {
        root: config.root_url.clone(),
        multipart: config.multipart_upload,
        fail_fast: args.fail_fast,
    };
    let report = RunConformance::new(client, SystemClock::new())
        .execute(&options, &selection, &fixture)
        .await?;

    print!("{}", render(&report, args.format.into())?);
    Ok(report.all_passed())
}

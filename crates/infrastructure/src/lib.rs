//! ldpcheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the file formats the
//! command line reads and writes.

pub mod adapters;
pub mod config;
pub mod fixture;
pub mod report;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ConfigError, load_config, parse_config};
pub use fixture::{FixtureError, load_fixture, resolve_fixture};
pub use report::{ReportError, ReportFormat, TextReport, render, render_json};

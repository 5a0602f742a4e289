//! ldpcheck Domain - Core types
//!
//! This crate defines the domain model of the LDP conformance suite:
//! requests and response snapshots, the header grammars the clauses assert
//! on, the clause catalogue, and run reports.
//! All types here are pure Rust with no I/O dependencies.

pub mod clause;
pub mod config;
pub mod digest;
pub mod error;
pub mod fixture;
pub mod ldp;
pub mod report;
pub mod request;
pub mod response;

pub use clause::{ClauseId, ClauseOutcome, ClauseResult, Module};
pub use config::HarnessConfig;
pub use digest::{DigestAlgorithm, DigestValue, parse_digest_header};
pub use error::{DomainError, DomainResult};
pub use fixture::BinaryFixture;
pub use report::{CleanupFailure, CleanupReport, ConformanceReport, ModuleReport, Summary};
pub use request::{Header, Headers, HttpMethod, RequestBody, RequestSpec};
pub use response::{Link, ResponseSnapshot, StatusCode};

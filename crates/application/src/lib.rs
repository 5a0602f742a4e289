//! ldpcheck Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The clause implementations and the resource registry they feed
//! - The conformance run use case
//! - Application-level error handling

pub mod clauses;
pub mod error;
pub mod ports;
pub mod registry;
pub mod use_cases;

pub use clauses::{ClauseContext, ClauseError};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, HttpClient, HttpClientError};
pub use registry::ResourceRegistry;
pub use use_cases::{RunConformance, RunOptions, Selection};

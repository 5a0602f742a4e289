//! Application use cases (business logic orchestration).

mod run_conformance;

pub use run_conformance::*;

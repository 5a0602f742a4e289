//! Clock port

use chrono::{DateTime, Utc};

/// Port for reading wall-clock time.
///
/// Run reports are stamped through this port so tests can pin the start
/// time of a run.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

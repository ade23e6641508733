//! Clock port.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Business timestamps are derived from this in the shop's fixed `+09:00`
/// offset; tests substitute a frozen clock so ledger contents and archive
/// cutoffs are reproducible.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

//! Current-instant source for temporal classification.
//!
//! # Responsibility
//! - Abstract "now" behind a trait so past/future decisions are injectable.
//! - Provide the wall-clock implementation used outside tests.
//!
//! # Invariants
//! - Ledger operations sample `now()` exactly once at entry and reuse that
//!   instant for every comparison within the operation.

use chrono::{DateTime, Utc};

/// Source of the current instant used to classify meetings.
pub trait Clock {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// System wall-clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

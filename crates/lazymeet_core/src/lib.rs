//! Core domain logic for LazyMeet.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, ContactValidationError};
pub use model::meeting::{
    Meeting, MeetingId, MeetingKind, MeetingValidationError, PastMeeting,
};
pub use model::state::{LedgerState, StateValidationError};
pub use service::ledger::{
    LedgerError, LedgerErrorClass, LedgerResult, LedgerService,
};
pub use store::{JsonSnapshotStore, StateStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use lazymeet_core::{Clock, LedgerService, LedgerState, StateStore, StoreResult};
use std::cell::Cell;
use std::rc::Rc;

/// Deterministic clock shared between a test and the ledger under test.
///
/// Cloning shares the underlying instant, so advancing the test's handle
/// moves the ledger's "now" too.
#[derive(Clone)]
pub struct FixedClock {
    instant: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Rc::new(Cell::new(instant)),
        }
    }

    pub fn advance(&self, delta: Duration) {
        self.instant.set(self.instant.get() + delta);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.instant.set(instant);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant.get()
    }
}

/// Store that loads nothing and drops every save.
///
/// Used by tests that exercise ledger behavior without touching disk.
pub struct InertStore;

impl StateStore for InertStore {
    fn load(&self) -> StoreResult<Option<LedgerState>> {
        Ok(None)
    }

    fn save(&self, _state: &LedgerState) -> StoreResult<()> {
        Ok(())
    }
}

/// Base "now" shared by the temporal tests.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// Empty ledger pinned to `now`, plus the clock handle steering it.
pub fn ledger_at(now: DateTime<Utc>) -> (LedgerService<InertStore, FixedClock>, FixedClock) {
    let clock = FixedClock::at(now);
    let ledger = LedgerService::with_parts(InertStore, clock.clone());
    (ledger, clock)
}

//! Persistence layer for the ledger artifact.
//!
//! # Responsibility
//! - Define the state store contract the ledger saves through.
//! - Isolate file and codec details from service orchestration.
//!
//! # Invariants
//! - `load` must re-validate restored state instead of masking corruption.
//! - Store APIs surface typed errors; the swallow-on-failure policy lives
//!   at the ledger boundary, not here.

use crate::model::state::StateValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod snapshot;

pub use snapshot::{JsonSnapshotStore, StateStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised while loading or saving the persistence artifact.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidState(StateValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "artifact does not parse: {err}"),
            Self::InvalidState(err) => write!(f, "artifact state is invalid: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidState(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<StateValidationError> for StoreError {
    fn from(value: StateValidationError) -> Self {
        Self::InvalidState(value)
    }
}

//! Persisted ledger state.
//!
//! # Responsibility
//! - Hold the full logical state the persistence artifact round-trips.
//! - Re-validate restored state before the ledger accepts it.
//!
//! # Invariants
//! - Field order matches the artifact's logical order: contact set,
//!   meeting list, next-meeting-id, next-contact-id.
//! - Both counters start at 1 and stay strictly above every allocated id.
//! - Counters are persisted verbatim, never re-derived from collection
//!   sizes.

use crate::model::contact::{Contact, ContactId, ContactValidationError};
use crate::model::meeting::{Meeting, MeetingId, MeetingValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Violation found while validating a restored [`LedgerState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValidationError {
    /// A stored contact fails its own invariants.
    Contact {
        id: ContactId,
        source: ContactValidationError,
    },
    /// A stored meeting fails its own invariants.
    Meeting {
        id: MeetingId,
        source: MeetingValidationError,
    },
    /// A contact is filed under a key different from its own id.
    MismatchedContactKey { key: ContactId, id: ContactId },
    /// Two stored meetings share an id.
    DuplicateMeetingId(MeetingId),
    /// A meeting refers to a contact the state does not contain.
    UnknownAttendee {
        meeting: MeetingId,
        contact: ContactId,
    },
    /// A counter is zero; ids are allocated from 1.
    NonPositiveCounter(&'static str),
    /// The contact counter does not exceed an allocated contact id.
    ContactCounterBehind { next: ContactId, allocated: ContactId },
    /// The meeting counter does not exceed an allocated meeting id.
    MeetingCounterBehind { next: MeetingId, allocated: MeetingId },
}

impl Display for StateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contact { id, source } => {
                write!(f, "contact {id} is invalid: {source}")
            }
            Self::Meeting { id, source } => {
                write!(f, "meeting {id} is invalid: {source}")
            }
            Self::MismatchedContactKey { key, id } => {
                write!(f, "contact {id} is filed under key {key}")
            }
            Self::DuplicateMeetingId(id) => {
                write!(f, "meeting id {id} occurs more than once")
            }
            Self::UnknownAttendee { meeting, contact } => {
                write!(f, "meeting {meeting} refers to unknown contact {contact}")
            }
            Self::NonPositiveCounter(which) => {
                write!(f, "{which} counter must be positive")
            }
            Self::ContactCounterBehind { next, allocated } => {
                write!(
                    f,
                    "next contact id {next} does not exceed allocated id {allocated}"
                )
            }
            Self::MeetingCounterBehind { next, allocated } => {
                write!(
                    f,
                    "next meeting id {next} does not exceed allocated id {allocated}"
                )
            }
        }
    }
}

impl Error for StateValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Contact { source, .. } => Some(source),
            Self::Meeting { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Full logical state of the ledger.
///
/// Plain data holder: mutation happens in the ledger service, persistence
/// in the store. Stored meeting order is creation order, which keeps ids
/// ascending because conversion happens in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Contact set, keyed and therefore iterated by id.
    pub contacts: BTreeMap<ContactId, Contact>,
    /// Meeting list in creation order.
    pub meetings: Vec<Meeting>,
    /// Next meeting id to allocate.
    pub next_meeting_id: MeetingId,
    /// Next contact id to allocate.
    pub next_contact_id: ContactId,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            contacts: BTreeMap::new(),
            meetings: Vec::new(),
            next_meeting_id: 1,
            next_contact_id: 1,
        }
    }
}

impl LedgerState {
    /// Checks the cross-entity invariants of a restored state.
    ///
    /// Deserialization bypasses every constructor, so nothing about a parsed
    /// artifact can be trusted until this passes. Restore treats any
    /// violation the same as an unparseable artifact.
    pub fn validate(&self) -> Result<(), StateValidationError> {
        if self.next_contact_id == 0 {
            return Err(StateValidationError::NonPositiveCounter("contact"));
        }
        if self.next_meeting_id == 0 {
            return Err(StateValidationError::NonPositiveCounter("meeting"));
        }
        for (key, contact) in &self.contacts {
            contact
                .validate()
                .map_err(|source| StateValidationError::Contact {
                    id: contact.id(),
                    source,
                })?;
            if *key != contact.id() {
                return Err(StateValidationError::MismatchedContactKey {
                    key: *key,
                    id: contact.id(),
                });
            }
            if contact.id() >= self.next_contact_id {
                return Err(StateValidationError::ContactCounterBehind {
                    next: self.next_contact_id,
                    allocated: contact.id(),
                });
            }
        }
        let mut seen_ids = BTreeSet::new();
        for meeting in &self.meetings {
            meeting
                .validate()
                .map_err(|source| StateValidationError::Meeting {
                    id: meeting.id(),
                    source,
                })?;
            if !seen_ids.insert(meeting.id()) {
                return Err(StateValidationError::DuplicateMeetingId(meeting.id()));
            }
            if meeting.id() >= self.next_meeting_id {
                return Err(StateValidationError::MeetingCounterBehind {
                    next: self.next_meeting_id,
                    allocated: meeting.id(),
                });
            }
            for attendee in meeting.attendees() {
                if !self.contacts.contains_key(attendee) {
                    return Err(StateValidationError::UnknownAttendee {
                        meeting: meeting.id(),
                        contact: *attendee,
                    });
                }
            }
        }
        Ok(())
    }
}

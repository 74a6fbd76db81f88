//! Meeting domain model.
//!
//! # Responsibility
//! - Define the stored meeting record and its two variants.
//! - Provide the notes log and the Future -> Past record conversion.
//!
//! # Invariants
//! - `id` is stable and never reused for another meeting.
//! - `attendees` is non-empty and immutable after construction.
//! - `kind` records whether notes are attached; it is never consulted for
//!   temporal classification, which is always derived from `date` and a
//!   freshly sampled "now".

use crate::model::contact::ContactId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ledger-allocated meeting identifier. Zero is never valid.
pub type MeetingId = u32;

/// Validation error for meeting construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingValidationError {
    /// Meeting id must be positive.
    NonPositiveId,
    /// Meetings must have at least one attendee.
    NoAttendees,
}

impl Display for MeetingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "meeting id must be positive"),
            Self::NoAttendees => write!(f, "meeting must have at least one attendee"),
        }
    }
}

impl Error for MeetingValidationError {}

/// Stored-record variant of a meeting.
///
/// `Future` carries no extra state; `Past` adds the append-only notes log.
/// The variant says whether notes have been attached, nothing more: a
/// `Future` record whose date has elapsed is still temporally past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingKind {
    /// No notes recorded.
    Future,
    /// Notes recorded, in append order.
    Past { notes: Vec<String> },
}

/// A scheduled event linking a date to a set of contacts.
///
/// Identity (`id`, `date`, `attendees`) is immutable after construction.
/// The only state transition is `Future` -> `Past` via [`Meeting::append_note`],
/// which keeps the record in place under the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    id: MeetingId,
    date: DateTime<Utc>,
    attendees: BTreeSet<ContactId>,
    kind: MeetingKind,
}

impl Meeting {
    /// Creates a record with no notes attached.
    pub fn future(
        id: MeetingId,
        date: DateTime<Utc>,
        attendees: BTreeSet<ContactId>,
    ) -> Result<Self, MeetingValidationError> {
        let meeting = Self {
            id,
            date,
            attendees,
            kind: MeetingKind::Future,
        };
        meeting.validate()?;
        Ok(meeting)
    }

    /// Creates a record whose notes log starts with one entry.
    pub fn past(
        id: MeetingId,
        date: DateTime<Utc>,
        attendees: BTreeSet<ContactId>,
        initial_note: impl Into<String>,
    ) -> Result<Self, MeetingValidationError> {
        let mut meeting = Self::future(id, date, attendees)?;
        meeting.append_note(initial_note);
        Ok(meeting)
    }

    /// Stable ledger id.
    pub fn id(&self) -> MeetingId {
        self.id
    }

    /// Scheduled instant.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Contact ids attending this meeting.
    pub fn attendees(&self) -> &BTreeSet<ContactId> {
        &self.attendees
    }

    /// Stored-record variant (notes attached or not).
    pub fn kind(&self) -> &MeetingKind {
        &self.kind
    }

    /// Whether the given contact is in the attendee set.
    pub fn is_attended_by(&self, contact: ContactId) -> bool {
        self.attendees.contains(&contact)
    }

    /// All notes joined by newlines; empty string for a `Future` record.
    pub fn notes_joined(&self) -> String {
        match &self.kind {
            MeetingKind::Future => String::new(),
            MeetingKind::Past { notes } => notes.join("\n"),
        }
    }

    /// Appends one note entry, converting a `Future` record to `Past`.
    ///
    /// Identity and list position are untouched; the record transitions in
    /// place. The ledger gates this on the date having elapsed.
    pub fn append_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        match &mut self.kind {
            MeetingKind::Future => {
                self.kind = MeetingKind::Past { notes: vec![note] };
            }
            MeetingKind::Past { notes } => notes.push(note),
        }
    }

    /// Duplicate rule for list queries.
    ///
    /// Two records are duplicates exactly when their attendee sets are equal
    /// and their dates are the same instant. Ids do not differentiate.
    pub fn is_duplicate_of(&self, other: &Meeting) -> bool {
        self.date == other.date && self.attendees == other.attendees
    }

    /// Re-checks construction invariants.
    ///
    /// Used on restored values, where deserialization bypasses the
    /// constructors.
    pub fn validate(&self) -> Result<(), MeetingValidationError> {
        if self.id == 0 {
            return Err(MeetingValidationError::NonPositiveId);
        }
        if self.attendees.is_empty() {
            return Err(MeetingValidationError::NoAttendees);
        }
        Ok(())
    }
}

/// Past-view read model returned by the past-facing queries.
///
/// Built from any stored record whose date has elapsed, whatever its stored
/// variant; an elapsed record with no notes yet reads as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastMeeting {
    /// Stable ledger id of the underlying record.
    pub id: MeetingId,
    /// Scheduled instant.
    pub date: DateTime<Utc>,
    /// Contact ids that attended.
    pub attendees: BTreeSet<ContactId>,
    /// Newline-joined notes log; empty when nothing is recorded yet.
    pub notes: String,
}

impl From<&Meeting> for PastMeeting {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: meeting.id,
            date: meeting.date,
            attendees: meeting.attendees.clone(),
            notes: meeting.notes_joined(),
        }
    }
}

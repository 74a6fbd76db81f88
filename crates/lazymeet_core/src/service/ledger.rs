//! Ledger use-case service.
//!
//! # Responsibility
//! - Provide the record-manager API: contact and meeting creation, lookup,
//!   list queries, note appends and the flush/restore round-trip.
//! - Allocate contact and meeting ids from explicit counters.
//! - Classify meetings as past or future against a freshly sampled "now".
//!
//! # Invariants
//! - A failed operation never allocates an id and never leaves a partially
//!   constructed entity visible.
//! - Temporal classification always compares the stored date to "now"
//!   sampled at call entry; the stored record tag is never trusted.
//! - List queries sort ascending by `(date, id)` and collapse duplicates
//!   (equal attendee sets at the same instant), keeping the lowest id.
//! - Persistence failures are logged and swallowed, never surfaced.

use crate::clock::{Clock, SystemClock};
use crate::model::contact::{Contact, ContactId, ContactValidationError};
use crate::model::meeting::{Meeting, MeetingId, MeetingValidationError, PastMeeting};
use crate::model::state::LedgerState;
use crate::store::{JsonSnapshotStore, StateStore};
use chrono::{DateTime, Utc};
use log::{error, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Contract classification of a ledger failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerErrorClass {
    /// A parameter violates a business rule.
    InvalidArgument,
    /// The entity exists but its temporal classification is incompatible
    /// with the requested view.
    IllegalState,
}

/// Validation error raised by ledger operations.
#[derive(Debug)]
pub enum LedgerError {
    /// Contact name must be non-empty.
    EmptyName,
    /// Notes text must be non-empty.
    EmptyNotes,
    /// At least one contact id must be requested.
    NoIdsRequested,
    /// Meetings require at least one attendee.
    NoAttendees,
    /// A referenced contact is not in the ledger.
    UnknownContact(ContactId),
    /// No meeting carries the given id.
    UnknownMeeting(MeetingId),
    /// The date must be strictly after the sampled "now".
    DateNotInFuture(DateTime<Utc>),
    /// The date must be strictly before the sampled "now".
    DateNotInPast(DateTime<Utc>),
    /// The meeting's date has already elapsed.
    MeetingAlreadyHeld(MeetingId),
    /// The meeting's date is still ahead of "now".
    MeetingStillUpcoming(MeetingId),
    /// Contact-level invariant violation.
    Contact(ContactValidationError),
    /// Meeting-level invariant violation.
    Meeting(MeetingValidationError),
}

impl LedgerError {
    /// Maps this failure onto the two-way contract split between rejected
    /// input and incompatible entity state.
    pub fn class(&self) -> LedgerErrorClass {
        match self {
            Self::MeetingStillUpcoming(_) => LedgerErrorClass::IllegalState,
            _ => LedgerErrorClass::InvalidArgument,
        }
    }
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name must not be empty"),
            Self::EmptyNotes => write!(f, "notes must not be empty"),
            Self::NoIdsRequested => write!(f, "at least one contact id must be requested"),
            Self::NoAttendees => write!(f, "meeting must have at least one attendee"),
            Self::UnknownContact(id) => write!(f, "unknown contact: {id}"),
            Self::UnknownMeeting(id) => write!(f, "unknown meeting: {id}"),
            Self::DateNotInFuture(date) => write!(f, "date {date} is not in the future"),
            Self::DateNotInPast(date) => write!(f, "date {date} is not in the past"),
            Self::MeetingAlreadyHeld(id) => write!(f, "meeting {id} has already been held"),
            Self::MeetingStillUpcoming(id) => {
                write!(f, "meeting {id} has not taken place yet")
            }
            Self::Contact(err) => write!(f, "{err}"),
            Self::Meeting(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Contact(err) => Some(err),
            Self::Meeting(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for LedgerError {
    fn from(value: ContactValidationError) -> Self {
        Self::Contact(value)
    }
}

impl From<MeetingValidationError> for LedgerError {
    fn from(value: MeetingValidationError) -> Self {
        Self::Meeting(value)
    }
}

/// Record-manager facade over a state store and a clock.
///
/// Owns the full in-memory state; every mutation goes through its methods.
/// Single logical owner, no interior synchronization.
pub struct LedgerService<S: StateStore, C: Clock> {
    state: LedgerState,
    store: S,
    clock: C,
}

impl LedgerService<JsonSnapshotStore, SystemClock> {
    /// Opens a ledger backed by the JSON artifact at `path`.
    ///
    /// A missing or unusable artifact starts an empty ledger; persistence
    /// problems never keep the ledger from opening.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_parts(JsonSnapshotStore::new(path), SystemClock)
    }
}

impl<S: StateStore, C: Clock> LedgerService<S, C> {
    /// Creates a ledger from explicit store and clock implementations.
    ///
    /// Restores persisted state through the store; a load failure falls
    /// back to an empty ledger.
    pub fn with_parts(store: S, clock: C) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => LedgerState::default(),
            Err(err) => {
                warn!(
                    "event=ledger_restore module=service status=error error_code=restore_failed fallback=empty error={err}"
                );
                LedgerState::default()
            }
        };
        Self {
            state,
            store,
            clock,
        }
    }

    /// Adds a contact with one initial note entry and returns its id.
    ///
    /// Duplicate names are permitted and receive distinct ids.
    pub fn add_contact(
        &mut self,
        name: impl Into<String>,
        notes: impl Into<String>,
    ) -> LedgerResult<ContactId> {
        let name = name.into();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let notes = notes.into();
        if notes.is_empty() {
            return Err(LedgerError::EmptyNotes);
        }

        let id = self.state.next_contact_id;
        let contact = Contact::with_initial_note(id, name, notes)?;
        self.state.contacts.insert(id, contact);
        self.state.next_contact_id += 1;
        Ok(id)
    }

    /// Appends one note entry to an existing contact.
    pub fn add_contact_note(
        &mut self,
        id: ContactId,
        note: impl Into<String>,
    ) -> LedgerResult<()> {
        let contact = self
            .state
            .contacts
            .get_mut(&id)
            .ok_or(LedgerError::UnknownContact(id))?;
        let note = note.into();
        if note.is_empty() {
            return Err(LedgerError::EmptyNotes);
        }
        contact.add_note(note)?;
        Ok(())
    }

    /// Contacts whose name contains `fragment`; an empty fragment matches
    /// every contact.
    ///
    /// Matching is case- and whitespace-sensitive. The result is a snapshot
    /// sorted ascending by id; mutating it does not touch ledger state.
    pub fn contacts_by_name(&self, fragment: &str) -> Vec<Contact> {
        self.state
            .contacts
            .values()
            .filter(|contact| contact.name().contains(fragment))
            .cloned()
            .collect()
    }

    /// Resolves a set of contact ids, all or nothing.
    ///
    /// Requested ids are deduplicated first; any id that does not resolve
    /// fails the whole call with no partial result. Success returns the
    /// contacts sorted ascending by id.
    pub fn contacts_by_ids(&self, ids: &[ContactId]) -> LedgerResult<Vec<Contact>> {
        if ids.is_empty() {
            return Err(LedgerError::NoIdsRequested);
        }
        let unique: BTreeSet<ContactId> = ids.iter().copied().collect();
        let mut found = Vec::with_capacity(unique.len());
        for id in unique {
            let contact = self
                .state
                .contacts
                .get(&id)
                .ok_or(LedgerError::UnknownContact(id))?;
            found.push(contact.clone());
        }
        Ok(found)
    }

    /// Schedules a meeting strictly after "now" and returns its id.
    pub fn add_future_meeting(
        &mut self,
        attendees: &BTreeSet<ContactId>,
        date: DateTime<Utc>,
    ) -> LedgerResult<MeetingId> {
        let now = self.clock.now();
        if date <= now {
            return Err(LedgerError::DateNotInFuture(date));
        }
        self.check_attendees(attendees)?;

        let id = self.state.next_meeting_id;
        let meeting = Meeting::future(id, date, attendees.clone())?;
        self.state.meetings.push(meeting);
        self.state.next_meeting_id += 1;
        Ok(id)
    }

    /// Records a meeting that already took place, with its first note entry.
    pub fn add_past_meeting(
        &mut self,
        attendees: &BTreeSet<ContactId>,
        date: DateTime<Utc>,
        notes: impl Into<String>,
    ) -> LedgerResult<()> {
        let now = self.clock.now();
        if date >= now {
            return Err(LedgerError::DateNotInPast(date));
        }
        let notes = notes.into();
        if notes.is_empty() {
            return Err(LedgerError::EmptyNotes);
        }
        self.check_attendees(attendees)?;

        let id = self.state.next_meeting_id;
        let meeting = Meeting::past(id, date, attendees.clone(), notes)?;
        self.state.meetings.push(meeting);
        self.state.next_meeting_id += 1;
        Ok(())
    }

    /// The stored meeting with this id, whatever its classification.
    pub fn get_meeting(&self, id: MeetingId) -> Option<Meeting> {
        self.find_meeting(id).cloned()
    }

    /// The meeting with this id, provided its date is still ahead of a
    /// freshly sampled "now".
    ///
    /// The stored record tag is not consulted; a once-future meeting whose
    /// date has elapsed is rejected. `Ok(None)` when no meeting carries
    /// the id.
    pub fn get_future_meeting(&self, id: MeetingId) -> LedgerResult<Option<Meeting>> {
        let now = self.clock.now();
        match self.find_meeting(id) {
            None => Ok(None),
            Some(meeting) if meeting.date() <= now => Err(LedgerError::MeetingAlreadyHeld(id)),
            Some(meeting) => Ok(Some(meeting.clone())),
        }
    }

    /// The past view of the meeting with this id.
    ///
    /// An elapsed record still stored as future is returned with empty
    /// notes. `Ok(None)` when no meeting carries the id.
    pub fn get_past_meeting(&self, id: MeetingId) -> LedgerResult<Option<PastMeeting>> {
        let now = self.clock.now();
        match self.find_meeting(id) {
            None => Ok(None),
            Some(meeting) if meeting.date() > now => Err(LedgerError::MeetingStillUpcoming(id)),
            Some(meeting) => Ok(Some(PastMeeting::from(meeting))),
        }
    }

    /// Appends one note entry to a held meeting.
    ///
    /// Converts a future-typed stored record to past in place under the
    /// same id, date and attendees; this is the only conversion path and
    /// the only notes mutation path. `text` may be empty here: only
    /// creation demands non-empty notes.
    pub fn add_meeting_notes(
        &mut self,
        id: MeetingId,
        text: impl Into<String>,
    ) -> LedgerResult<()> {
        let now = self.clock.now();
        let meeting = self
            .state
            .meetings
            .iter_mut()
            .find(|meeting| meeting.id() == id)
            .ok_or(LedgerError::UnknownMeeting(id))?;
        if meeting.date() > now {
            return Err(LedgerError::MeetingStillUpcoming(id));
        }
        meeting.append_note(text.into());
        Ok(())
    }

    /// Upcoming meetings attended by the given contact.
    ///
    /// Classification is live against a freshly sampled "now"; the result
    /// is deduplicated and sorted. Empty when none match.
    pub fn future_meetings_for(&self, contact: ContactId) -> LedgerResult<Vec<Meeting>> {
        if !self.state.contacts.contains_key(&contact) {
            return Err(LedgerError::UnknownContact(contact));
        }
        let now = self.clock.now();
        let matching = self
            .state
            .meetings
            .iter()
            .filter(|meeting| meeting.is_attended_by(contact) && meeting.date() > now)
            .cloned()
            .collect();
        Ok(dedup_sorted(matching))
    }

    /// Held meetings attended by the given contact, as past views.
    ///
    /// Live classification: an elapsed record still stored as future
    /// appears here, with empty notes.
    pub fn past_meetings_for(&self, contact: ContactId) -> LedgerResult<Vec<PastMeeting>> {
        if !self.state.contacts.contains_key(&contact) {
            return Err(LedgerError::UnknownContact(contact));
        }
        let now = self.clock.now();
        let matching = self
            .state
            .meetings
            .iter()
            .filter(|meeting| meeting.is_attended_by(contact) && meeting.date() < now)
            .cloned()
            .collect();
        Ok(dedup_sorted(matching)
            .iter()
            .map(PastMeeting::from)
            .collect())
    }

    /// Meetings on the same UTC calendar day as `date`, past or future.
    ///
    /// Time-of-day is ignored for matching; within the day the usual
    /// `(date, id)` order applies, so ties resolve by time-of-day.
    pub fn meetings_on(&self, date: DateTime<Utc>) -> Vec<Meeting> {
        let day = date.date_naive();
        let matching = self
            .state
            .meetings
            .iter()
            .filter(|meeting| meeting.date().date_naive() == day)
            .cloned()
            .collect();
        dedup_sorted(matching)
    }

    /// Persists the full ledger state through the store.
    ///
    /// Best effort: a store failure is logged and swallowed, never
    /// surfaced to the caller.
    pub fn flush(&self) {
        if let Err(err) = self.store.save(&self.state) {
            error!(
                "event=ledger_flush module=service status=error error_code=flush_failed error={err}"
            );
        }
    }

    fn find_meeting(&self, id: MeetingId) -> Option<&Meeting> {
        self.state
            .meetings
            .iter()
            .find(|meeting| meeting.id() == id)
    }

    fn check_attendees(&self, attendees: &BTreeSet<ContactId>) -> LedgerResult<()> {
        if attendees.is_empty() {
            return Err(LedgerError::NoAttendees);
        }
        for id in attendees {
            if !self.state.contacts.contains_key(id) {
                return Err(LedgerError::UnknownContact(*id));
            }
        }
        Ok(())
    }
}

/// Sorts meetings ascending by `(date, id)` and collapses duplicates.
///
/// Duplicates are meetings with equal attendee sets at the same instant,
/// regardless of id; the first in sort order (the lowest id) survives.
fn dedup_sorted(mut meetings: Vec<Meeting>) -> Vec<Meeting> {
    meetings.sort_by_key(|meeting| (meeting.date(), meeting.id()));
    let mut kept: Vec<Meeting> = Vec::with_capacity(meetings.len());
    for meeting in meetings {
        if kept
            .iter()
            .any(|existing| existing.is_duplicate_of(&meeting))
        {
            continue;
        }
        kept.push(meeting);
    }
    kept
}

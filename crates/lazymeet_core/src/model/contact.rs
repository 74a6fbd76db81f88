//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact record referenced by meetings.
//! - Enforce identity immutability and the append-only notes log.
//!
//! # Invariants
//! - `id` is positive and never reused for another contact.
//! - `name` is non-empty and fixed at construction.
//! - Notes are only ever appended, never edited or removed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ledger-allocated contact identifier. Zero is never valid.
pub type ContactId = u32;

/// Validation error for contact construction and note appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Contact id must be positive.
    NonPositiveId,
    /// Contact name must be non-empty.
    EmptyName,
    /// Appended notes must be non-empty.
    EmptyNote,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "contact id must be positive"),
            Self::EmptyName => write!(f, "contact name must not be empty"),
            Self::EmptyNote => write!(f, "contact note must not be empty"),
        }
    }
}

impl Error for ContactValidationError {}

/// A named person the ledger tracks and meetings refer to.
///
/// Identity (`id`, `name`) is immutable after construction; the notes log
/// only grows. Fields stay private so the only mutation path is
/// [`Contact::add_note`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    id: ContactId,
    name: String,
    notes: Vec<String>,
}

impl Contact {
    /// Creates a contact with an empty notes log.
    pub fn new(id: ContactId, name: impl Into<String>) -> Result<Self, ContactValidationError> {
        let contact = Self {
            id,
            name: name.into(),
            notes: Vec::new(),
        };
        contact.validate()?;
        Ok(contact)
    }

    /// Creates a contact whose log starts with one note entry.
    pub fn with_initial_note(
        id: ContactId,
        name: impl Into<String>,
        note: impl Into<String>,
    ) -> Result<Self, ContactValidationError> {
        let mut contact = Self::new(id, name)?;
        contact.add_note(note)?;
        Ok(contact)
    }

    /// Stable ledger id.
    pub fn id(&self) -> ContactId {
        self.id
    }

    /// Contact name as given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Note entries in append order.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// All notes joined by newlines; empty string when the log is empty.
    pub fn notes_joined(&self) -> String {
        self.notes.join("\n")
    }

    /// Appends one note entry to the log.
    pub fn add_note(&mut self, note: impl Into<String>) -> Result<(), ContactValidationError> {
        let note = note.into();
        if note.is_empty() {
            return Err(ContactValidationError::EmptyNote);
        }
        self.notes.push(note);
        Ok(())
    }

    /// Re-checks construction invariants.
    ///
    /// Used on restored values: deserialization bypasses the constructors,
    /// and read paths must reject invalid persisted state instead of
    /// masking it.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.id == 0 {
            return Err(ContactValidationError::NonPositiveId);
        }
        if self.name.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        Ok(())
    }
}

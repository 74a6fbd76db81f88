//! Single-file JSON artifact behind the ledger.
//!
//! # Responsibility
//! - Serialize the full ledger state to one JSON document and back.
//! - Replace the artifact atomically so no partial write is observable.
//!
//! # Invariants
//! - A missing artifact is `Ok(None)`, never an error.
//! - Loaded state passes `LedgerState::validate()` before it is returned.

use super::{StoreError, StoreResult};
use crate::model::state::LedgerState;
use log::{error, info};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Persistence contract for the full ledger state.
pub trait StateStore {
    /// Reads the persisted state; `Ok(None)` means no artifact exists yet.
    fn load(&self) -> StoreResult<Option<LedgerState>>;
    /// Replaces the artifact with the given state.
    fn save(&self, state: &LedgerState) -> StoreResult<()>;
}

/// File-backed store keeping one JSON document per ledger.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Artifact location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> StoreResult<PathBuf> {
        match self.path.file_name() {
            Some(name) => {
                let mut tmp_name = OsString::from(name);
                tmp_name.push(".tmp");
                Ok(self.path.with_file_name(tmp_name))
            }
            None => Err(StoreError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                "artifact path has no file name",
            ))),
        }
    }

    fn write_snapshot(&self, state: &LedgerState) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let rendered = serde_json::to_string_pretty(state)?;
        // Write a sibling temp file, then rename over the artifact, so a
        // crash mid-write leaves the previous artifact intact.
        let temp_path = self.temp_path()?;
        fs::write(&temp_path, rendered)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl StateStore for JsonSnapshotStore {
    fn load(&self) -> StoreResult<Option<LedgerState>> {
        let started_at = Instant::now();
        info!("event=state_load module=store status=start");

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=state_load module=store status=ok mode=empty duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(None);
            }
            Err(err) => {
                error!(
                    "event=state_load module=store status=error duration_ms={} error_code=artifact_read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let parsed: Result<LedgerState, StoreError> = serde_json::from_str(&raw)
            .map_err(StoreError::from)
            .and_then(|state: LedgerState| {
                state.validate()?;
                Ok(state)
            });

        match parsed {
            Ok(state) => {
                info!(
                    "event=state_load module=store status=ok mode=artifact contacts={} meetings={} duration_ms={}",
                    state.contacts.len(),
                    state.meetings.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(state))
            }
            Err(err) => {
                error!(
                    "event=state_load module=store status=error duration_ms={} error_code=artifact_invalid error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, state: &LedgerState) -> StoreResult<()> {
        let started_at = Instant::now();
        info!("event=state_save module=store status=start");

        match self.write_snapshot(state) {
            Ok(()) => {
                info!(
                    "event=state_save module=store status=ok contacts={} meetings={} duration_ms={}",
                    state.contacts.len(),
                    state.meetings.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=state_save module=store status=error duration_ms={} error_code=artifact_write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonSnapshotStore, StateStore};
    use crate::model::contact::Contact;
    use crate::model::state::LedgerState;
    use crate::store::StoreError;
    use std::fs;

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::default();
        let contact = Contact::with_initial_note(1, "Ines Carvalho", "met at FOSDEM").unwrap();
        state.contacts.insert(contact.id(), contact);
        state.next_contact_id = 2;
        state
    }

    #[test]
    fn load_missing_artifact_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("ledger.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("ledger.json"));
        let state = sample_state();

        store.save(&state).unwrap();
        let loaded = store.load().unwrap().expect("artifact should exist");

        assert_eq!(loaded, state);
    }

    #[test]
    fn save_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("ledger.json"));

        store.save(&LedgerState::default()).unwrap();
        let state = sample_state();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().expect("artifact should exist");
        assert_eq!(loaded, state);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("nested/dir/ledger.json"));

        store.save(&LedgerState::default()).unwrap();

        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn unparseable_artifact_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonSnapshotStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Parse(_))));
    }

    #[test]
    fn invalid_state_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut state = sample_state();
        state.next_contact_id = 1;
        fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

        let store = JsonSnapshotStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::InvalidState(_))));
    }
}

mod common;

use common::{base_time, ledger_at};
use lazymeet_core::LedgerError;

#[test]
fn contact_ids_are_distinct_and_increasing() {
    let (mut ledger, _clock) = ledger_at(base_time());

    let first = ledger.add_contact("Ana Silva", "met at the expo").unwrap();
    let second = ledger.add_contact("Jonas Petersen", "referred by Ana").unwrap();
    let third = ledger.add_contact("Miriam Holt", "cold outreach").unwrap();

    assert_eq!([first, second, third], [1, 2, 3]);
}

#[test]
fn add_contact_rejects_empty_name_and_notes_without_spending_an_id() {
    let (mut ledger, _clock) = ledger_at(base_time());

    assert!(matches!(
        ledger.add_contact("", "some notes"),
        Err(LedgerError::EmptyName)
    ));
    assert!(matches!(
        ledger.add_contact("Ana Silva", ""),
        Err(LedgerError::EmptyNotes)
    ));

    let id = ledger.add_contact("Ana Silva", "some notes").unwrap();
    assert_eq!(id, 1);
}

#[test]
fn name_search_on_fresh_ledger_is_empty() {
    let (ledger, _clock) = ledger_at(base_time());

    assert!(ledger.contacts_by_name("").is_empty());
}

#[test]
fn empty_fragment_returns_every_contact_sorted_by_id() {
    let (mut ledger, _clock) = ledger_at(base_time());
    ledger.add_contact("Jonas Petersen", "referred").unwrap();
    ledger.add_contact("Ana Silva", "expo").unwrap();

    let all = ledger.contacts_by_name("");

    let ids: Vec<u32> = all.iter().map(|contact| contact.id()).collect();
    assert_eq!(ids, [1, 2]);
    assert_eq!(all[0].name(), "Jonas Petersen");
    assert_eq!(all[1].name(), "Ana Silva");
}

#[test]
fn search_result_is_a_snapshot_not_a_live_view() {
    let (mut ledger, _clock) = ledger_at(base_time());
    let id = ledger.add_contact("Ana Silva", "expo").unwrap();

    let mut result = ledger.contacts_by_name("");
    result[0].add_note("scribbled on the copy").unwrap();

    let fresh = ledger.contacts_by_ids(&[id]).unwrap();
    assert_eq!(fresh[0].notes_joined(), "expo");
}

#[test]
fn name_search_is_substring_case_and_whitespace_sensitive() {
    let (mut ledger, _clock) = ledger_at(base_time());
    ledger.add_contact("Ana Silva", "expo").unwrap();
    ledger.add_contact("ana maria", "workshop").unwrap();
    ledger.add_contact("Mariana Duarte", "conference").unwrap();

    let lowercase: Vec<u32> = ledger
        .contacts_by_name("ana")
        .iter()
        .map(|contact| contact.id())
        .collect();
    assert_eq!(lowercase, [2, 3]);

    let with_space: Vec<u32> = ledger
        .contacts_by_name(" Silva")
        .iter()
        .map(|contact| contact.id())
        .collect();
    assert_eq!(with_space, [1]);

    assert!(ledger.contacts_by_name("silva").is_empty());
}

#[test]
fn duplicate_names_receive_distinct_ids() {
    let (mut ledger, _clock) = ledger_at(base_time());

    let first = ledger.add_contact("Alex Reed", "team a").unwrap();
    let second = ledger.add_contact("Alex Reed", "team b").unwrap();

    assert_ne!(first, second);
    assert_eq!(ledger.contacts_by_name("Alex Reed").len(), 2);
}

#[test]
fn ids_lookup_deduplicates_and_sorts() {
    let (mut ledger, _clock) = ledger_at(base_time());
    ledger.add_contact("Ana Silva", "expo").unwrap();
    ledger.add_contact("Jonas Petersen", "referred").unwrap();

    let found = ledger.contacts_by_ids(&[2, 1, 2, 1]).unwrap();

    let ids: Vec<u32> = found.iter().map(|contact| contact.id()).collect();
    assert_eq!(ids, [1, 2]);
}

#[test]
fn ids_lookup_is_all_or_nothing() {
    let (mut ledger, _clock) = ledger_at(base_time());
    ledger.add_contact("Ana Silva", "expo").unwrap();

    assert!(matches!(
        ledger.contacts_by_ids(&[]),
        Err(LedgerError::NoIdsRequested)
    ));
    assert!(matches!(
        ledger.contacts_by_ids(&[1, 99]),
        Err(LedgerError::UnknownContact(99))
    ));
}

#[test]
fn contact_notes_append_in_call_order() {
    let (mut ledger, _clock) = ledger_at(base_time());
    let id = ledger.add_contact("Ana Silva", "met at the expo").unwrap();

    ledger.add_contact_note(id, "follow-up sent").unwrap();

    let found = ledger.contacts_by_ids(&[id]).unwrap();
    assert_eq!(found[0].notes_joined(), "met at the expo\nfollow-up sent");
}

#[test]
fn contact_note_rejects_unknown_contact_and_empty_text() {
    let (mut ledger, _clock) = ledger_at(base_time());
    let id = ledger.add_contact("Ana Silva", "expo").unwrap();

    assert!(matches!(
        ledger.add_contact_note(99, "anything"),
        Err(LedgerError::UnknownContact(99))
    ));
    assert!(matches!(
        ledger.add_contact_note(id, ""),
        Err(LedgerError::EmptyNotes)
    ));
}

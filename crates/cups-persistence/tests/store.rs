#![allow(missing_docs)]

use std::collections::BTreeSet;

use tempfile::tempdir;

use cups_core::{EquivalenceRegistry, EquivalenceStore, RecordQuery, StoreError};
use cups_model::EquivalenceRecord;
use cups_persistence::{JsonStore, PersistenceError};

fn record(principal: &str) -> EquivalenceRecord {
    EquivalenceRecord::new(principal, BTreeSet::new(), "Procedimiento")
}

#[test]
fn test_round_trip_through_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let mut registry = EquivalenceRegistry::new(JsonStore::open(&path).unwrap());
    registry
        .register_or_merge("890201", "Electrocardiograma de ritmo")
        .unwrap();
    registry
        .register_or_merge("871001", "Radiografia de torax")
        .unwrap();

    let reopened = EquivalenceRegistry::new(JsonStore::open(&path).unwrap());
    let resolved = reopened
        .resolve("89.02.01")
        .unwrap()
        .expect("record survives reopen");
    assert_eq!(resolved.principal_code, "890201");
    assert_eq!(resolved.description, "Electrocardiograma de ritmo");
    assert_eq!(reopened.store().len(), 2);
}

#[test]
fn test_duplicate_insert_is_a_store_conflict() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let mut store = JsonStore::open(&path).unwrap();
    store.insert(record("890201")).unwrap();

    let result = store.insert(record("890201"));
    assert!(matches!(
        result,
        Err(StoreError::DuplicatePrincipal { code }) if code == "890201"
    ));
}

#[test]
fn test_racing_writer_is_detected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");

    // Two stores over the same file, both observing "empty"
    let mut winner = JsonStore::open(&path).unwrap();
    let mut loser = JsonStore::open(&path).unwrap();

    winner.insert(record("890201")).unwrap();

    // The loser's save must refuse to clobber the winner's write
    let result = loser.insert(record("871001"));
    let Err(StoreError::Backend { source }) = result else {
        panic!("expected backend conflict, got {result:?}");
    };
    assert!(matches!(
        source.downcast_ref::<PersistenceError>(),
        Some(PersistenceError::ExternalModification { .. })
    ));

    // The retry path: re-open and register again
    let mut retried = JsonStore::open(&path).unwrap();
    retried.insert(record("871001")).unwrap();
    assert_eq!(retried.len(), 2);
}

#[test]
fn test_failed_save_leaves_memory_consistent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let mut stale = JsonStore::open(&path).unwrap();
    JsonStore::open(&path)
        .unwrap()
        .insert(record("890201"))
        .unwrap();

    assert!(stale.insert(record("871001")).is_err());

    // The rejected record was rolled back, not left dangling
    let query = RecordQuery::ByPrincipal("871001".to_string());
    assert!(stale.find_one(&query).unwrap().is_none());
    assert!(stale.is_empty());
}

#[test]
fn test_update_persists_merged_variants() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let mut store = JsonStore::open(&path).unwrap();
    let mut stored = store.insert(record("890201")).unwrap();
    stored.merge_variants(["89.02.01"]);
    store.update(stored).unwrap();

    let reopened = JsonStore::open(&path).unwrap();
    let query = RecordQuery::ByPrincipal("890201".to_string());
    let loaded = reopened.find_one(&query).unwrap().expect("record present");
    assert!(loaded.has_variant("89.02.01"));
}

#[test]
fn test_update_missing_record_fails() {
    let dir = tempdir().unwrap();
    let mut store = JsonStore::open(dir.path().join("registry.json")).unwrap();

    let result = store.update(record("890201"));
    assert!(matches!(result, Err(StoreError::MissingRecord { .. })));
}

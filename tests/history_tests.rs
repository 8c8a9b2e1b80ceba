use std::sync::Arc;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use chrono::{Duration, TimeZone, Utc};
use predicates::prelude::*;

use dgdrive::store::{self, DocumentStore, DOCUMENT_VERSION, FAVORITES_KEY, HISTORY_KEY};
use dgdrive::{AccessHistory, DriveError, Favorites, JsonFileStore, MemoryStore, Result};

/// Store whose writes always fail
struct ReadOnlyStore;

impl DocumentStore for ReadOnlyStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, key: &str, _contents: &str) -> Result<()> {
        Err(DriveError::Persistence(format!("{} is read-only", key)))
    }
}

fn memory_history() -> AccessHistory {
    AccessHistory::open(Arc::new(MemoryStore::new()), 10).unwrap()
}

#[test]
fn test_recent_owner_moves_to_front() {
    let mut history = memory_history();
    history.record_access("0xABC", 5).unwrap();
    history.record_access("0xDEF", 2).unwrap();
    history.record_access("0xABC", 7).unwrap();

    let entries = history.list();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].owner_address, "0xABC");
    assert_eq!(entries[0].file_count, 7);
    assert_eq!(entries[1].owner_address, "0xDEF");
    assert_eq!(entries[1].file_count, 2);
}

#[test]
fn test_repeated_access_keeps_one_entry() {
    let mut history = memory_history();
    history.record_access("0x1111111111111111111111111111111111111111", 1).unwrap();
    history.record_access("0x1111111111111111111111111111111111111111", 3).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history.list()[0].file_count, 3);
}

#[test]
fn test_eleventh_owner_evicts_oldest() {
    let mut history = memory_history();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

    for i in 0..11 {
        let owner = format!("0x{:040x}", i);
        history
            .record_access_at(&owner, i, start + Duration::minutes(i as i64))
            .unwrap();
    }

    assert_eq!(history.len(), 10);
    assert!(history.get(&format!("0x{:040x}", 0)).is_none());
    assert_eq!(history.list()[0].owner_address, format!("0x{:040x}", 10));
    assert_eq!(history.list()[9].owner_address, format!("0x{:040x}", 1));
}

#[test]
fn test_history_never_exceeds_capacity() {
    let mut history = memory_history();
    for i in 0..50 {
        history.record_access(&format!("0xowner{}", i), 0).unwrap();
        assert!(history.len() <= 10);
    }
    assert_eq!(history.len(), 10);
}

#[test]
fn test_default_label_and_rename() {
    let mut history = memory_history();
    let owner = "0x1234567890abcdef1234567890abcdef12345678";
    history.record_access(owner, 4).unwrap();

    let entry = history.get(owner).unwrap();
    assert_eq!(entry.label, "0x1234...5678");
    assert!(entry.has_default_label());

    assert!(history.set_label(owner, "Alice").unwrap());
    assert_eq!(history.get(owner).unwrap().label, "Alice");

    // The label survives a later access
    history.record_access(owner, 9).unwrap();
    assert_eq!(history.get(owner).unwrap().label, "Alice");

    // A blank label restores the default
    history.set_label(owner, "   ").unwrap();
    assert!(history.get(owner).unwrap().has_default_label());
}

#[test]
fn test_set_label_after_remove_does_not_resurrect() {
    let mut history = memory_history();
    history.record_access("0xABC", 1).unwrap();
    history.remove("0xABC").unwrap();

    assert!(!history.set_label("0xABC", "Ghost").unwrap());
    assert!(history.is_empty());
    assert!(history.get("0xABC").is_none());

    // Removing again is harmless
    tokio_test::assert_ok!(history.remove("0xABC"));
}

#[test]
fn test_persistence_failure_keeps_memory_state() {
    let mut history = AccessHistory::open(Arc::new(ReadOnlyStore), 10).unwrap();

    let err = tokio_test::assert_err!(history.record_access("0xABC", 3));
    assert!(matches!(err, DriveError::Persistence(_)));
    assert_eq!(history.len(), 1);
    assert_eq!(history.list()[0].owner_address, "0xABC");
}

#[test]
fn test_history_survives_reload() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(temp_dir.path()));

    {
        let mut history = AccessHistory::open(store.clone(), 10)?;
        history.record_access("0xABC", 5)?;
        history.record_access("0xDEF", 2)?;
        history.set_label("0xDEF", "Bob")?;
    }

    temp_dir
        .child(format!("{}.json", HISTORY_KEY))
        .assert(predicate::str::contains("\"version\": 1"));

    let reloaded = AccessHistory::open(store, 10)?;
    let owners: Vec<&str> = reloaded.list().iter().map(|e| e.owner_address.as_str()).collect();
    assert_eq!(owners, vec!["0xDEF", "0xABC"]);
    assert_eq!(reloaded.get("0xDEF").unwrap().label, "Bob");

    Ok(())
}

#[test]
fn test_reload_with_smaller_capacity_truncates() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    {
        let mut history = AccessHistory::open(store.clone(), 10).unwrap();
        for i in 0..6 {
            history.record_access(&format!("0xowner{}", i), i).unwrap();
        }
    }

    let history = AccessHistory::open(store, 3).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.list()[0].owner_address, "0xowner5");
}

#[test]
fn test_unknown_document_version_rejected() {
    let store = MemoryStore::new();
    store
        .save(HISTORY_KEY, r#"{"version": 99, "data": []}"#)
        .unwrap();

    let err = AccessHistory::open(Arc::new(store), 10).err().unwrap();
    match err {
        DriveError::UnsupportedVersion { key, found } => {
            assert_eq!(key, HISTORY_KEY);
            assert_eq!(found, 99);
        }
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_unreadable_document_falls_back_to_memory() {
    let store = Arc::new(MemoryStore::new());
    store.save(HISTORY_KEY, "{not json").unwrap();

    let mut history = AccessHistory::open_or_empty(store.clone(), 10);
    assert!(history.is_empty());
    assert!(history.load_error().unwrap().contains("access-history"));

    let err = tokio_test::assert_err!(history.record_access("0xABC", 1));
    assert!(matches!(err, DriveError::Persistence(_)));
    assert_eq!(history.len(), 1);
    assert_eq!(store.load(HISTORY_KEY).unwrap().as_deref(), Some("{not json"));
}

#[test]
fn test_readable_document_has_no_load_error() {
    let store = Arc::new(MemoryStore::new());
    let mut favorites = Favorites::open_or_empty(store.clone());
    assert!(favorites.load_error().is_none());
    assert!(favorites.add("QmA").unwrap());

    let favorites = Favorites::open_or_empty(store);
    assert_eq!(favorites.list(), &["QmA".to_string()]);
}

#[test]
fn test_unversioned_document_rejected() {
    let store = MemoryStore::new();
    store.save(FAVORITES_KEY, r#"["QmA", "QmB"]"#).unwrap();

    let err = Favorites::open(Arc::new(store)).err().unwrap();
    assert!(matches!(err, DriveError::Serialization(_)));
}

#[test]
fn test_document_envelope() {
    let store = MemoryStore::new();
    store::save_document(&store, "numbers", &vec![1, 2, 3]).unwrap();

    let raw = store.load("numbers").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], DOCUMENT_VERSION);
    assert_eq!(value["data"], serde_json::json!([1, 2, 3]));

    let loaded: Option<Vec<u32>> = store::load_document(&store, "numbers").unwrap();
    assert_eq!(loaded, Some(vec![1, 2, 3]));
    let missing: Option<Vec<u32>> = store::load_document(&store, "absent").unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_favorites_persist() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(temp_dir.path()));

    {
        let mut favorites = Favorites::open(store.clone())?;
        assert!(favorites.add("QmA")?);
        assert!(!favorites.add("QmA")?);
        assert!(favorites.add("QmB")?);
        assert!(!favorites.toggle("QmA")?);
        assert!(favorites.toggle("QmC")?);
        assert!(!favorites.remove("QmMissing")?);
    }

    let favorites = Favorites::open(store)?;
    assert_eq!(favorites.list(), &["QmB".to_string(), "QmC".to_string()]);
    assert!(favorites.contains("QmC"));
    assert!(!favorites.contains("QmA"));

    Ok(())
}

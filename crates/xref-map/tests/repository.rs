use std::fs;

use tempfile::TempDir;
use xref_map::{CacheError, FileMatchCache, MatchCache};
use xref_model::{MatchRecord, MatchSet, RosterId, RunKey};

fn run_key(value: &str) -> RunKey {
    RunKey::new(value).expect("valid run key")
}

fn sample_matches() -> MatchSet {
    let mut set = MatchSet::new();
    for (name, id, confidence) in [("Kane", 1, 150), ("Son Heung-Min", 2, 86)] {
        set.insert(MatchRecord {
            free_text_name: name.to_string(),
            roster_id: RosterId::new(id),
            confidence,
        })
        .expect("distinct records");
    }
    set
}

#[test]
fn put_then_get_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let cache = FileMatchCache::new(dir.path()).expect("create cache");
    let key = run_key("2021_10_19");

    cache.put(&key, &sample_matches()).expect("put");
    let loaded = cache.get(&key).expect("cached entry");

    assert_eq!(loaded, sample_matches());
    assert_eq!(loaded.confidence("Son Heung-Min"), Some(86));
}

#[test]
fn stored_document_is_mapping_then_confidence() {
    let dir = TempDir::new().expect("temp dir");
    let cache = FileMatchCache::new(dir.path()).expect("create cache");
    let key = run_key("2021_10_19");
    cache.put(&key, &sample_matches()).expect("put");

    let content = fs::read_to_string(cache.path_for(&key)).expect("read file");
    insta::assert_snapshot!(content, @r#"[{"Kane":1,"Son Heung-Min":2},{"Kane":150,"Son Heung-Min":86}]"#);
}

#[test]
fn missing_entry_is_absent() {
    let dir = TempDir::new().expect("temp dir");
    let cache = FileMatchCache::new(dir.path()).expect("create cache");
    let key = run_key("2021_10_19");

    assert!(cache.get(&key).is_none());
    assert!(cache.load(&key).expect("load").is_none());
    assert!(!cache.path_for(&key).exists());
}

#[test]
fn corrupt_entry_is_treated_as_absent() {
    let dir = TempDir::new().expect("temp dir");
    let cache = FileMatchCache::new(dir.path()).expect("create cache");
    let key = run_key("2021_10_19");
    fs::write(cache.path_for(&key), "[{\"Kane\": \"one\"}").expect("write corrupt file");

    assert!(cache.get(&key).is_none());
    assert!(matches!(cache.load(&key), Err(CacheError::Corrupt { .. })));
}

#[test]
fn inconsistent_halves_are_corrupt() {
    let dir = TempDir::new().expect("temp dir");
    let cache = FileMatchCache::new(dir.path()).expect("create cache");
    let key = run_key("2021_10_19");
    fs::write(cache.path_for(&key), r#"[{"Kane":1,"Son":1},{"Kane":150,"Son":90}]"#)
        .expect("write file");

    assert!(matches!(cache.load(&key), Err(CacheError::Corrupt { .. })));
}

#[test]
fn put_replaces_previous_entry_without_leftovers() {
    let dir = TempDir::new().expect("temp dir");
    let cache = FileMatchCache::new(dir.path()).expect("create cache");
    let key = run_key("2021_10_19");

    cache.put(&key, &MatchSet::new()).expect("first put");
    cache.put(&key, &sample_matches()).expect("second put");

    assert_eq!(cache.get(&key), Some(sample_matches()));
    let files: Vec<_> = fs::read_dir(dir.path())
        .expect("list dir")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(
        !files[0].to_string_lossy().ends_with(".tmp"),
        "temp file left behind"
    );
}

#[test]
fn invalidate_forces_a_miss() {
    let dir = TempDir::new().expect("temp dir");
    let cache = FileMatchCache::new(dir.path()).expect("create cache");
    let key = run_key("2021_10_19");
    cache.put(&key, &sample_matches()).expect("put");

    assert!(cache.invalidate(&key).expect("invalidate"));
    assert!(cache.get(&key).is_none());
    assert!(!cache.invalidate(&key).expect("second invalidate"));
}

#[test]
fn new_creates_nested_directory() {
    let dir = TempDir::new().expect("temp dir");
    let nested = dir.path().join("cache").join("matches");
    let cache = FileMatchCache::new(&nested).expect("create cache");
    assert!(nested.is_dir());
    assert!(cache.path_for(&run_key("2021_10_19")).starts_with(&nested));
}

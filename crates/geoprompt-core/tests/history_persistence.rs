use geoprompt_core::history::{HistoryManager, DEFAULT_HISTORY_LIMIT};
use std::fs;

fn manager(dir: &tempfile::TempDir) -> HistoryManager {
    HistoryManager::at_path(dir.path().join("nested").join("search_history.json"))
}

#[test]
fn test_record_creates_file_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let history = manager(&dir);

    history.record("Paris to Lyon").unwrap();
    history.record("show me Rome").unwrap();
    assert!(history.path().exists());
    assert_eq!(
        history.load().unwrap(),
        vec!["show me Rome".to_string(), "Paris to Lyon".to_string()]
    );

    // Stored as a plain JSON array of strings.
    let raw: Vec<String> =
        serde_json::from_str(&fs::read_to_string(history.path()).unwrap()).unwrap();
    assert_eq!(raw.len(), 2);
}

#[test]
fn test_repeat_of_newest_entry_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let history = manager(&dir);

    history.record("Boston to Denver").unwrap();
    history.record("  Boston to Denver ").unwrap();
    history.record("Kyoto").unwrap();
    history.record("Boston to Denver").unwrap();
    assert_eq!(
        history.load().unwrap(),
        vec!["Boston to Denver", "Kyoto", "Boston to Denver"]
    );
}

#[test]
fn test_history_is_capped() {
    let dir = tempfile::tempdir().unwrap();
    let history = manager(&dir);
    for i in 0..(DEFAULT_HISTORY_LIMIT + 7) {
        history.record(&format!("query {}", i)).unwrap();
    }
    let entries = history.load().unwrap();
    assert_eq!(entries.len(), DEFAULT_HISTORY_LIMIT);
    assert_eq!(entries[0], format!("query {}", DEFAULT_HISTORY_LIMIT + 6));

    let small = manager(&dir).with_limit(3);
    small.record("one more").unwrap();
    assert_eq!(small.load().unwrap().len(), 3);
}

#[test]
fn test_clear_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let history = manager(&dir);
    history.record("Paris").unwrap();
    history.clear().unwrap();
    assert!(history.load().unwrap().is_empty());
    assert!(!history.path().exists());
}

#[test]
fn test_blank_queries_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let history = manager(&dir);
    history.record("   ").unwrap();
    assert!(!history.path().exists());
}

use std::fs;

use jobcloud_engine::{ensure_output_dir, persist_corpus, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn corpus_write_replaces_previous_run() {
    let temp = TempDir::new().unwrap();

    let first = persist_corpus(temp.path(), "corpus.txt", "first run").unwrap();
    assert_eq!(first.file_name().unwrap(), "corpus.txt");
    assert_eq!(fs::read_to_string(&first).unwrap(), "first run");

    let second = persist_corpus(temp.path(), "corpus.txt", "second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "second");

    // Only the corpus remains; the temp file was renamed into place.
    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn file_in_place_of_dir_is_rejected_without_partial_output() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let err = persist_corpus(&blocker, "corpus.txt", "data").unwrap_err();
    assert!(matches!(err, PersistError::OutputDir { .. }));
    assert!(!temp.path().join("corpus.txt").exists());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

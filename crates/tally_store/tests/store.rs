use std::fs;

use pretty_assertions::assert_eq;
use tally_core::ProgressSnapshot;
use tally_store::{ensure_cache_dir, load_progress, save_progress, BlobStore, FileStore};
use tempfile::TempDir;

fn sample_progress() -> ProgressSnapshot {
    ProgressSnapshot {
        last_count: 42.0,
        last_counter: Some(7),
        tallies: vec![(7, 3), (9, 1)],
    }
}

#[test]
fn creates_missing_cache_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("cache");
    assert!(!new_dir.exists());
    ensure_cache_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn missing_blob_yields_default_progress() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());

    assert_eq!(store.read("counting").unwrap(), None);
    assert_eq!(load_progress(&store, "counting"), ProgressSnapshot::default());
}

#[test]
fn round_trip_preserves_progress() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    let snapshot = sample_progress();

    save_progress(&store, "counting", &snapshot);

    assert_eq!(load_progress(&store, "counting"), snapshot);
}

#[test]
fn corrupt_blob_degrades_to_default() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());

    store.write("counting", "this is not ron {").unwrap();

    assert_eq!(load_progress(&store, "counting"), ProgressSnapshot::default());
}

#[test]
fn atomic_write_replaces_existing_blob() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());

    store.write("counting", "first").unwrap();
    store.write("counting", "second").unwrap();

    assert_eq!(store.read("counting").unwrap().as_deref(), Some("second"));
    assert_eq!(
        fs::read_to_string(temp.path().join("counting.ron")).unwrap(),
        "second"
    );
}

#[test]
fn no_partial_blob_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let store = FileStore::new(file_path.clone());
    assert!(store.write("counting", "data").is_err());
    assert!(!file_path.with_file_name("counting.ron").exists());
}

#[test]
fn keys_map_to_separate_blobs() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());

    save_progress(&store, "counting", &sample_progress());
    save_progress(&store, "shadow", &ProgressSnapshot::default());

    assert_eq!(load_progress(&store, "counting"), sample_progress());
    assert_eq!(load_progress(&store, "shadow"), ProgressSnapshot::default());
}

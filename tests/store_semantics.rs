//! Store semantics tests
//!
//! Covers:
//! - Save-then-retrieve returns the saved value
//! - Retrieve of a missing file is FileNotFound, never a default
//! - Append extends in order; save replaces
//! - Corrupt bytes surface as DecodingFailed and nothing else
//! - Move/rename are all-or-nothing

use diskstore::{
    AppendPolicy, DeleteMode, DiskErrorKind, FileStore, JsonCodec, LocationRoots,
    StorageLocation, StoreOptions,
};
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    id: u64,
    label: String,
    score: f64,
}

fn entry(id: u64) -> Entry {
    Entry {
        id,
        label: format!("entry {}", id),
        score: id as f64 * 1.5,
    }
}

fn create_store() -> (TempDir, FileStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::new(LocationRoots::under(temp.path()));
    (temp, store)
}

const DOCS: StorageLocation = StorageLocation::Documents;

// =============================================================================
// Save / Retrieve
// =============================================================================

/// Saved values come back equal, for every location.
#[test]
fn test_save_then_retrieve_every_location() {
    let (_temp, store) = create_store();

    for (i, location) in StorageLocation::all().iter().enumerate() {
        let value = vec![entry(i as u64), entry(i as u64 + 10)];
        store.save(*location, "data/entries.json", &value).unwrap();
        let back: Vec<Entry> = store.retrieve(*location, "data/entries.json").unwrap();
        assert_eq!(back, value, "location {}", location);
    }
}

/// Compact and pretty encodings both round-trip.
#[test]
fn test_compact_codec_round_trip() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::with_codec(LocationRoots::under(temp.path()), JsonCodec::compact());

    store.save(DOCS, "c.json", &entry(4)).unwrap();
    let raw = fs::read_to_string(store.path_of(DOCS, "c.json").unwrap()).unwrap();
    assert!(!raw.contains('\n'));

    let back: Entry = store.retrieve(DOCS, "c.json").unwrap();
    assert_eq!(back, entry(4));
}

/// Stored files are human-readable JSON.
#[test]
fn test_on_disk_format_is_json() {
    let (_temp, store) = create_store();
    store.save(DOCS, "e.json", &entry(1)).unwrap();

    let raw = fs::read_to_string(store.path_of(DOCS, "e.json").unwrap()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["label"], "entry 1");
}

/// Nested paths create their directories on write.
#[test]
fn test_save_creates_intermediate_directories() {
    let (temp, store) = create_store();
    store
        .save(StorageLocation::Caches, "Posts/MyCoolPosts/1.json", &entry(1))
        .unwrap();
    assert!(temp.path().join("caches/Posts/MyCoolPosts/1.json").is_file());
}

// =============================================================================
// Missing files
// =============================================================================

/// Never-written path is FileNotFound.
#[test]
fn test_retrieve_never_written_is_not_found() {
    let (_temp, store) = create_store();
    let err = store.retrieve::<Vec<Entry>>(DOCS, "nothing.json").unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::FileNotFound);
    assert!(err.path().unwrap().ends_with("nothing.json"));
}

/// Deleted path is FileNotFound.
#[test]
fn test_retrieve_after_delete_is_not_found() {
    let (_temp, store) = create_store();
    store.save(DOCS, "d.json", &vec![entry(1)]).unwrap();
    store.delete(DOCS, "d.json", DeleteMode::Lenient).unwrap();

    let err = store.retrieve::<Vec<Entry>>(DOCS, "d.json").unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::FileNotFound);
    assert!(!store.exists(DOCS, "d.json").unwrap());
}

/// An empty collection is a real file, unlike a missing one.
#[test]
fn test_empty_collection_distinct_from_missing() {
    let (_temp, store) = create_store();
    store.save(DOCS, "empty.json", &Vec::<Entry>::new()).unwrap();

    assert!(store.exists(DOCS, "empty.json").unwrap());
    let back: Vec<Entry> = store.retrieve(DOCS, "empty.json").unwrap();
    assert!(back.is_empty());
}

/// Lenient delete of a missing file succeeds; strict fails.
#[test]
fn test_delete_modes() {
    let (_temp, store) = create_store();
    store.delete(DOCS, "ghost.json", DeleteMode::Lenient).unwrap();

    let err = store
        .delete(DOCS, "ghost.json", DeleteMode::Strict)
        .unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::FileNotFound);

    store.save(DOCS, "real.json", &entry(1)).unwrap();
    store.delete(DOCS, "real.json", DeleteMode::Strict).unwrap();
    assert!(!store.exists(DOCS, "real.json").unwrap());
}

// =============================================================================
// Append / Overwrite
// =============================================================================

/// append(A), append(B) on an empty store yields [A, B].
#[test]
fn test_append_from_empty_store() {
    let (_temp, store) = create_store();
    store.append(DOCS, "log.json", entry(1)).unwrap();
    store.append(DOCS, "log.json", entry(2)).unwrap();

    let back: Vec<Entry> = store.retrieve(DOCS, "log.json").unwrap();
    assert_eq!(back, vec![entry(1), entry(2)]);
}

/// Under FailIfMissing the first append is refused and nothing is created.
#[test]
fn test_append_policy_fail_if_missing() {
    let (_temp, store) = create_store();
    let store = store.with_options(StoreOptions {
        append_policy: AppendPolicy::FailIfMissing,
        ..StoreOptions::default()
    });

    let err = store.append(DOCS, "log.json", entry(1)).unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::FileNotFound);
    assert!(!store.exists(DOCS, "log.json").unwrap());
}

/// save([A]) then save([B]) yields [B] only.
#[test]
fn test_save_overwrites() {
    let (_temp, store) = create_store();
    store.save(DOCS, "o.json", &vec![entry(1)]).unwrap();
    store.save(DOCS, "o.json", &vec![entry(2)]).unwrap();

    let back: Vec<Entry> = store.retrieve(DOCS, "o.json").unwrap();
    assert_eq!(back, vec![entry(2)]);
}

/// Appending a different element type fails without touching the file.
#[test]
fn test_append_wrong_element_type() {
    let (_temp, store) = create_store();
    store.save(DOCS, "w.json", &vec![entry(1)]).unwrap();

    let err = store.append(DOCS, "w.json", "just a string".to_string()).unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::DecodingFailed);

    let back: Vec<Entry> = store.retrieve(DOCS, "w.json").unwrap();
    assert_eq!(back, vec![entry(1)]);
}

// =============================================================================
// Decode-failure isolation
// =============================================================================

/// Corrupted bytes surface as DecodingFailed with position details.
#[test]
fn test_corruption_is_decoding_failed() {
    let (_temp, store) = create_store();
    store.save(DOCS, "c.json", &vec![entry(1), entry(2)]).unwrap();

    let path = store.path_of(DOCS, "c.json").unwrap();
    let mut contents = fs::read(&path).unwrap();
    let mid = contents.len() / 2;
    contents.truncate(mid);
    fs::write(&path, contents).unwrap();

    let err = store.retrieve::<Vec<Entry>>(DOCS, "c.json").unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::DecodingFailed);
    assert!(err.details().unwrap().contains("byte_offset"));
}

/// Binary garbage is DecodingFailed, not a read error.
#[test]
fn test_garbage_is_decoding_failed() {
    let (_temp, store) = create_store();
    store
        .save_bytes(DOCS, "g.json", &[0xFF, 0x00, 0x13, 0x37])
        .unwrap();

    let err = store.retrieve::<Vec<Entry>>(DOCS, "g.json").unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::DecodingFailed);
}

/// A value of the wrong shape is DecodingFailed.
#[test]
fn test_shape_mismatch_is_decoding_failed() {
    let (_temp, store) = create_store();
    store.save(DOCS, "s.json", &entry(1)).unwrap();

    let err = store.retrieve::<Vec<Entry>>(DOCS, "s.json").unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::DecodingFailed);
}

// =============================================================================
// Move / Rename
// =============================================================================

/// Move across locations preserves bytes and removes the source.
#[test]
fn test_move_between_locations() {
    let (_temp, store) = create_store();
    store.save(StorageLocation::Caches, "m.json", &entry(9)).unwrap();
    let before = store
        .retrieve_bytes(StorageLocation::Caches, "m.json")
        .unwrap();

    store
        .move_file(StorageLocation::Caches, "m.json", DOCS, "kept/m.json")
        .unwrap();

    assert!(!store.exists(StorageLocation::Caches, "m.json").unwrap());
    assert_eq!(store.retrieve_bytes(DOCS, "kept/m.json").unwrap(), before);
}

/// Rename of a missing file is FileNotFound.
#[test]
fn test_rename_missing_source() {
    let (_temp, store) = create_store();
    let err = store.rename(DOCS, "a.json", "b.json").unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::FileNotFound);
}

/// An existing destination is never overwritten.
#[test]
fn test_move_refuses_existing_destination() {
    let (_temp, store) = create_store();
    store.save(DOCS, "a.json", &entry(1)).unwrap();
    store.save(DOCS, "b.json", &entry(2)).unwrap();

    let err = store.rename(DOCS, "a.json", "b.json").unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::WriteFailed);

    let a: Entry = store.retrieve(DOCS, "a.json").unwrap();
    let b: Entry = store.retrieve(DOCS, "b.json").unwrap();
    assert_eq!((a, b), (entry(1), entry(2)));
}

/// If the destination cannot be created the source stays.
#[test]
fn test_move_failure_keeps_source() {
    let (_temp, store) = create_store();
    store.save(DOCS, "src.json", &entry(1)).unwrap();
    store.save(DOCS, "blocker", &entry(2)).unwrap();

    let err = store
        .rename(DOCS, "src.json", "blocker/dst.json")
        .unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::WriteFailed);

    let src: Entry = store.retrieve(DOCS, "src.json").unwrap();
    assert_eq!(src, entry(1));
}

/// Renaming onto itself is a no-op.
#[test]
fn test_rename_to_self() {
    let (_temp, store) = create_store();
    store.save(DOCS, "same.json", &entry(1)).unwrap();
    store.rename(DOCS, "same.json", "./same.json").unwrap();
    assert!(store.exists(DOCS, "same.json").unwrap());
}

// =============================================================================
// Path validation
// =============================================================================

/// Traversal outside the root never touches the filesystem.
#[test]
fn test_traversal_rejected_before_io() {
    let (temp, store) = create_store();
    let err = store.save(DOCS, "../escaped.json", &entry(1)).unwrap_err();
    assert_eq!(err.kind(), DiskErrorKind::InvalidPath);
    assert!(!temp.path().join("escaped.json").exists());
}

//! Tests for Bucket
//!
//! These tests verify:
//! - Page allocation at the end offset
//! - Put/get within a single page, capacity of three records
//! - GetAll ordering and Clear
//! - On-disk page layout
//! - Corrupt pages and truncated files surface errors instead of panicking

use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bucketkv::codec::{encode_record, Record, RECORD_SIZE};
use bucketkv::storage::{Bucket, BUCKET_CAPACITY, PAGE_SIZE};
use bucketkv::BucketKvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("buckets.data");
    (temp_dir, path)
}

fn setup_bucket() -> (TempDir, Bucket) {
    let (temp, path) = setup_temp_file();
    let (bucket, _) = Bucket::create(&path, 0).unwrap();
    (temp, bucket)
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).unwrap().len()
}

fn write_at(path: &Path, offset: u64, bytes: &[u8]) {
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(offset)).unwrap();
    file.write_all(bytes).unwrap();
}

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_reserves_one_page() {
    let (_temp, path) = setup_temp_file();

    let (bucket, end_offset) = Bucket::create(&path, 0).unwrap();

    assert_eq!(end_offset, PAGE_SIZE);
    assert_eq!(bucket.id(), 0);
    assert_eq!(bucket.offset(), 0);
    assert_eq!(bucket.path(), path.as_path());
    assert_eq!(file_size(&path), PAGE_SIZE);
    assert_eq!(bucket.len().unwrap(), 0);
}

#[test]
fn test_create_appends_pages() {
    let (_temp, path) = setup_temp_file();

    let (first, end_offset) = Bucket::create(&path, 0).unwrap();
    let (second, end_offset) = Bucket::create(&path, end_offset).unwrap();
    let (third, end_offset) = Bucket::create(&path, end_offset).unwrap();

    assert_eq!(first.id(), 0);
    assert_eq!(second.id(), 1);
    assert_eq!(third.id(), 2);
    assert_eq!(end_offset, 3 * PAGE_SIZE);
    assert_eq!(file_size(&path), 3 * PAGE_SIZE);
}

#[test]
fn test_page_holds_exactly_three_records() {
    assert_eq!(1 + BUCKET_CAPACITY * RECORD_SIZE, PAGE_SIZE as usize);
}

// =============================================================================
// Put/Get Tests
// =============================================================================

#[test]
fn test_put_get() {
    let (_temp, bucket) = setup_bucket();

    bucket.put(&Record::new("roma", "dolznik")).unwrap();
    let record = bucket.get("roma").unwrap();

    assert_eq!(record, Record::new("roma", "dolznik"));
    assert_eq!(bucket.len().unwrap(), 1);
}

#[test]
fn test_get_missing_key() {
    let (_temp, bucket) = setup_bucket();
    bucket.put(&Record::new("key", "val")).unwrap();

    let result = bucket.get("nonexistent");

    assert!(matches!(result, Err(BucketKvError::KeyNotFound)));
}

#[test]
fn test_get_from_empty_bucket() {
    let (_temp, bucket) = setup_bucket();

    assert!(matches!(bucket.get(""), Err(BucketKvError::KeyNotFound)));
}

#[test]
fn test_put_until_full() {
    let (_temp, bucket) = setup_bucket();

    bucket.put(&Record::new("a", "1")).unwrap();
    bucket.put(&Record::new("b", "2")).unwrap();
    bucket.put(&Record::new("c", "3")).unwrap();

    assert!(bucket.is_full().unwrap());

    let result = bucket.put(&Record::new("d", "4"));
    assert!(matches!(result, Err(BucketKvError::BucketFull)));

    // Failed put leaves the page untouched
    assert_eq!(bucket.len().unwrap(), 3);
    assert!(matches!(bucket.get("d"), Err(BucketKvError::KeyNotFound)));
    assert_eq!(bucket.get("c").unwrap().value, "3");
}

#[test]
fn test_put_rejects_oversized_record() {
    let (_temp, bucket) = setup_bucket();

    let result = bucket.put(&Record::new("k".repeat(200), "v"));

    assert!(matches!(result, Err(BucketKvError::RecordTooLarge { .. })));
    assert!(bucket.is_empty().unwrap());
}

#[test]
fn test_buckets_are_independent() {
    let (_temp, path) = setup_temp_file();
    let (first, end_offset) = Bucket::create(&path, 0).unwrap();
    let (second, _) = Bucket::create(&path, end_offset).unwrap();

    first.put(&Record::new("left", "1")).unwrap();
    second.put(&Record::new("right", "2")).unwrap();

    assert_eq!(first.get("left").unwrap().value, "1");
    assert_eq!(second.get("right").unwrap().value, "2");
    assert!(matches!(first.get("right"), Err(BucketKvError::KeyNotFound)));
    assert!(matches!(second.get("left"), Err(BucketKvError::KeyNotFound)));
}

#[test]
fn test_handle_clone_sees_same_page() {
    let (_temp, bucket) = setup_bucket();
    let other = bucket.clone();

    bucket.put(&Record::new("shared", "yes")).unwrap();

    assert_eq!(other.get("shared").unwrap().value, "yes");
}

// =============================================================================
// GetAll / Clear Tests
// =============================================================================

#[test]
fn test_get_all_in_slot_order() {
    let (_temp, bucket) = setup_bucket();
    let records = vec![
        Record::new("igor", "feff"),
        Record::new("sima", "fefff"),
        Record::new("рома", "должник"),
    ];

    for record in &records {
        bucket.put(record).unwrap();
    }

    assert_eq!(bucket.get_all().unwrap(), records);
}

#[test]
fn test_get_all_empty() {
    let (_temp, bucket) = setup_bucket();

    assert!(bucket.get_all().unwrap().is_empty());
}

#[test]
fn test_clear_zeroes_page() {
    let (_temp, bucket) = setup_bucket();
    bucket.put(&Record::new("a", "1")).unwrap();
    bucket.put(&Record::new("b", "2")).unwrap();

    bucket.clear().unwrap();

    assert_eq!(bucket.len().unwrap(), 0);
    assert!(bucket.get_all().unwrap().is_empty());

    let bytes = fs::read(bucket.path()).unwrap();
    assert!(bytes.iter().all(|b| *b == 0));

    // Cleared bucket accepts records again
    bucket.put(&Record::new("c", "3")).unwrap();
    assert_eq!(bucket.get("c").unwrap().value, "3");
}

#[test]
fn test_clear_only_touches_own_page() {
    let (_temp, path) = setup_temp_file();
    let (first, end_offset) = Bucket::create(&path, 0).unwrap();
    let (second, _) = Bucket::create(&path, end_offset).unwrap();

    first.put(&Record::new("keep", "me")).unwrap();
    second.put(&Record::new("drop", "me")).unwrap();

    second.clear().unwrap();

    assert_eq!(first.get("keep").unwrap().value, "me");
    assert!(second.is_empty().unwrap());
}

// =============================================================================
// On-disk Layout Tests
// =============================================================================

#[test]
fn test_page_layout_on_disk() {
    let (_temp, path) = setup_temp_file();
    let (_, end_offset) = Bucket::create(&path, 0).unwrap();
    let (bucket, _) = Bucket::create(&path, end_offset).unwrap();

    bucket.put(&Record::new("k1", "v1")).unwrap();
    bucket.put(&Record::new("k2", "v2")).unwrap();

    let bytes = fs::read(&path).unwrap();
    let page = &bytes[PAGE_SIZE as usize..2 * PAGE_SIZE as usize];

    assert_eq!(page[0], 2);
    assert_eq!(&page[1..1 + RECORD_SIZE], &encode_record("k1", "v1").unwrap()[..]);
    assert_eq!(
        &page[1 + RECORD_SIZE..1 + 2 * RECORD_SIZE],
        &encode_record("k2", "v2").unwrap()[..]
    );
    assert!(page[1 + 2 * RECORD_SIZE..].iter().all(|b| *b == 0));

    // First page untouched
    assert!(bytes[..PAGE_SIZE as usize].iter().all(|b| *b == 0));
}

#[test]
fn test_get_does_not_modify_page() {
    let (_temp, bucket) = setup_bucket();
    bucket.put(&Record::new("stable", "value")).unwrap();
    let before = fs::read(bucket.path()).unwrap();

    for _ in 0..3 {
        assert_eq!(bucket.get("stable").unwrap().value, "value");
        bucket.get_all().unwrap();
        let _ = bucket.get("missing");
    }

    assert_eq!(fs::read(bucket.path()).unwrap(), before);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_corrupt_record_count() {
    let (_temp, bucket) = setup_bucket();
    write_at(bucket.path(), 0, &[4]);

    match bucket.get("any") {
        Err(BucketKvError::Decode(msg)) => assert!(msg.contains("bucket 0")),
        other => panic!("Expected Decode error, got {:?}", other),
    }
    assert!(matches!(
        bucket.put(&Record::new("a", "b")),
        Err(BucketKvError::Decode(_))
    ));
}

#[test]
fn test_corrupt_slot_reports_location() {
    let (_temp, bucket) = setup_bucket();
    write_at(bucket.path(), 0, &[1]);
    write_at(bucket.path(), 1, &[0x80; 128]);

    match bucket.get_all() {
        Err(BucketKvError::Decode(msg)) => assert!(msg.contains("bucket 0 slot 0")),
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[test]
fn test_truncated_file_is_io_error() {
    let (_temp, bucket) = setup_bucket();
    OpenOptions::new()
        .write(true)
        .open(bucket.path())
        .unwrap()
        .set_len(0)
        .unwrap();

    match bucket.get("key") {
        Err(BucketKvError::BucketIo { bucket: id, op, .. }) => {
            assert_eq!(id, 0);
            assert_eq!(op, "map");
        }
        other => panic!("Expected BucketIo error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let (_temp, bucket) = setup_bucket();
    fs::remove_file(bucket.path()).unwrap();

    assert!(matches!(
        bucket.put(&Record::new("k", "v")),
        Err(BucketKvError::BucketIo { op: "open", .. })
    ));
}

//! Tests for Log Writer
//!
//! These tests verify:
//! - Opening creates the file without truncating existing content
//! - Appended frames have the exact documented size
//! - Oversized keys/values are rejected without touching the file
//! - Sync strategies (EveryWrite, EveryNEntries)
//! - Integration with reader

use std::fs;
use std::path::PathBuf;

use rawlog::error::{Field, FileOp};
use rawlog::{Entry, ErrorKind, LogError, LogOptions, LogWriter, SyncStrategy};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.log");
    (temp_dir, log_path)
}

fn file_len(path: &PathBuf) -> u64 {
    fs::metadata(path).unwrap().len()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_file() {
    let (_temp, log_path) = setup_temp_log();
    assert!(!log_path.exists());

    let writer = LogWriter::open(&log_path).unwrap();

    assert!(log_path.exists());
    assert_eq!(file_len(&log_path), 0);
    assert_eq!(writer.path(), log_path.as_path());
}

#[cfg(unix)]
#[test]
fn test_open_creates_owner_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, log_path) = setup_temp_log();
    LogWriter::open(&log_path).unwrap();

    let mode = fs::metadata(&log_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_reopen_appends_instead_of_truncating() {
    let (_temp, log_path) = setup_temp_log();

    let mut writer = LogWriter::open(&log_path).unwrap();
    writer.append(&Entry::new("a", "1")).unwrap();
    writer.close().unwrap();
    let len_after_first = file_len(&log_path);

    let mut writer = LogWriter::open(&log_path).unwrap();
    writer.append(&Entry::new("b", "2")).unwrap();
    writer.close().unwrap();

    assert_eq!(file_len(&log_path), len_after_first * 2);

    let mut reader = rawlog::LogReader::open(&log_path).unwrap();
    assert_eq!(reader.next_entry().unwrap(), Some(Entry::new("a", "1")));
    assert_eq!(reader.next_entry().unwrap(), Some(Entry::new("b", "2")));
    assert_eq!(reader.next_entry().unwrap(), None);
}

#[test]
fn test_open_missing_directory_fails_with_context() {
    let (temp, _) = setup_temp_log();
    let log_path = temp.path().join("missing").join("test.log");

    let err = LogWriter::open(&log_path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    match err {
        LogError::File { op, path, .. } => {
            assert_eq!(op, FileOp::OpenForAppend);
            assert_eq!(path, log_path);
        }
        other => panic!("Expected File error, got {:?}", other),
    }
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_grows_by_frame_size() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();

    let entry = Entry::new("alpha", "something");
    writer.append(&entry).unwrap();

    assert_eq!(file_len(&log_path), (2 + 5 + 4 + 9) as u64);

    let bytes = fs::read(&log_path).unwrap();
    assert_eq!(&bytes[..2], &5u16.to_le_bytes());
    assert_eq!(&bytes[2..7], b"alpha");
    assert_eq!(&bytes[7..11], &9u32.to_le_bytes());
    assert_eq!(&bytes[11..], b"something");
}

#[test]
fn test_append_empty_key_and_value() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();

    writer.append(&Entry::default()).unwrap();

    assert_eq!(file_len(&log_path), 6);
    let mut reader = writer.new_reader().unwrap();
    assert_eq!(reader.next_entry().unwrap(), Some(Entry::default()));
    assert_eq!(reader.next_entry().unwrap(), None);
}

#[test]
fn test_append_max_key_len() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();

    let entry = Entry::new(vec![0x5A; 65535], b"v".to_vec());
    writer.append(&entry).unwrap();

    assert_eq!(file_len(&log_path), (2 + 65535 + 4 + 1) as u64);
    let mut reader = writer.new_reader().unwrap();
    assert_eq!(reader.next_entry().unwrap(), Some(entry));
}

#[test]
fn test_oversized_key_rejected() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();
    writer.append(&Entry::new("before", "x")).unwrap();
    let len_before = file_len(&log_path);

    let err = writer
        .append(&Entry::new(vec![0u8; 65536], b"value".to_vec()))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EncodingTooLarge);
    assert!(matches!(
        err,
        LogError::EncodingTooLarge { field: Field::Key, len: 65536, .. }
    ));
    assert_eq!(file_len(&log_path), len_before);
    assert_eq!(writer.uncommitted_count(), 1);

    // The writer is still usable afterwards
    writer.append(&Entry::new("after", "y")).unwrap();
    let entries: Vec<_> = writer
        .new_reader()
        .unwrap()
        .entries()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(entries, vec![Entry::new("before", "x"), Entry::new("after", "y")]);
}

#[test]
fn test_duplicate_keys_are_kept() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();

    for i in 0..10 {
        writer.append(&Entry::new("same", format!("v{}", i))).unwrap();
    }

    let entries: Vec<_> = writer
        .new_reader()
        .unwrap()
        .entries()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(entries.len(), 10);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.key, b"same");
        assert_eq!(entry.value, format!("v{}", i).into_bytes());
    }
}

// =============================================================================
// Sync Strategy Tests
// =============================================================================

#[test]
fn test_os_buffered_never_syncs() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();

    for i in 0..3 {
        writer.append(&Entry::new(format!("k{}", i), "v")).unwrap();
    }
    assert_eq!(writer.uncommitted_count(), 3);

    writer.sync().unwrap();
    assert_eq!(writer.uncommitted_count(), 0);
}

#[test]
fn test_sync_every_write() {
    let (_temp, log_path) = setup_temp_log();
    let options = LogOptions::builder()
        .sync_strategy(SyncStrategy::EveryWrite)
        .build();
    let mut writer = LogWriter::open_with(&log_path, options).unwrap();

    writer.append(&Entry::new("k1", "v1")).unwrap();
    assert_eq!(writer.uncommitted_count(), 0);

    writer.append(&Entry::new("k2", "v2")).unwrap();
    assert_eq!(writer.uncommitted_count(), 0);
}

#[test]
fn test_sync_every_n_entries() {
    let (_temp, log_path) = setup_temp_log();
    let options = LogOptions::builder()
        .sync_strategy(SyncStrategy::EveryNEntries { count: 5 })
        .build();
    let mut writer = LogWriter::open_with(&log_path, options).unwrap();

    for i in 0..4 {
        writer.append(&Entry::new(format!("k{}", i), "v")).unwrap();
    }
    assert_eq!(writer.uncommitted_count(), 4);

    writer.append(&Entry::new("k5", "v")).unwrap();
    assert_eq!(writer.uncommitted_count(), 0);

    writer.append(&Entry::new("k6", "v")).unwrap();
    assert_eq!(writer.uncommitted_count(), 1);
}

// =============================================================================
// Reader Integration Tests
// =============================================================================

#[test]
fn test_new_reader_starts_at_beginning() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();

    writer.append(&Entry::new("first", "1")).unwrap();
    writer.append(&Entry::new("second", "2")).unwrap();

    let mut reader = writer.new_reader().unwrap();
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.next_entry().unwrap(), Some(Entry::new("first", "1")));
}

#[test]
fn test_close_does_not_affect_readers() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::open(&log_path).unwrap();
    writer.append(&Entry::new("k", "v")).unwrap();

    let mut reader = writer.new_reader().unwrap();
    writer.close().unwrap();

    assert_eq!(reader.next_entry().unwrap(), Some(Entry::new("k", "v")));
    assert_eq!(reader.next_entry().unwrap(), None);
    reader.close().unwrap();
}

// =============================================================================
// Failure Tests
// =============================================================================

#[cfg(target_os = "linux")]
#[test]
fn test_failed_write_disables_writer() {
    // Every write to /dev/full fails with ENOSPC
    let full = PathBuf::from("/dev/full");
    if !full.exists() {
        return;
    }
    let mut writer = LogWriter::open(&full).unwrap();
    assert!(!writer.is_failed());

    let err = writer.append(&Entry::new("k", "v")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(writer.is_failed());
    assert_eq!(writer.uncommitted_count(), 0);

    // Later appends are refused without touching the device again
    let err = writer.append(&Entry::new("k2", "v2")).unwrap_err();
    match err {
        LogError::File { op, source, .. } => {
            assert_eq!(op, FileOp::Append);
            assert!(source.raw_os_error().is_none());
        }
        other => panic!("Expected File error, got {:?}", other),
    }
}

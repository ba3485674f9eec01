//! Log scanning
//!
//! Walks a log read-only to find where its last complete entry ends.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{FileOp, LogError, Result};

use super::LogReader;

/// Result of scanning a log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of complete entries
    pub entries: u64,

    /// Offset just past the last complete entry
    pub valid_len: u64,

    /// File length observed once the scan stopped
    pub file_len: u64,

    /// Whether a partial record follows the last complete entry
    pub torn_tail: bool,
}

impl ScanSummary {
    /// Bytes after the last complete entry
    pub fn trailing_bytes(&self) -> u64 {
        self.file_len.saturating_sub(self.valid_len)
    }
}

/// Scan the log at `path` without modifying it
///
/// A torn tail is reported in the summary rather than as an error. The file
/// is never truncated.
pub fn scan(path: impl AsRef<Path>) -> Result<ScanSummary> {
    let path = path.as_ref();
    let mut reader = LogReader::open(path)?;
    let mut entries = 0u64;

    let torn_tail = loop {
        match reader.next_entry() {
            Ok(Some(_)) => entries += 1,
            Ok(None) => break false,
            Err(e) if e.is_truncated() => break true,
            Err(e) => return Err(e),
        }
    };

    let valid_len = reader.position();
    let file_len = std::fs::metadata(path)
        .map_err(|e| LogError::file(FileOp::Metadata, path, e))?
        .len();

    let summary = ScanSummary {
        entries,
        valid_len,
        file_len,
        torn_tail,
    };

    if torn_tail {
        warn!(
            path = %path.display(),
            valid_len,
            trailing = summary.trailing_bytes(),
            "log ends with a partial record"
        );
    } else {
        debug!(path = %path.display(), entries, valid_len, "scanned log");
    }

    Ok(summary)
}

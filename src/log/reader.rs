//! Log Reader
//!
//! Handles sequential replay of entries from the start of the log file.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::codec;
use crate::error::{Field, FileOp, LogError, Result};

use super::entry::{KEY_WIDTH, VALUE_WIDTH};
use super::Entry;

/// Reads entries from a log file through its own file handle
///
/// Each reader has an independent cursor starting at offset 0. Nothing is
/// cached: every call to [`next_entry`](Self::next_entry) reads the file as it
/// is now, so a reader that hit the end sees entries appended afterwards.
#[derive(Debug)]
pub struct LogReader {
    file: File,
    path: PathBuf,
    /// Offset of the next undecoded entry
    position: u64,
}

impl LogReader {
    /// Open a log file for reading. Never creates the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| LogError::file(FileOp::OpenForRead, &path, e))?;

        debug!(path = %path.display(), "opened log reader");

        Ok(Self {
            file,
            path,
            position: 0,
        })
    }

    /// Read the next entry from the log
    ///
    /// Returns:
    /// - `Ok(Some(entry))`: the next entry; the cursor moves past it
    /// - `Ok(None)`: clean end of log, no partial record follows
    /// - `Err(TruncatedRecord)`: the log ends inside a record. The cursor is
    ///   left at the start of that record, so calling again once the writer
    ///   has finished the append returns the complete entry.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        let start = self.position;

        match self.decode_entry() {
            Ok(Some(entry)) => {
                self.position = start + entry.encoded_len() as u64;
                Ok(Some(entry))
            }
            Ok(None) => {
                trace!(offset = start, "end of log");
                Ok(None)
            }
            Err(e) => {
                if let Err(seek_err) = self.rewind(start) {
                    debug!(offset = start, error = %e, "decode failed before rewind error");
                    return Err(seek_err);
                }
                if e.is_truncated() {
                    debug!(offset = start, error = %e, "torn record at tail of log");
                }
                Err(e.in_file(FileOp::Read, &self.path))
            }
        }
    }

    /// Iterate over the remaining entries
    pub fn entries(self) -> LogIterator {
        LogIterator {
            reader: self,
            done: false,
        }
    }

    /// Offset of the next entry this reader will decode
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the reader's file handle
    pub fn close(self) -> Result<()> {
        trace!(path = %self.path.display(), offset = self.position, "closed log reader");
        Ok(())
    }

    fn decode_entry(&mut self) -> Result<Option<Entry>> {
        let key = match codec::read_field(&mut self.file, KEY_WIDTH, Field::KeyLength, Field::Key)? {
            Some(key) => key,
            None => return Ok(None),
        };

        // Past the key, a missing value prefix is a torn record, not the end.
        let value = codec::read_field(&mut self.file, VALUE_WIDTH, Field::ValueLength, Field::Value)?
            .ok_or(LogError::TruncatedRecord {
                field: Field::ValueLength,
                expected: VALUE_WIDTH.prefix_len() as u64,
                found: 0,
            })?;

        Ok(Some(Entry { key, value }))
    }

    fn rewind(&mut self, offset: u64) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| LogError::file(FileOp::Seek, &self.path, e))?;
        Ok(())
    }
}

/// Iterator over log entries
///
/// Ends at the clean end of the log. A torn tail or I/O failure is yielded
/// once as an error, after which the iterator is finished.
pub struct LogIterator {
    reader: LogReader,
    done: bool,
}

impl LogIterator {
    /// Recover the underlying reader, e.g. to retry after a torn tail
    pub fn into_reader(self) -> LogReader {
        self.reader
    }
}

impl Iterator for LogIterator {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

//! Log Writer
//!
//! Handles appending entries to the end of the log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::config::{LogOptions, SyncStrategy};
use crate::error::{FileOp, LogError, Result};

use super::{Entry, LogReader};

/// Appends entries to a log file
///
/// The file is opened write-only in append mode, so every write lands at the
/// current end of file and existing content is never truncated. A single
/// writer is not internally synchronized; wrap it in a
/// [`SharedLogWriter`](super::SharedLogWriter) to append from several threads.
#[derive(Debug)]
pub struct LogWriter {
    file: File,
    path: PathBuf,
    options: LogOptions,
    /// Appends since the last fsync
    uncommitted: usize,
    /// Set once a write fails part-way; the log may end in a torn frame
    failed: bool,
}

impl LogWriter {
    /// Open or create a log with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, LogOptions::default())
    }

    /// Open or create a log
    pub fn open_with(path: impl AsRef<Path>, options: LogOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut open_options = OpenOptions::new();
        open_options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            open_options.mode(options.file_mode);
        }

        let file = open_options
            .open(&path)
            .map_err(|e| LogError::file(FileOp::OpenForAppend, &path, e))?;

        debug!(path = %path.display(), sync = ?options.sync_strategy, "opened log for append");

        Ok(Self {
            file,
            path,
            options,
            uncommitted: 0,
            failed: false,
        })
    }

    /// Append an entry at the end of the log
    ///
    /// The whole frame is encoded before anything is written, so an oversized
    /// key or value leaves the file untouched.
    ///
    /// A failed write may leave part of the frame on disk. The writer then
    /// refuses further appends so the torn frame stays the last bytes of the
    /// log, where readers report it as a truncated record.
    pub fn append(&mut self, entry: &Entry) -> Result<()> {
        if self.failed {
            return Err(LogError::file(
                FileOp::Append,
                &self.path,
                io::Error::new(
                    io::ErrorKind::Other,
                    "an earlier append failed part-way; the log may end in a torn record",
                ),
            ));
        }

        let frame = entry.encode()?;

        if let Err(e) = write_frame(&mut self.file, &frame, &mut self.failed) {
            warn!(path = %self.path.display(), error = %e, "append failed, writer disabled");
            return Err(LogError::file(FileOp::Append, &self.path, e));
        }
        self.uncommitted += 1;

        trace!(
            key_len = entry.key.len(),
            value_len = entry.value.len(),
            bytes = frame.len(),
            "appended entry"
        );

        match self.options.sync_strategy {
            SyncStrategy::OsBuffered => {}
            SyncStrategy::EveryWrite => self.sync()?,
            SyncStrategy::EveryNEntries { count } => {
                if self.uncommitted >= count {
                    self.sync()?;
                }
            }
        }

        Ok(())
    }

    /// Force appended data to durable storage
    pub fn sync(&mut self) -> Result<()> {
        self.file
            .sync_data()
            .map_err(|e| LogError::file(FileOp::Sync, &self.path, e))?;
        trace!(entries = self.uncommitted, "synced log");
        self.uncommitted = 0;
        Ok(())
    }

    /// Open an independent reader positioned at the start of this log
    pub fn new_reader(&self) -> Result<LogReader> {
        LogReader::open(&self.path)
    }

    /// Close the writer, syncing first unless the log is OS-buffered
    ///
    /// Readers opened from this writer keep their own handles and are
    /// unaffected.
    pub fn close(mut self) -> Result<()> {
        if self.options.sync_strategy != SyncStrategy::OsBuffered && self.uncommitted > 0 {
            self.sync()?;
        }
        debug!(path = %self.path.display(), "closed log writer");
        Ok(())
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options this writer was opened with
    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    /// Number of appends since the last sync
    pub fn uncommitted_count(&self) -> usize {
        self.uncommitted
    }

    /// Whether an earlier append failed and the writer no longer accepts entries
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

/// Write one whole frame, flagging `failed` if any part of it may be on disk.
fn write_frame<W: Write>(dst: &mut W, frame: &[u8], failed: &mut bool) -> io::Result<()> {
    dst.write_all(frame).map_err(|e| {
        *failed = true;
        e
    })
}

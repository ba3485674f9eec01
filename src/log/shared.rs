//! Shared Log Writer
//!
//! A cloneable, mutex-guarded writer for appending from several threads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::LogOptions;
use crate::error::Result;

use super::{Entry, LogReader, LogWriter};

/// Thread-safe handle to a single [`LogWriter`]
///
/// Two unsynchronized appends could interleave their frames and corrupt the
/// byte stream; here every append holds the lock for the whole frame.
#[derive(Debug, Clone)]
pub struct SharedLogWriter {
    inner: Arc<Mutex<LogWriter>>,
    path: PathBuf,
}

impl SharedLogWriter {
    /// Open or create a log with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(LogWriter::open(path)?))
    }

    /// Open or create a log
    pub fn open_with(path: impl AsRef<Path>, options: LogOptions) -> Result<Self> {
        Ok(Self::new(LogWriter::open_with(path, options)?))
    }

    /// Wrap an already open writer
    pub fn new(writer: LogWriter) -> Self {
        let path = writer.path().to_path_buf();
        Self {
            inner: Arc::new(Mutex::new(writer)),
            path,
        }
    }

    /// Append an entry while holding the writer lock
    pub fn append(&self, entry: &Entry) -> Result<()> {
        self.inner.lock().append(entry)
    }

    /// Force appended data to durable storage
    pub fn sync(&self) -> Result<()> {
        self.inner.lock().sync()
    }

    /// Open an independent reader positioned at the start of the log
    pub fn new_reader(&self) -> Result<LogReader> {
        LogReader::open(&self.path)
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the writer if this is the last handle
    ///
    /// Returns `Ok(Some(self))` unchanged while other clones are still alive.
    pub fn close(self) -> Result<Option<Self>> {
        let path = self.path;
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => {
                mutex.into_inner().close()?;
                Ok(None)
            }
            Err(inner) => Ok(Some(Self { inner, path })),
        }
    }
}

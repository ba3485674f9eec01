//! Error types for rawlog
//!
//! Provides a unified error type for all log operations.
//!
//! Reaching the end of the log is not an error: readers report it as
//! `Ok(None)`. Everything else a caller may need to branch on is a variant
//! here, see [`LogError::kind`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Unified error type for rawlog operations
#[derive(Debug, Error)]
pub enum LogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Failure on a bare stream (codec used outside a log file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure on a log file, with the path and operation attached
    #[error("failed to {op} log at '{}': {source}", .path.display())]
    File {
        op: FileOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    /// A key or value does not fit its length prefix. Nothing was written.
    #[error("{field} of {len} bytes exceeds the {}-bit length prefix (max {})", .width.bits(), .width.max_len())]
    EncodingTooLarge {
        field: Field,
        len: usize,
        width: crate::codec::LengthWidth,
    },

    // -------------------------------------------------------------------------
    // Decoding Errors
    // -------------------------------------------------------------------------
    /// The log ends part-way through a record.
    #[error("truncated record: {field} needs {expected} bytes, only {found} available")]
    TruncatedRecord {
        field: Field,
        expected: u64,
        found: u64,
    },
}

/// Coarse classification of a [`LogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    EncodingTooLarge,
    TruncatedRecord,
}

/// Filesystem operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    OpenForAppend,
    OpenForRead,
    Append,
    Read,
    Seek,
    Sync,
    Metadata,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileOp::OpenForAppend => "open (for append)",
            FileOp::OpenForRead => "open (for reading)",
            FileOp::Append => "append to",
            FileOp::Read => "read",
            FileOp::Seek => "seek in",
            FileOp::Sync => "sync",
            FileOp::Metadata => "stat",
        };
        f.write_str(s)
    }
}

/// Which part of a record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    KeyLength,
    Key,
    ValueLength,
    Value,
    /// Used by the codec on bare streams
    PayloadLength,
    Payload,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::KeyLength => "key length",
            Field::Key => "key",
            Field::ValueLength => "value length",
            Field::Value => "value",
            Field::Payload => "payload",
            Field::PayloadLength => "payload length",
        };
        f.write_str(s)
    }
}

impl LogError {
    /// Wrap a filesystem error with the operation and path it came from
    pub fn file(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LogError::File {
            op,
            path: path.into(),
            source,
        }
    }

    /// Attach file context to a bare `Io` error; other variants pass through.
    pub(crate) fn in_file(self, op: FileOp, path: &std::path::Path) -> Self {
        match self {
            LogError::Io(source) => LogError::file(op, path, source),
            other => other,
        }
    }

    /// Which branch of the taxonomy this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogError::Io(_) | LogError::File { .. } => ErrorKind::Io,
            LogError::EncodingTooLarge { .. } => ErrorKind::EncodingTooLarge,
            LogError::TruncatedRecord { .. } => ErrorKind::TruncatedRecord,
        }
    }

    /// True for a torn tail: no more complete entries right now
    pub fn is_truncated(&self) -> bool {
        self.kind() == ErrorKind::TruncatedRecord
    }
}

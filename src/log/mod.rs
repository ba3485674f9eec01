//! Append-only Log Module
//!
//! A single file holding an ordered sequence of (key, value) entries.
//!
//! ## Responsibilities
//! - Append entries at the end of the file, never rewriting earlier bytes
//! - Replay entries from the start through independent readers
//! - Distinguish a clean end of log from a torn trailing record
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ Entry 1                                         │
//! │ ┌────────────┬──────┬──────────────┬─────────┐  │
//! │ │KeyLen (2)  │ Key  │ ValueLen (4) │ Value   │  │
//! │ └────────────┴──────┴──────────────┴─────────┘  │
//! ├─────────────────────────────────────────────────┤
//! │ Entry 2                                         │
//! │ ┌────────────┬──────┬──────────────┬─────────┐  │
//! │ │KeyLen (2)  │ Key  │ ValueLen (4) │ Value   │  │
//! │ └────────────┴──────┴──────────────┴─────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are little-endian. There is no header, footer or checksum; the
//! file length is authoritative.

mod entry;
mod reader;
mod scan;
mod shared;
mod writer;

pub use entry::{Entry, FRAME_OVERHEAD, KEY_WIDTH, VALUE_WIDTH};
pub use reader::{LogIterator, LogReader};
pub use scan::{scan, ScanSummary};
pub use shared::SharedLogWriter;
pub use writer::LogWriter;

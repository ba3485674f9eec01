//! # rawlog
//!
//! A minimal durable append-only log:
//! - Writers append length-prefixed (key, value) entries to a single file
//! - Readers replay entries sequentially from the start, each with its own cursor
//! - Torn trailing records are reported separately from the clean end of log
//!
//! ## Architecture Overview
//!
//! ```text
//!   ┌─────────────┐                     ┌─────────────┐
//!   │  LogWriter  │                     │  LogReader  │ × N
//!   │  (append)   │                     │ (own cursor)│
//!   └──────┬──────┘                     └──────┬──────┘
//!          │                                   │
//!          │          ┌─────────────┐          │
//!          └─────────►│    Codec    │◄─────────┘
//!                     │ (len-prefix)│
//!                     └──────┬──────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │  Log file   │
//!                     └─────────────┘
//! ```
//!
//! Writers and readers share no in-process state; the file path is the only
//! point of rendezvous.
//!
//! ## Example
//!
//! ```no_run
//! use rawlog::{Entry, LogWriter};
//!
//! # fn main() -> rawlog::Result<()> {
//! let mut writer = LogWriter::open("events.log")?;
//! writer.append(&Entry::new("alpha", "something"))?;
//!
//! let mut reader = writer.new_reader()?;
//! while let Some(entry) = reader.next_entry()? {
//!     println!("{:?} => {:?}", entry.key, entry.value);
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod log;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, LogError, Result};
pub use config::{LogOptions, SyncStrategy};
pub use codec::{read_length_prefixed, write_length_prefixed, LengthWidth};
pub use log::{scan, Entry, LogIterator, LogReader, LogWriter, ScanSummary, SharedLogWriter};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rawlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

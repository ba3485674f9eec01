//! Configuration for rawlog writers
//!
//! Centralized options with sensible defaults.

/// Options applied when opening a [`LogWriter`](crate::LogWriter)
#[derive(Debug, Clone)]
pub struct LogOptions {
    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync after appends
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // File Creation
    // -------------------------------------------------------------------------
    /// Permission bits for a newly created log file (Unix only)
    pub file_mode: u32,
}

/// Sync strategy for appended entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Never fsync from `append`; the OS flushes on its own schedule
    OsBuffered,

    /// fsync after every append (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced appends
    EveryNEntries { count: usize },
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            sync_strategy: SyncStrategy::OsBuffered,
            file_mode: 0o600,
        }
    }
}

impl LogOptions {
    /// Create a new options builder
    pub fn builder() -> LogOptionsBuilder {
        LogOptionsBuilder::default()
    }
}

/// Builder for LogOptions
#[derive(Default)]
pub struct LogOptionsBuilder {
    options: LogOptions,
}

impl LogOptionsBuilder {
    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.options.sync_strategy = strategy;
        self
    }

    /// Set the permission bits used when the log file is created
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.options.file_mode = mode;
        self
    }

    pub fn build(self) -> LogOptions {
        self.options
    }
}

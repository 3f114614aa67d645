//! SQLite connection configuration.

use std::path::{Path, PathBuf};

/// Configuration for opening the report database.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or `:memory:` for an in-memory database.
    pub path: PathBuf,

    /// Enable write-ahead logging.
    pub wal_mode: bool,

    /// Enforce foreign keys.
    pub foreign_keys: bool,

    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl SqliteConfig {
    /// Create a configuration for the given database path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Create an in-memory configuration for testing.
    pub fn memory() -> Self {
        Self::new(":memory:")
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("testsink.db"),
            wal_mode: true,
            foreign_keys: true,
            busy_timeout_ms: 5_000,
        }
    }
}

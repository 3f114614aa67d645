//! Error types for SQLite storage.

use testsink_core::{KeyError, StorageError};
use thiserror::Error;

/// SQLite storage error type.
#[derive(Error, Debug)]
pub enum SqliteError {
    /// Database connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Query error: {0}")]
    Query(String),

    /// Schema/migration error.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A fact insert did not yield a usable generated ID.
    #[error("Insert for {table} returned invalid row ID {id}")]
    InvalidRowId {
        /// Table the insert targeted.
        table: &'static str,
        /// The offending generated ID.
        id: i64,
    },

    /// Natural-key derivation failed for the report being stored.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Underlying rusqlite error.
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

impl From<SqliteError> for StorageError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Key(key) => Self::Key(key),
            other => Self::Backend(other.to_string()),
        }
    }
}

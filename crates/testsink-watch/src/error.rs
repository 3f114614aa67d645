//! Error types for the file watching system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during file watching operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File system watching error.
    #[error("File watching error: {0}")]
    Watch(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file stayed locked through every retry attempt.
    #[error("File '{path}' still locked after {attempts} attempts")]
    FileBusy {
        /// Path that could not be opened.
        path: PathBuf,
        /// Number of open attempts made.
        attempts: u32,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for file watching operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}

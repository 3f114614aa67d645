//! File event types and filtering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents a file system event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEvent {
    /// Kind of file event.
    pub kind: FileEventKind,

    /// Path to the file.
    pub path: PathBuf,

    /// Timestamp when the event was observed.
    pub timestamp: DateTime<Utc>,
}

impl FileEvent {
    /// Create a new file event.
    pub fn new(kind: FileEventKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            timestamp: Utc::now(),
        }
    }

    /// Get the file extension, lowercased, if available.
    pub fn extension(&self) -> Option<String> {
        self.path.extension()?.to_str().map(|s| s.to_lowercase())
    }

    /// Get the file name as a string.
    pub fn file_name(&self) -> Option<String> {
        self.path.file_name()?.to_str().map(|s| s.to_string())
    }
}

/// Kinds of file events that can occur.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FileEventKind {
    /// File was created.
    Created,
    /// File was modified.
    Modified,
    /// File was deleted.
    Deleted,
    /// Unknown event type.
    Unknown(String),
}

impl FileEventKind {
    /// Check if this event represents a file creation.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }

    /// Get a string representation of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Event filtering criteria.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Include only these file extensions (lowercased, without the dot).
    pub extensions: Vec<String>,
}

impl EventFilter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension to include.
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into().to_lowercase());
        self
    }

    /// Check if an event passes this filter.
    pub fn matches(&self, event: &FileEvent) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match event.extension() {
            Some(ext) => self.extensions.contains(&ext),
            None => false,
        }
    }
}

//! Notify-based file watching backend with debouncing.

use crate::error::{Error, Result};
use crate::events::{EventFilter, FileEvent, FileEventKind};
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{
    new_debouncer, DebounceEventResult, DebouncedEvent, Debouncer, RecommendedCache,
};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Options for a single watch.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Whether to watch subdirectories.
    pub recursive: bool,

    /// Event filter applied before events are forwarded.
    pub filter: Option<EventFilter>,

    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
}

impl WatchOptions {
    /// Create options with the default debounce window.
    pub fn new() -> Self {
        Self {
            recursive: false,
            filter: None,
            debounce_ms: 500,
        }
    }

    /// Set recursive watching.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the event filter.
    pub fn with_filter(mut self, filter: EventFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the debounce window.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Notify-based file watcher with debouncing support.
///
/// Events are forwarded over an unbounded tokio channel from the debouncer's
/// own thread; the receiving side decides what to do with them, so the
/// watcher never blocks on slow consumers.
pub struct NotifyWatcher {
    debouncer: Option<Debouncer<RecommendedWatcher, RecommendedCache>>,
    event_sender: Option<mpsc::UnboundedSender<FileEvent>>,
}

impl NotifyWatcher {
    /// Create a new notify-based watcher.
    pub fn new() -> Self {
        Self {
            debouncer: None,
            event_sender: None,
        }
    }

    /// Set the event sender. Must be called before [`Self::watch`].
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<FileEvent>) {
        self.event_sender = Some(sender);
    }

    /// Start watching the given path.
    pub fn watch(&mut self, path: &Path, options: WatchOptions) -> Result<()> {
        let sender = self.event_sender.clone().ok_or_else(|| {
            Error::Internal("Event sender not set before calling watch".to_string())
        })?;
        let filter = options.filter.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(options.debounce_ms),
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    for event in events {
                        for file_event in convert_notify_event(event) {
                            if filter.as_ref().is_some_and(|f| !f.matches(&file_event)) {
                                continue;
                            }
                            if sender.send(file_event).is_err() {
                                // Receiver dropped; the watcher is shutting down.
                                return;
                            }
                        }
                    }
                }
                Err(errors) => {
                    for err in errors {
                        error!("Notify error: {:?}", err);
                    }
                }
            },
        )
        .map_err(|e| Error::Watch(format!("Failed to create notify watcher: {}", e)))?;

        let mode = if options.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        debouncer
            .watch(path, mode)
            .map_err(|e| Error::Watch(format!("Failed to watch path: {}", e)))?;

        self.debouncer = Some(debouncer);
        info!(path = %path.display(), recursive = options.recursive, "Watch started");

        Ok(())
    }

    /// Stop watching and drop the underlying debouncer.
    pub fn stop(&mut self) {
        self.debouncer = None;
    }
}

impl Default for NotifyWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a debounced notify event into file events, one per affected path.
fn convert_notify_event(event: DebouncedEvent) -> Vec<FileEvent> {
    let kind = match event.event.kind {
        EventKind::Create(_) => FileEventKind::Created,
        EventKind::Modify(_) => FileEventKind::Modified,
        EventKind::Remove(_) => FileEventKind::Deleted,
        other => FileEventKind::Unknown(format!("{:?}", other)),
    };

    event
        .event
        .paths
        .iter()
        .map(|path| FileEvent::new(kind.clone(), path.clone()))
        .collect()
}

//! Tests for NotifyWatcher filter behavior.
//!
//! These exercise the real notify backend against a temp directory.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use testsink_watch::{EventFilter, FileEvent, NotifyWatcher, WatchOptions};
use tokio::sync::mpsc;

#[tokio::test]
async fn watcher_filters_by_xml_extension() {
    let mut watcher = NotifyWatcher::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<FileEvent>();
    watcher.set_event_sender(tx);

    let temp_dir = TempDir::new().unwrap();

    let options = WatchOptions::new()
        .with_filter(EventFilter::new().with_extension("xml"))
        .with_debounce_ms(100);

    watcher.watch(temp_dir.path(), options).unwrap();

    fs::write(temp_dir.path().join("report.xml"), "<Reports/>").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a report").unwrap();

    // Wait for debounce
    tokio::time::sleep(Duration::from_millis(600)).await;

    let mut received_paths: Vec<PathBuf> = vec![];
    while let Ok(event) = rx.try_recv() {
        received_paths.push(event.path.clone());
    }

    assert!(
        received_paths.iter().any(|p| p.ends_with("report.xml")),
        "Should receive event for .xml file, got: {:?}",
        received_paths
    );
    assert!(
        !received_paths.iter().any(|p| p.ends_with("notes.txt")),
        "Should NOT receive event for .txt file, got: {:?}",
        received_paths
    );
}

#[tokio::test]
async fn non_recursive_watch_ignores_subdirectories() {
    let mut watcher = NotifyWatcher::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<FileEvent>();
    watcher.set_event_sender(tx);

    let temp_dir = TempDir::new().unwrap();
    let sub_dir = temp_dir.path().join("archive");
    fs::create_dir_all(&sub_dir).unwrap();

    let options = WatchOptions::new()
        .with_filter(EventFilter::new().with_extension("xml"))
        .with_debounce_ms(100);

    watcher.watch(temp_dir.path(), options).unwrap();

    fs::write(temp_dir.path().join("top.xml"), "<Reports/>").unwrap();
    fs::write(sub_dir.join("nested.xml"), "<Reports/>").unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;

    let mut received_paths: Vec<PathBuf> = vec![];
    while let Ok(event) = rx.try_recv() {
        received_paths.push(event.path.clone());
    }

    assert!(
        received_paths.iter().any(|p| p.ends_with("top.xml")),
        "Should receive event for top-level file, got: {:?}",
        received_paths
    );
    assert!(
        !received_paths.iter().any(|p| p.ends_with("nested.xml")),
        "Should NOT receive event for nested file, got: {:?}",
        received_paths
    );
}

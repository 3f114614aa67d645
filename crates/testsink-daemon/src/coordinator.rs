//! Ingest coordination: file-creation events in, stored reports out.

use crate::config::DaemonConfig;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use testsink_core::{ReportSink, StoredReport};
use testsink_parser::parse_report;
use testsink_watch::{open_when_unlocked, EventFilter, NotifyWatcher, RetryPolicy, WatchOptions};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Wires the directory watcher to the extraction and load pipeline.
pub struct IngestCoordinator {
    config: DaemonConfig,
    sink: Arc<dyn ReportSink>,
}

impl IngestCoordinator {
    /// Create a coordinator over the given configuration and report sink.
    pub fn new(config: DaemonConfig, sink: Arc<dyn ReportSink>) -> Self {
        Self { config, sink }
    }

    /// Watch the input directory and process reports until ctrl-c.
    ///
    /// Each created `*.xml` file is handled on its own task; a file stuck
    /// behind the station's write lock waits asynchronously and never delays
    /// the handling of other events. Per-file failures are logged and the
    /// event is consumed — there is no re-queue.
    pub async fn run(&self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = NotifyWatcher::new();
        watcher.set_event_sender(tx);

        let options = WatchOptions::new()
            .with_recursive(false)
            .with_filter(EventFilter::new().with_extension("xml"))
            .with_debounce_ms(self.config.watch.debounce_ms);

        watcher
            .watch(&self.config.input_dir, options)
            .context("Failed to start directory watch")?;

        info!(
            input = %self.config.input_dir.display(),
            "Watching for new XML reports"
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                event = rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    if !event.kind.is_created() {
                        continue;
                    }

                    let sink = Arc::clone(&self.sink);
                    let retry = self.config.retry.policy();
                    let output_dir = self.config.output_dir.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            process_file(&event.path, sink, &retry, &output_dir).await
                        {
                            error!(
                                path = %event.path.display(),
                                error = %format!("{e:#}"),
                                "Report ingestion failed"
                            );
                        }
                    });
                }
            }
        }

        watcher.stop();
        Ok(())
    }
}

/// Process one report file: open it (waiting out the writer's lock), parse,
/// store, and log the resolved IDs.
pub async fn process_file(
    path: &Path,
    sink: Arc<dyn ReportSink>,
    retry: &RetryPolicy,
    output_dir: &Path,
) -> Result<StoredReport> {
    info!(path = %path.display(), "Processing report file");

    let mut file = open_when_unlocked(path, retry).await?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let report = parse_report(&xml)?;
    let stored = sink.store_report(&report).await?;

    info!(
        test_id = stored.test_id,
        product_id = stored.product_id,
        family_id = stored.family_id,
        customer_id = stored.customer_id,
        steps = stored.steps.len(),
        "Stored test record"
    );
    for step in &stored.steps {
        debug!(step_id = step.step_id, name = %step.name, "Stored step measurement");
    }

    // Reserved export interface: the path is computed per processed file but
    // nothing is written to it.
    debug!(
        export = %export_path(output_dir, path).display(),
        "Export path reserved"
    );

    Ok(stored)
}

/// Per-report export path: `<output_dir>/<input stem>.txt`.
pub fn export_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut out = output_dir.join(stem);
    out.set_extension("txt");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_path_swaps_directory_and_extension() {
        assert_eq!(
            export_path(Path::new("/out"), Path::new("/in/unit-0001.xml")),
            PathBuf::from("/out/unit-0001.txt")
        );
    }

    #[test]
    fn export_path_handles_extensionless_input() {
        assert_eq!(
            export_path(Path::new("/out"), Path::new("/in/report")),
            PathBuf::from("/out/report.txt")
        );
    }
}

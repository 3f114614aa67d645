// testsink daemon - report ingestion service
//
// Watches a test-station output directory for new XML report files,
// extracts structured test results from each one, and loads them into the
// relational QA store.

use clap::Parser;
use std::process;
use std::sync::Arc;
use testsink_daemon::{cli::Cli, config::DaemonConfig, coordinator::IngestCoordinator};
use testsink_sqlite::{ReportStore, SqliteConfig, SqlitePool};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit codes for different scenarios
mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 1;
    pub const DATABASE_ERROR: i32 = 2;
    pub const OTHER_ERROR: i32 = 3;
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "testsink_daemon={log_level},testsink_sqlite={log_level},testsink_watch={log_level}"
        ))
    });
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting testsink daemon v{}", env!("CARGO_PKG_VERSION"));

    let config = match DaemonConfig::load(cli.config, cli.input_dir, cli.output_dir, cli.database)
    {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e:#}");
            process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    if !config.input_dir.is_dir() {
        error!(
            "Input directory {} does not exist or is not a directory",
            config.input_dir.display()
        );
        process::exit(exit_codes::CONFIG_ERROR);
    }

    let pool = match SqlitePool::new(SqliteConfig::new(&config.database.path)) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open report database: {e}");
            process::exit(exit_codes::DATABASE_ERROR);
        }
    };
    let store = Arc::new(ReportStore::new(pool));

    let coordinator = IngestCoordinator::new(config, store);
    match coordinator.run().await {
        Ok(()) => {
            info!("Ingestion service stopped");
            process::exit(exit_codes::SUCCESS);
        }
        Err(e) => {
            error!("Ingestion service failed: {e:#}");
            process::exit(exit_codes::OTHER_ERROR);
        }
    }
}

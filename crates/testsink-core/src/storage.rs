//! Storage abstraction the load pipeline writes through.
//!
//! The concrete SQLite implementation lives in `testsink-sqlite`; the
//! coordinator only sees this trait, which keeps the ingestion flow testable
//! without a database.

use crate::keys::KeyError;
use crate::report::UutReport;
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a report sink.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Natural-key derivation failed for this report.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Backend-specific failure (connection, statement, transaction).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// IDs resolved and generated while persisting one report.
///
/// Dimension IDs are stable across reports carrying the same natural keys;
/// the test ID is generated fresh per stored report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    /// Generated ID of the inserted test record.
    pub test_id: i64,
    /// Resolved product dimension ID.
    pub product_id: i64,
    /// Resolved product-family dimension ID.
    pub family_id: i64,
    /// Resolved customer dimension ID.
    pub customer_id: i64,
    /// One entry per persisted step measurement, in document order.
    pub steps: Vec<StoredStep>,
}

/// Dimension resolution for one persisted step measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredStep {
    /// Resolved step dimension ID.
    pub step_id: i64,
    /// Step description the ID was resolved for.
    pub name: String,
}

/// A destination for extracted reports.
///
/// Implementations are the sole writers of the dimension tables; repeated
/// stores of reports with identical natural keys must resolve to the same
/// dimension IDs without creating duplicate rows.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Persist one report and return the IDs it resolved to.
    async fn store_report(&self, report: &UutReport) -> StorageResult<StoredReport>;
}

//! Core domain types for the testsink ingestion service.
//!
//! This crate defines the shapes that cross crate boundaries: the extracted
//! test report and its step records, the natural-key derivation rules used by
//! the dimension tables, and the storage trait the load pipeline writes
//! through. It has no I/O of its own — parsing lives in `testsink-parser`,
//! persistence in `testsink-sqlite`.

pub mod keys;
pub mod report;
pub mod storage;

pub use keys::{family_code, Customer, KeyError};
pub use report::{StepRecord, UutReport, NO_DATA};
pub use storage::{ReportSink, StorageError, StorageResult, StoredReport, StoredStep};

//! Extracted test-report types.

use serde::{Deserialize, Serialize};

/// Sentinel stored in place of a scalar field the report did not carry.
///
/// The downstream QA schema predates this service and expects the literal
/// string rather than NULL for the report-level columns.
pub const NO_DATA: &str = "No data";

/// One UUT (unit under test) report, as extracted from a station XML file.
///
/// Scalar fields fall back to [`NO_DATA`] when the source document is missing
/// them; extraction never rejects a report for incomplete fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UutReport {
    /// Model number of the tested product; also the product's natural key.
    pub model_number: String,

    /// Serial number of the tested unit.
    pub serial_number: String,

    /// Identifier of the test station that produced the report.
    pub station_id: String,

    /// Version of the test sequence that ran.
    pub sequence_version: String,

    /// Login name of the operator.
    pub operator: String,

    /// Test start date, `YYYY-MM-DD` or [`NO_DATA`].
    pub start_date: String,

    /// Test start time, `HH:MM:SS` or [`NO_DATA`].
    pub start_time: String,

    /// Test end date, `YYYY-MM-DD` or [`NO_DATA`].
    pub end_date: String,

    /// Test end time, `HH:MM:SS` or [`NO_DATA`].
    pub end_time: String,

    /// Overall UUT result (e.g. `Passed`, `Failed`) or [`NO_DATA`].
    pub result: String,

    /// Nested test-primitive step records, in document order.
    /// Duplicate step names are preserved; each occurrence becomes its own
    /// measurement row.
    pub steps: Vec<StepRecord>,
}

/// One nested test-primitive measurement.
///
/// Identity (`name`) is required and non-empty; every measurement field is
/// optional and absent fields persist as SQL NULL, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step description; the natural key of the step dimension.
    pub name: String,

    /// Step status as reported (e.g. `Passed`, `Failed`).
    pub status: Option<String>,

    /// Elapsed time of the step in seconds.
    pub total_time: Option<f64>,

    /// Measured numeric value.
    pub numeric: Option<f64>,

    /// Lower tolerance bound for the measurement.
    pub low: Option<f64>,

    /// Upper tolerance bound for the measurement.
    pub high: Option<f64>,

    /// Number of loop iterations executed.
    pub num_loops: Option<i64>,

    /// Number of passing loop iterations.
    pub num_passed: Option<i64>,

    /// Number of failing loop iterations.
    pub num_failed: Option<i64>,
}

impl StepRecord {
    /// Create a step record carrying only its identity.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

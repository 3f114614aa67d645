//! Report persistence: dimension get-or-create and the per-report load.

use crate::connection::SqlitePool;
use crate::error::{SqliteError, SqliteResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use testsink_core::{
    family_code, Customer, ReportSink, StepRecord, StorageResult, StoredReport, StoredStep,
    UutReport,
};
use tracing::debug;

/// Sole writer of the report schema.
#[derive(Clone)]
pub struct ReportStore {
    pool: SqlitePool,
}

impl ReportStore {
    /// Create a store over the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist one report atomically.
    ///
    /// Resolves the product, family and customer dimensions (get-or-create),
    /// inserts the test fact row, then one measurement row per step with its
    /// step dimension resolved the same way. Everything runs inside a single
    /// transaction: a failure anywhere rolls the whole report back.
    pub async fn store_report(&self, report: &UutReport) -> SqliteResult<StoredReport> {
        let pool = self.pool.clone();
        let report = report.clone();

        tokio::task::spawn_blocking(move || {
            pool.with_connection_mut(|conn| store_report_blocking(conn, &report))
        })
        .await
        .map_err(|e| SqliteError::Query(format!("storage task failed: {e}")))?
    }
}

#[async_trait]
impl ReportSink for ReportStore {
    async fn store_report(&self, report: &UutReport) -> StorageResult<StoredReport> {
        ReportStore::store_report(self, report)
            .await
            .map_err(Into::into)
    }
}

/// SELECT/INSERT statement pair for one dimension table.
struct Dimension {
    select: &'static str,
    insert: &'static str,
}

impl Dimension {
    const PRODUCT: Self = Self {
        select: "SELECT Product_ID FROM TestProducts WHERE Type = ?1",
        insert: "INSERT INTO TestProducts (Type) VALUES (?1) ON CONFLICT(Type) DO NOTHING",
    };

    const FAMILY: Self = Self {
        select: "SELECT Family_ID FROM ProductFamilies WHERE ProductFamily = ?1",
        insert: "INSERT INTO ProductFamilies (ProductFamily) VALUES (?1) \
                 ON CONFLICT(ProductFamily) DO NOTHING",
    };

    const CUSTOMER: Self = Self {
        select: "SELECT Customer_ID FROM Customer WHERE CustomerName = ?1",
        insert: "INSERT INTO Customer (CustomerName) VALUES (?1) \
                 ON CONFLICT(CustomerName) DO NOTHING",
    };

    const STEP: Self = Self {
        select: "SELECT Step_ID FROM TestSteps WHERE StepDescription = ?1",
        insert: "INSERT INTO TestSteps (StepDescription) VALUES (?1) \
                 ON CONFLICT(StepDescription) DO NOTHING",
    };
}

/// Resolve a dimension row by natural key, creating it on first sighting.
///
/// Idempotent: the same key always resolves to the same ID. The insert uses
/// `ON CONFLICT DO NOTHING` + re-select, so losing a race to another writer
/// resolves to the winner's row instead of failing or duplicating.
fn get_or_create(conn: &Connection, dim: &Dimension, key: &str) -> SqliteResult<i64> {
    if let Some(id) = conn
        .query_row(dim.select, [key], |row| row.get(0))
        .optional()?
    {
        return Ok(id);
    }

    conn.execute(dim.insert, [key])?;
    conn.query_row(dim.select, [key], |row| row.get(0))
        .optional()?
        .ok_or_else(|| {
            SqliteError::Query(format!("dimension row missing after insert for key '{key}'"))
        })
}

fn store_report_blocking(conn: &mut Connection, report: &UutReport) -> SqliteResult<StoredReport> {
    let tx = conn.transaction()?;

    let product_id = get_or_create(&tx, &Dimension::PRODUCT, &report.model_number)?;
    debug!(product_id, model = %report.model_number, "Resolved product");

    let family = family_code(&report.model_number)?;
    let family_id = get_or_create(&tx, &Dimension::FAMILY, &family)?;
    debug!(family_id, family = %family, "Resolved product family");

    let customer = Customer::from_model_number(&report.model_number);
    let customer_id = get_or_create(&tx, &Dimension::CUSTOMER, customer.as_str())?;
    debug!(customer_id, customer = %customer, "Resolved customer");

    let test_id = insert_test_row(&tx, product_id, family_id, customer_id, report)?;
    if test_id <= 0 {
        return Err(SqliteError::InvalidRowId {
            table: "TestData",
            id: test_id,
        });
    }

    let mut steps = Vec::with_capacity(report.steps.len());
    for step in &report.steps {
        let step_id = get_or_create(&tx, &Dimension::STEP, &step.name)?;
        insert_step_row(&tx, test_id, step_id, step)?;
        steps.push(StoredStep {
            step_id,
            name: step.name.clone(),
        });
    }

    tx.commit()?;

    Ok(StoredReport {
        test_id,
        product_id,
        family_id,
        customer_id,
        steps,
    })
}

fn insert_test_row(
    conn: &Connection,
    product_id: i64,
    family_id: i64,
    customer_id: i64,
    report: &UutReport,
) -> SqliteResult<i64> {
    conn.execute(
        "INSERT INTO TestData (Product_ID, Family_ID, Customer_ID, SerialNumber, \
         TestStartDate, TestStartTime, TestEndDate, TestEndTime, Station_ID, \
         TestSequenceVersion, Operator, Result) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            product_id,
            family_id,
            customer_id,
            report.serial_number,
            report.start_date,
            report.start_time,
            report.end_date,
            report.end_time,
            report.station_id,
            report.sequence_version,
            report.operator,
            report.result,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn insert_step_row(
    conn: &Connection,
    test_id: i64,
    step_id: i64,
    step: &StepRecord,
) -> SqliteResult<()> {
    conn.execute(
        "INSERT INTO TestStepData (Test_ID, Step_ID, StepStatus, StepTime, Measurement, \
         LowTolerance, HighTolerance, NumLoops, NumPassed, NumFailed) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            test_id,
            step_id,
            step.status,
            step.total_time,
            step.numeric,
            step.low,
            step.high,
            step.num_loops,
            step.num_passed,
            step.num_failed,
        ],
    )?;

    Ok(())
}

//! Schema management and migrations.

use crate::error::{SqliteError, SqliteResult};
use rusqlite::Connection;
use tracing::{debug, info};

/// Schema version - increment when making schema changes
const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations.
pub fn apply_migrations(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version = get_current_version(conn)?;
    debug!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking migrations"
    );

    if current_version < SCHEMA_VERSION {
        info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Applying schema migrations"
        );
        apply_migration_v1(conn)?;
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> SqliteResult<i32> {
    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);

    Ok(version.unwrap_or(0))
}

fn record_migration(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: dimension and fact tables for test reports
fn apply_migration_v1(conn: &Connection) -> SqliteResult<()> {
    debug!("Applying migration v1: report schema");

    conn.execute_batch(SCHEMA_V1)
        .map_err(|e| SqliteError::Schema(format!("Failed to apply v1 schema: {}", e)))?;

    record_migration(conn, 1)?;
    info!("Migration v1 applied successfully");
    Ok(())
}

/// Initial schema SQL.
///
/// Table and column names match the pre-existing QA schema. Every dimension
/// key carries a UNIQUE constraint so a get-or-create race can only ever
/// resolve to the existing row, never a duplicate.
const SCHEMA_V1: &str = r#"
-- ============================================================================
-- Dimension tables (append-only, keyed by a natural string key)
-- ============================================================================

CREATE TABLE IF NOT EXISTS TestProducts (
    Product_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    Type TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS ProductFamilies (
    Family_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    ProductFamily TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS Customer (
    Customer_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    CustomerName TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS TestSteps (
    Step_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    StepDescription TEXT NOT NULL UNIQUE
);

-- ============================================================================
-- Fact tables
-- ============================================================================

CREATE TABLE IF NOT EXISTS TestData (
    Test_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    Product_ID INTEGER NOT NULL REFERENCES TestProducts(Product_ID),
    Family_ID INTEGER NOT NULL REFERENCES ProductFamilies(Family_ID),
    Customer_ID INTEGER NOT NULL REFERENCES Customer(Customer_ID),
    SerialNumber TEXT NOT NULL,
    TestStartDate TEXT NOT NULL,
    TestStartTime TEXT NOT NULL,
    TestEndDate TEXT NOT NULL,
    TestEndTime TEXT NOT NULL,
    Station_ID TEXT NOT NULL,
    TestSequenceVersion TEXT NOT NULL,
    Operator TEXT NOT NULL,
    Result TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_testdata_product ON TestData(Product_ID);
CREATE INDEX IF NOT EXISTS idx_testdata_serial ON TestData(SerialNumber);

CREATE TABLE IF NOT EXISTS TestStepData (
    StepData_ID INTEGER PRIMARY KEY AUTOINCREMENT,
    Test_ID INTEGER NOT NULL REFERENCES TestData(Test_ID),
    Step_ID INTEGER NOT NULL REFERENCES TestSteps(Step_ID),
    StepStatus TEXT,
    StepTime REAL,
    Measurement REAL,
    LowTolerance REAL,
    HighTolerance REAL,
    NumLoops INTEGER,
    NumPassed INTEGER,
    NumFailed INTEGER
);

CREATE INDEX IF NOT EXISTS idx_stepdata_test ON TestStepData(Test_ID);
CREATE INDEX IF NOT EXISTS idx_stepdata_step ON TestStepData(Step_ID);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_applies_cleanly() {
        let conn = Connection::open_in_memory().unwrap();
        apply_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_migrations(&conn).unwrap();
        apply_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn dimension_keys_are_unique() {
        let conn = Connection::open_in_memory().unwrap();
        apply_migrations(&conn).unwrap();

        conn.execute("INSERT INTO TestProducts (Type) VALUES ('S1234ABCD001')", [])
            .unwrap();
        let dup = conn.execute("INSERT INTO TestProducts (Type) VALUES ('S1234ABCD001')", []);
        assert!(dup.is_err());
    }

    #[test]
    fn foreign_keys_reject_orphan_measurements() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        apply_migrations(&conn).unwrap();

        let orphan = conn.execute(
            "INSERT INTO TestStepData (Test_ID, Step_ID) VALUES (999, 999)",
            [],
        );
        assert!(orphan.is_err());
    }
}

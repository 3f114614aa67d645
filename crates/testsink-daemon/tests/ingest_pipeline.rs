//! End-to-end ingestion: report file on disk through to database rows.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use testsink_daemon::coordinator::process_file;
use testsink_sqlite::{ReportStore, SqlitePool};
use testsink_watch::RetryPolicy;

const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Reports>
  <Report Type='UUT' UUTResult='Passed'>
    <Prop Name='UUT' Type='Obj'>
      <Prop Name='ModelNumber' Type='String'><Value>S1234ABCD001</Value></Prop>
      <Prop Name='SerialNumber' Type='String'><Value>SN-000271</Value></Prop>
      <Prop Name='StationID' Type='String'><Value>SATE-03</Value></Prop>
      <Prop Name='Test Sequence Version' Type='String'><Value>2.4.1</Value></Prop>
      <Prop Name='LoginName' Type='String'><Value>jkowalski</Value></Prop>
    </Prop>
    <Prop Name='StartDate' Type='Obj'>
      <Prop Name='Year' Type='Number'><Value>2024</Value></Prop>
      <Prop Name='Month' Type='Number'><Value>3</Value></Prop>
      <Prop Name='MonthDay' Type='Number'><Value>7</Value></Prop>
    </Prop>
    <Prop Name='StartTime' Type='Obj'>
      <Prop Name='Hours' Type='Number'><Value>9</Value></Prop>
      <Prop Name='Minutes' Type='Number'><Value>5</Value></Prop>
      <Prop Name='Seconds' Type='Number'><Value>0</Value></Prop>
    </Prop>
    <Prop Name='TS' Type='Obj'>
      <Prop Name='StepName' Type='String'><Value>Call Test Primitive (Voltage Check)</Value></Prop>
      <Prop Name='SequenceCall' Type='Obj'>
        <Prop Name='ResultList' Type='Array'>
          <Value>
            <Prop Name='StepName' Type='String'><Value>Voltage Check</Value></Prop>
            <Prop Name='Status' Type='String'><Value>Passed</Value></Prop>
            <Prop Name='Numeric' Type='Number'><Value>3.3</Value></Prop>
          </Value>
        </Prop>
      </Prop>
    </Prop>
  </Report>
</Reports>
"#;

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(2))
}

fn count(pool: &SqlitePool, table: &str) -> i64 {
    pool.with_connection(|conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
    })
    .unwrap()
}

#[tokio::test]
async fn report_file_lands_in_every_table() {
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("unit-0001.xml");
    std::fs::write(&report_path, REPORT).unwrap();

    let pool = SqlitePool::memory().unwrap();
    let store = Arc::new(ReportStore::new(pool.clone()));

    let stored = process_file(&report_path, store, &fast_retry(), dir.path())
        .await
        .unwrap();

    assert_eq!(stored.test_id, 1);
    assert_eq!(stored.steps.len(), 1);

    assert_eq!(count(&pool, "TestProducts"), 1);
    assert_eq!(count(&pool, "ProductFamilies"), 1);
    assert_eq!(count(&pool, "Customer"), 1);
    assert_eq!(count(&pool, "TestData"), 1);
    assert_eq!(count(&pool, "TestSteps"), 1);
    assert_eq!(count(&pool, "TestStepData"), 1);

    pool.with_connection(|conn| {
        let (serial, result): (String, String) = conn.query_row(
            "SELECT SerialNumber, Result FROM TestData",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        assert_eq!(serial, "SN-000271");
        assert_eq!(result, "Passed");
        Ok(())
    })
    .unwrap();
}

#[tokio::test]
async fn reprocessing_the_same_file_reuses_dimensions() {
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("unit-0001.xml");
    std::fs::write(&report_path, REPORT).unwrap();

    let pool = SqlitePool::memory().unwrap();
    let store: Arc<dyn testsink_core::ReportSink> = Arc::new(ReportStore::new(pool.clone()));

    process_file(&report_path, Arc::clone(&store), &fast_retry(), dir.path())
        .await
        .unwrap();
    process_file(&report_path, store, &fast_retry(), dir.path())
        .await
        .unwrap();

    assert_eq!(count(&pool, "TestProducts"), 1);
    assert_eq!(count(&pool, "TestSteps"), 1);
    assert_eq!(count(&pool, "TestData"), 2);
    assert_eq!(count(&pool, "TestStepData"), 2);
}

#[tokio::test]
async fn malformed_xml_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("broken.xml");
    std::fs::write(&report_path, "<Reports><unclosed>").unwrap();

    let pool = SqlitePool::memory().unwrap();
    let store = Arc::new(ReportStore::new(pool.clone()));

    let result = process_file(&report_path, store, &fast_retry(), dir.path()).await;
    assert!(result.is_err());
    assert_eq!(count(&pool, "TestData"), 0);
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let pool = SqlitePool::memory().unwrap();
    let store = Arc::new(ReportStore::new(pool));

    let result = process_file(
        &PathBuf::from(dir.path().join("never-written.xml")),
        store,
        &fast_retry(),
        dir.path(),
    )
    .await;
    assert!(result.is_err());
}

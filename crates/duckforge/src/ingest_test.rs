//! Tests for Arrow batch validation and row-wise ingestion.

use crate::connection::open_memory;
use crate::error::ForgeError;
use crate::query::table_row_count;
use crate::schema::TableSchema;
use duckdb::arrow::array::{DurationSecondArray, Float64Array, Int64Array, StringArray};
use duckdb::arrow::datatypes::{DataType, Field, Schema};
use duckdb::arrow::record_batch::RecordBatch;
use duckdb::Connection;
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────────────

fn users() -> TableSchema {
    TableSchema::new("users")
        .column("id", "BIGINT")
        .column("name", "VARCHAR")
        .column("score", "DOUBLE")
}

fn create_users(conn: &Connection) -> TableSchema {
    let schema = users();
    schema.create_table(conn, false).unwrap();
    schema
}

fn users_batch() -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("score", DataType::Float64, true),
    ]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec![Some("alice"), Some("bob"), None])),
            Arc::new(Float64Array::from(vec![Some(1.5), None, Some(3.0)])),
        ],
    )
    .unwrap()
}

// ── Valid ingestion ────────────────────────────────────────────────────

#[test]
fn ingest_inserts_every_batch_row() {
    let conn = open_memory().unwrap();
    let schema = create_users(&conn);

    schema.ingest(&conn, &users_batch(), false).unwrap();
    assert_eq!(table_row_count(&conn, "users").unwrap(), 3);
}

#[test]
fn ingest_preserves_nulls() {
    let conn = open_memory().unwrap();
    let schema = create_users(&conn);
    schema.ingest(&conn, &users_batch(), false).unwrap();

    let null_names: i64 = conn
        .query_row("SELECT COUNT(*) FROM users WHERE name IS NULL", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(null_names, 1);
}

#[test]
fn ingest_accepts_subset_of_declared_columns() {
    let conn = open_memory().unwrap();
    let schema = create_users(&conn);

    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)])),
        vec![Arc::new(Int64Array::from(vec![10, 20]))],
    )
    .unwrap();

    schema.ingest(&conn, &batch, false).unwrap();
    assert_eq!(table_row_count(&conn, "users").unwrap(), 2);

    let null_names: i64 = conn
        .query_row("SELECT COUNT(*) FROM users WHERE name IS NULL", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(null_names, 2, "undeclared batch columns default to NULL");
}

#[test]
fn ingest_headers_match_case_insensitively() {
    let conn = open_memory().unwrap();
    let schema = create_users(&conn);

    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(vec![Field::new("ID", DataType::Int64, false)])),
        vec![Arc::new(Int64Array::from(vec![1]))],
    )
    .unwrap();

    schema.ingest(&conn, &batch, false).unwrap();
    assert_eq!(table_row_count(&conn, "users").unwrap(), 1);
}

#[test]
fn ingest_empty_batch_is_noop() {
    let conn = open_memory().unwrap();
    let schema = create_users(&conn);

    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)])),
        vec![Arc::new(Int64Array::from(Vec::<i64>::new()))],
    )
    .unwrap();

    schema.ingest(&conn, &batch, false).unwrap();
    assert_eq!(table_row_count(&conn, "users").unwrap(), 0);
}

// ── Validation failures ────────────────────────────────────────────────

#[test]
fn ingest_rejects_undeclared_column() {
    let conn = open_memory().unwrap();
    let schema = create_users(&conn);

    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("extra", DataType::Utf8, true),
        ])),
        vec![
            Arc::new(Int64Array::from(vec![1])),
            Arc::new(StringArray::from(vec!["x"])),
        ],
    )
    .unwrap();

    let err = schema.ingest(&conn, &batch, false).unwrap_err();
    match err {
        ForgeError::ColumnMismatch { columns } => assert_eq!(columns, "extra"),
        other => panic!("expected ColumnMismatch, got {other}"),
    }
    assert_eq!(table_row_count(&conn, "users").unwrap(), 0);
}

#[test]
fn ingest_rejects_unsupported_arrow_type() {
    let conn = open_memory().unwrap();
    let schema = TableSchema::new("durations").column("d", "BIGINT");
    schema.create_table(&conn, false).unwrap();

    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(vec![Field::new(
            "d",
            DataType::Duration(duckdb::arrow::datatypes::TimeUnit::Second),
            false,
        )])),
        vec![Arc::new(DurationSecondArray::from(vec![1i64]))],
    )
    .unwrap();

    assert!(matches!(
        schema.ingest(&conn, &batch, false),
        Err(ForgeError::UnsupportedType { .. })
    ));
}

// ── Engine errors propagate ────────────────────────────────────────────

#[test]
fn ingest_into_missing_table_surfaces_engine_error() {
    let conn = open_memory().unwrap();
    let schema = users(); // never created

    assert!(matches!(
        schema.ingest(&conn, &users_batch(), false),
        Err(ForgeError::DuckDb(_))
    ));
}

#[test]
fn ingest_type_mismatch_surfaces_engine_error() {
    let conn = open_memory().unwrap();
    let schema = TableSchema::new("typed").column("n", "INTEGER");
    schema.create_table(&conn, false).unwrap();

    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(vec![Field::new("n", DataType::Utf8, false)])),
        vec![Arc::new(StringArray::from(vec!["not a number"]))],
    )
    .unwrap();

    assert!(matches!(
        schema.ingest(&conn, &batch, false),
        Err(ForgeError::DuckDb(_))
    ));
}

// ── Load stamping ──────────────────────────────────────────────────────

#[test]
fn load_date_stamps_every_row() {
    let conn = open_memory().unwrap();
    let schema = TableSchema::new("stamped")
        .column("id", "BIGINT")
        .column("LOAD_DATE", "VARCHAR");
    schema.create_table(&conn, false).unwrap();

    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)])),
        vec![Arc::new(Int64Array::from(vec![1, 2]))],
    )
    .unwrap();

    schema.ingest(&conn, &batch, true).unwrap();

    let stamped: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM stamped WHERE LOAD_DATE IS NOT NULL",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stamped, 2);

    let distinct: i64 = conn
        .query_row("SELECT COUNT(DISTINCT LOAD_DATE) FROM stamped", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(distinct, 1, "one stamp for the whole batch");
}

#[test]
fn load_date_requires_declared_column() {
    let conn = open_memory().unwrap();
    let schema = create_users(&conn); // no LOAD_DATE declared

    let err = schema.ingest(&conn, &users_batch(), true).unwrap_err();
    match err {
        ForgeError::ColumnMismatch { columns } => assert_eq!(columns, "LOAD_DATE"),
        other => panic!("expected ColumnMismatch, got {other}"),
    }
}

//! Arrow batch ingestion.
//!
//! Batches are inserted row-wise through a single prepared statement so a
//! batch may cover any subset of the declared columns. Arrow types are
//! consumed through the `duckdb` crate's re-export, keeping the batch and
//! the engine on one Arrow version.

use crate::error::{ForgeError, ForgeResult};
use crate::schema::TableSchema;
use duckdb::arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray, LargeStringArray,
    StringArray, TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use duckdb::arrow::datatypes::{DataType, TimeUnit};
use duckdb::arrow::record_batch::RecordBatch;
use duckdb::types::{TimeUnit as DuckTimeUnit, Value};
use duckdb::Connection;

/// Column appended to a batch when ingesting with a load stamp.
pub const LOAD_DATE_COLUMN: &str = "LOAD_DATE";

impl TableSchema {
    /// Ingest an Arrow record batch into the table.
    ///
    /// Batch columns must be a subset of the declared schema, matched
    /// case-insensitively; the offending columns are named in the error
    /// otherwise. With `load_date` a [`LOAD_DATE_COLUMN`] holding a single
    /// `%Y-%m-%d %H:%M:%S` stamp for the whole batch is appended, and must
    /// itself be declared.
    ///
    /// Inserts run statement-by-statement under the engine's auto-commit;
    /// a failed insert surfaces the engine error for the row that failed.
    pub fn ingest(
        &self,
        conn: &Connection,
        batch: &RecordBatch,
        load_date: bool,
    ) -> ForgeResult<()> {
        let schema = batch.schema();
        let mut headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();

        let stamp = if load_date {
            headers.push(LOAD_DATE_COLUMN.to_string());
            Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
        } else {
            None
        };

        self.validate_headers(&headers)?;

        if batch.num_rows() == 0 {
            return Ok(());
        }

        let placeholders = vec!["?"; headers.len()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            headers.join(", "),
            placeholders
        );
        log::debug!("{insert_sql}");

        let mut stmt = conn.prepare(&insert_sql)?;
        for row in 0..batch.num_rows() {
            let mut values: Vec<Value> = Vec::with_capacity(headers.len());
            for col in 0..batch.num_columns() {
                values.push(column_value(
                    schema.field(col).name(),
                    batch.column(col),
                    row,
                )?);
            }
            if let Some(stamp) = &stamp {
                values.push(Value::Text(stamp.clone()));
            }
            stmt.execute(duckdb::params_from_iter(values))?;
        }

        log::info!("Ingested {} row(s) into {}", batch.num_rows(), self.name);
        Ok(())
    }

    /// Reject batch columns that are not declared in the schema.
    fn validate_headers(&self, headers: &[String]) -> ForgeResult<()> {
        let mismatched: Vec<&str> = headers
            .iter()
            .map(String::as_str)
            .filter(|h| !self.declares_column(h))
            .collect();
        if mismatched.is_empty() {
            Ok(())
        } else {
            Err(ForgeError::ColumnMismatch {
                columns: mismatched.join(", "),
            })
        }
    }
}

/// Convert one Arrow cell into a DuckDB parameter value.
fn column_value(name: &str, array: &ArrayRef, row: usize) -> ForgeResult<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Boolean => Value::Boolean(downcast::<BooleanArray>(array).value(row)),
        DataType::Int8 => Value::TinyInt(downcast::<Int8Array>(array).value(row)),
        DataType::Int16 => Value::SmallInt(downcast::<Int16Array>(array).value(row)),
        DataType::Int32 => Value::Int(downcast::<Int32Array>(array).value(row)),
        DataType::Int64 => Value::BigInt(downcast::<Int64Array>(array).value(row)),
        DataType::UInt8 => Value::UTinyInt(downcast::<UInt8Array>(array).value(row)),
        DataType::UInt16 => Value::USmallInt(downcast::<UInt16Array>(array).value(row)),
        DataType::UInt32 => Value::UInt(downcast::<UInt32Array>(array).value(row)),
        DataType::UInt64 => Value::UBigInt(downcast::<UInt64Array>(array).value(row)),
        DataType::Float32 => Value::Float(downcast::<Float32Array>(array).value(row)),
        DataType::Float64 => Value::Double(downcast::<Float64Array>(array).value(row)),
        DataType::Utf8 => Value::Text(downcast::<StringArray>(array).value(row).to_string()),
        DataType::LargeUtf8 => {
            Value::Text(downcast::<LargeStringArray>(array).value(row).to_string())
        }
        DataType::Binary => Value::Blob(downcast::<BinaryArray>(array).value(row).to_vec()),
        DataType::LargeBinary => {
            Value::Blob(downcast::<LargeBinaryArray>(array).value(row).to_vec())
        }
        DataType::Date32 => Value::Date32(downcast::<Date32Array>(array).value(row)),
        DataType::Timestamp(unit, _) => match unit {
            TimeUnit::Second => Value::Timestamp(
                DuckTimeUnit::Second,
                downcast::<TimestampSecondArray>(array).value(row),
            ),
            TimeUnit::Millisecond => Value::Timestamp(
                DuckTimeUnit::Millisecond,
                downcast::<TimestampMillisecondArray>(array).value(row),
            ),
            TimeUnit::Microsecond => Value::Timestamp(
                DuckTimeUnit::Microsecond,
                downcast::<TimestampMicrosecondArray>(array).value(row),
            ),
            TimeUnit::Nanosecond => Value::Timestamp(
                DuckTimeUnit::Nanosecond,
                downcast::<TimestampNanosecondArray>(array).value(row),
            ),
        },
        other => {
            return Err(ForgeError::UnsupportedType {
                column: name.to_string(),
                data_type: format!("{other:?}"),
            })
        }
    };

    Ok(value)
}

/// Downcast an array whose `DataType` has already been matched.
fn downcast<T: 'static>(array: &ArrayRef) -> &T {
    array
        .as_any()
        .downcast_ref::<T>()
        .expect("array type checked against DataType")
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;

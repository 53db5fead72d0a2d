//! Ad-hoc query execution and catalog introspection helpers.
//!
//! Returns plain Rust types so callers don't need a direct `duckdb`
//! dependency for result handling.

use crate::error::{ForgeError, ForgeResult};
use duckdb::Connection;

/// Result of executing an ad-hoc SQL query.
pub struct QueryResult {
    /// Column names from the result set.
    pub columns: Vec<String>,
    /// Rows of string-coerced values.
    pub rows: Vec<Vec<String>>,
}

/// Execute an ad-hoc SQL query and return all results as strings.
///
/// DuckDB panics on `stmt.column_count()` before execution, so all rows are
/// collected via `query_map` first, then column metadata is read.
pub fn execute_query(conn: &Connection, sql: &str) -> ForgeResult<QueryResult> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| ForgeError::QueryError(format!("prepare failed: {e}")))?;

    let raw_rows: Vec<Vec<String>> = stmt
        .query_map([], |row| {
            let col_count = row.as_ref().column_count();
            Ok((0..col_count)
                .map(|i| get_column_as_string(row, i))
                .collect())
        })
        .map_err(|e| ForgeError::QueryError(format!("query failed: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ForgeError::QueryError(format!("row error: {e}")))?;

    let column_count = stmt.column_count();
    let column_names: Vec<String> = (0..column_count)
        .map(|i| {
            stmt.column_name(i)
                .map_or("?".to_string(), |v| v.to_string())
        })
        .collect();

    Ok(QueryResult {
        columns: column_names,
        rows: raw_rows,
    })
}

/// List all tables in the `main` schema.
pub fn list_tables(conn: &Connection) -> ForgeResult<Vec<String>> {
    let result = execute_query(
        conn,
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = 'main' \
         ORDER BY table_name",
    )?;
    Ok(result.rows.into_iter().map(|r| r[0].clone()).collect())
}

/// Get the row count for a table.
pub fn table_row_count(conn: &Connection, table_name: &str) -> ForgeResult<i64> {
    if !table_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(ForgeError::QueryError(format!(
            "invalid table name '{table_name}': must contain only alphanumeric characters, underscores, and dots"
        )));
    }
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table_name}"), [], |row| {
            row.get(0)
        })
        .map_err(|e| ForgeError::QueryError(format!("count failed for {table_name}: {e}")))?;
    Ok(count)
}

/// Read a column value as a String, trying multiple DuckDB types.
///
/// DuckDB integer columns return `None` for `Option<String>`, so we try
/// String -> i64 -> f64 -> bool -> "null".
pub fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    "null".to_string()
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

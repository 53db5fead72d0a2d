//! Executable table operations against a caller-supplied connection.
//!
//! Connection lifetime is entirely caller-managed; every operation borrows a
//! [`Connection`] for the duration of the call and relies on the engine's
//! implicit auto-commit.

use crate::error::ForgeResult;
use crate::schema::TableSchema;
use duckdb::Connection;

impl TableSchema {
    /// Create the table if it does not exist.
    ///
    /// With `overwrite` an existing table is dropped and rebuilt; without it
    /// a pre-existing table is left untouched and the call is a no-op.
    pub fn create_table(&self, conn: &Connection, overwrite: bool) -> ForgeResult<()> {
        if self.exists(conn)? {
            if overwrite {
                self.drop_table(conn)?;
            } else {
                log::info!(
                    "Table {} already exists and will not be overwritten",
                    self.name
                );
                return Ok(());
            }
        }

        let ddl = self.create_ddl()?;
        log::debug!("{ddl}");
        conn.execute_batch(&ddl)?;
        log::info!("Table {} created", self.name);
        Ok(())
    }

    /// Drop the table if it exists.
    pub fn drop_table(&self, conn: &Connection) -> ForgeResult<()> {
        conn.execute_batch(&self.drop_ddl())?;
        log::info!("Dropped table {}", self.name);
        Ok(())
    }

    /// Check the engine catalog for the table.
    pub fn exists(&self, conn: &Connection) -> ForgeResult<bool> {
        let (schema, table) = split_qualified(&self.name);
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = '{schema}' AND table_name = '{table}'"
        );
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Live column names from the catalog, in ordinal order.
    pub fn columns(&self, conn: &Connection) -> ForgeResult<Vec<String>> {
        let (schema, table) = split_qualified(&self.name);
        let mut stmt = conn.prepare(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? \
             ORDER BY ordinal_position",
        )?;
        let names = stmt
            .query_map(duckdb::params![schema, table], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

/// Split a possibly schema-qualified name on its last `.`, defaulting to
/// DuckDB's `main` schema.
fn split_qualified(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;

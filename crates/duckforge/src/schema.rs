//! Declarative table descriptors and DDL building.
//!
//! A [`TableSchema`] names a table, its columns with their declared SQL
//! types, and an optional composite primary key. Descriptors are defined
//! once (with the builder or from a 1:1 YAML file) and stay immutable.
//! The executable operations live in [`crate::table`] and [`crate::ingest`].

use crate::error::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single column declaration: name plus raw SQL type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name as it appears in DDL.
    pub name: String,

    /// Declared SQL type (e.g. "INTEGER", "VARCHAR", "DECIMAL(10,2)").
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Static descriptor for one table kind.
///
/// Column order is preserved: it is the order columns appear in the emitted
/// `CREATE TABLE` statement, so the YAML form is a sequence, not a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name, optionally schema-qualified (`analytics.users`).
    pub name: String,

    /// Ordered column declarations.
    pub columns: Vec<ColumnDef>,

    /// Primary key column names; empty means no primary key clause.
    #[serde(default)]
    pub primary_key: Vec<String>,
}

impl TableSchema {
    /// Start a descriptor with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    /// Append a column declaration.
    pub fn column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            data_type: data_type.into(),
        });
        self
    }

    /// Set the (possibly composite) primary key.
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Load a descriptor from a 1:1 YAML file.
    pub fn load(path: &Path) -> ForgeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ForgeError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let schema: TableSchema = serde_yaml::from_str(&content)?;
        Ok(schema)
    }

    /// Declared column names, in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Case-insensitive membership test against the declared columns.
    ///
    /// DuckDB resolves identifiers case-insensitively, so validation here
    /// follows suit.
    pub(crate) fn declares_column(&self, name: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Build the idempotent `CREATE TABLE IF NOT EXISTS` statement.
    ///
    /// Fails if no columns are declared or the primary key names a column
    /// that is not declared.
    pub fn create_ddl(&self) -> ForgeResult<String> {
        if self.columns.is_empty() {
            return Err(ForgeError::SchemaError {
                table: self.name.clone(),
                message: "no columns declared".to_string(),
            });
        }
        for key in &self.primary_key {
            if !self.declares_column(key) {
                return Err(ForgeError::SchemaError {
                    table: self.name.clone(),
                    message: format!("primary key column '{key}' is not declared"),
                });
            }
        }

        let mut defs: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.data_type))
            .collect();
        if !self.primary_key.is_empty() {
            defs.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }

        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            defs.join(", ")
        ))
    }

    /// Build the idempotent `DROP TABLE IF EXISTS` statement.
    pub fn drop_ddl(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;

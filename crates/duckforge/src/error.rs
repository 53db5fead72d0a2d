//! Error types for duckforge.

use thiserror::Error;

/// Errors raised by duckforge.
///
/// Engine failures (constraint violations, missing tables, type mismatches)
/// are carried unmodified in [`ForgeError::DuckDb`] and reach the caller
/// exactly as DuckDB raised them.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Failed to open or create a database file (F001).
    #[error("[F001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Database file does not exist (F002).
    #[error("[F002] Database file '{path}' does not exist, create it first")]
    DatabaseMissing { path: String },

    /// Invalid table declaration (F003).
    #[error("[F003] Invalid schema for table '{table}': {message}")]
    SchemaError { table: String, message: String },

    /// Batch columns not declared in the table schema (F004).
    #[error("[F004] Column(s) in batch do not match the declared schema: {columns}")]
    ColumnMismatch { columns: String },

    /// Arrow column type this crate cannot bind as a parameter (F005).
    #[error("[F005] Unsupported Arrow type for column '{column}': {data_type}")]
    UnsupportedType { column: String, data_type: String },

    /// Query preparation or row decoding failed (F006).
    #[error("[F006] Query failed: {0}")]
    QueryError(String),

    /// Failed to read a schema file (F007).
    #[error("[F007] Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a schema YAML file (F008).
    #[error("[F008] Failed to parse schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// DuckDB driver error with preserved source chain (F009).
    #[error("[F009] DuckDB error")]
    DuckDb(#[from] duckdb::Error),
}

/// Result type alias for [`ForgeError`].
pub type ForgeResult<T> = Result<T, ForgeError>;

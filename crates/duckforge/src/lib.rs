//! Declarative table management for DuckDB.
//!
//! Declare a table's shape once as a [`TableSchema`], then create or drop
//! it, probe the catalog for it, and bulk-load Arrow record batches into it.
//! Durability, indexing, and query execution stay with DuckDB; this crate
//! only translates declarations into DDL/DML and validates batches against
//! them.

pub mod connection;
pub mod error;
pub mod ingest;
pub mod query;
pub mod schema;
pub mod table;

pub use error::{ForgeError, ForgeResult};
pub use ingest::LOAD_DATE_COLUMN;
pub use query::{execute_query, list_tables, table_row_count, QueryResult};
pub use schema::{ColumnDef, TableSchema};

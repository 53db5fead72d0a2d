//! Connection open helpers.
//!
//! Every operation in this crate borrows a caller-supplied [`Connection`];
//! nothing here owns one. These helpers cover the common open paths and the
//! one-database-file-per-table naming convention (`{dir}/{name}.duckdb`).

use crate::error::{ForgeError, ForgeResult};
use duckdb::Connection;
use std::path::{Path, PathBuf};

/// Database file path for `name` under `dir`.
pub fn db_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.duckdb"))
}

/// Open (or create) the database file for `name` under `dir`.
pub fn open(dir: &Path, name: &str) -> ForgeResult<Connection> {
    let path = db_path(dir, name);
    Connection::open(&path)
        .map_err(|e| ForgeError::ConnectionError(format!("{e}: {}", path.display())))
}

/// Open the database file for `name`, failing if it does not exist yet.
pub fn open_existing(dir: &Path, name: &str) -> ForgeResult<Connection> {
    let path = db_path(dir, name);
    if !path.exists() {
        return Err(ForgeError::DatabaseMissing {
            path: path.display().to_string(),
        });
    }
    Connection::open(&path)
        .map_err(|e| ForgeError::ConnectionError(format!("{e}: {}", path.display())))
}

/// Create an in-memory database.
///
/// Useful for unit tests that don't need persistence.
pub fn open_memory() -> ForgeResult<Connection> {
    Connection::open_in_memory().map_err(|e| ForgeError::ConnectionError(e.to_string()))
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `DuckDB` storage for the city data service.
//!
//! A single database file holds every table. The schema is created
//! idempotently on open, so [`open`] doubles as the migration step.

pub mod import_state;
pub mod maintenance;
pub mod mobility;
pub mod paths;
pub mod stations;

use std::path::Path;

use duckdb::Connection;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Opens (or creates) the database at `path` and ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    log::debug!("Opened database {}", path.display());
    Ok(conn)
}

/// Opens the database at [`paths::db_path`].
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_default() -> Result<Connection, DbError> {
    open(&paths::db_path())
}

/// Opens a fresh in-memory database with the schema created.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Creates every table that does not exist yet.
///
/// # Errors
///
/// Returns [`DbError`] if a statement fails.
pub fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS import_state (
            source TEXT NOT NULL PRIMARY KEY,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            day INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counter_stations (
            source TEXT NOT NULL,
            name TEXT NOT NULL,
            longitude DOUBLE NOT NULL,
            latitude DOUBLE NOT NULL,
            PRIMARY KEY (source, name)
        );

        CREATE SEQUENCE IF NOT EXISTS maintenance_units_id_seq;
        CREATE TABLE IF NOT EXISTS maintenance_units (
            id BIGINT PRIMARY KEY DEFAULT nextval('maintenance_units_id_seq'),
            unit_id TEXT NOT NULL UNIQUE
        );

        CREATE SEQUENCE IF NOT EXISTS maintenance_works_id_seq;
        CREATE TABLE IF NOT EXISTS maintenance_works (
            id BIGINT PRIMARY KEY DEFAULT nextval('maintenance_works_id_seq'),
            maintenance_unit_id BIGINT NOT NULL,
            timestamp TIMESTAMP NOT NULL,
            longitude DOUBLE NOT NULL,
            latitude DOUBLE NOT NULL
        );

        CREATE TABLE IF NOT EXISTS maintenance_work_events (
            work_id BIGINT NOT NULL,
            position INTEGER NOT NULL,
            event TEXT NOT NULL,
            PRIMARY KEY (work_id, position)
        );

        CREATE TABLE IF NOT EXISTS content_types (
            type_name TEXT NOT NULL PRIMARY KEY,
            name_fi TEXT,
            name_sv TEXT,
            name_en TEXT,
            description_fi TEXT,
            description_sv TEXT,
            description_en TEXT
        );

        CREATE SEQUENCE IF NOT EXISTS mobile_units_id_seq;
        CREATE TABLE IF NOT EXISTS mobile_units (
            id BIGINT PRIMARY KEY DEFAULT nextval('mobile_units_id_seq'),
            type_name TEXT NOT NULL,
            name TEXT NOT NULL,
            is_active BOOLEAN NOT NULL,
            longitude DOUBLE NOT NULL,
            latitude DOUBLE NOT NULL,
            address_fi TEXT,
            address_sv TEXT,
            address_en TEXT,
            extra TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS streets (
            name_fi TEXT NOT NULL,
            name_sv TEXT,
            name_en TEXT,
            municipality TEXT NOT NULL,
            PRIMARY KEY (name_fi, municipality)
        );",
    )?;
    Ok(())
}

/// Converts a row count or page bound to `i64` for binding.
pub(crate) fn to_i64(value: usize) -> Result<i64, DbError> {
    i64::try_from(value).map_err(|_| DbError::Conversion {
        message: format!("{value} does not fit in BIGINT"),
    })
}

/// Converts a `COUNT(*)` result to `usize`.
pub(crate) fn to_usize(value: i64) -> Result<usize, DbError> {
    usize::try_from(value).map_err(|_| DbError::Conversion {
        message: format!("invalid row count {value}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();
    }

    #[test]
    fn opens_file_database_in_new_directory() {
        let dir = std::env::temp_dir().join("city_data_db_open_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("city.duckdb");

        {
            let conn = open(&path).unwrap();
            import_state::set_cursor(
                &conn,
                city_data_counter_models::CounterSource::TelraamCsv,
                chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            )
            .unwrap();
        }

        let conn = open(&path).unwrap();
        let cursor =
            import_state::get_cursor(&conn, city_data_counter_models::CounterSource::TelraamCsv)
                .unwrap();
        assert_eq!(cursor.map(|d| d.to_string()).as_deref(), Some("2024-01-02"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

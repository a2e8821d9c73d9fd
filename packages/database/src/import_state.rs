//! Per-source import cursors.
//!
//! One row per [`CounterSource`] holding the last fully imported day.

use chrono::{Datelike as _, NaiveDate};
use city_data_counter::{TelraamError, cursor::ImportCursorStore};
use city_data_counter_models::CounterSource;
use duckdb::Connection;

use crate::DbError;

/// Returns the cursor for `source`, if set.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the stored date is invalid.
pub fn get_cursor(conn: &Connection, source: CounterSource) -> Result<Option<NaiveDate>, DbError> {
    let mut stmt = conn.prepare("SELECT year, month, day FROM import_state WHERE source = ?")?;
    let result = stmt.query_row([source.as_ref()], |row| {
        Ok((
            row.get::<_, i32>(0)?,
            row.get::<_, u32>(1)?,
            row.get::<_, u32>(2)?,
        ))
    });

    match result {
        Ok((year, month, day)) => NaiveDate::from_ymd_opt(year, month, day)
            .map(Some)
            .ok_or_else(|| DbError::Conversion {
                message: format!("invalid cursor date {year}-{month}-{day} for {source}"),
            }),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::DuckDb(e)),
    }
}

/// Creates or replaces the cursor for `source`.
///
/// # Errors
///
/// Returns [`DbError`] if the upsert fails.
pub fn set_cursor(conn: &Connection, source: CounterSource, day: NaiveDate) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO import_state (source, year, month, day) VALUES (?, ?, ?, ?)
         ON CONFLICT (source) DO UPDATE SET
             year = EXCLUDED.year,
             month = EXCLUDED.month,
             day = EXCLUDED.day",
        duckdb::params![source.as_ref(), day.year(), day.month(), day.day()],
    )?;
    log::debug!("Import cursor for {source} set to {day}");
    Ok(())
}

/// Removes the cursor for `source`.
///
/// # Errors
///
/// Returns [`DbError`] if the delete fails.
pub fn clear_cursor(conn: &Connection, source: CounterSource) -> Result<(), DbError> {
    conn.execute(
        "DELETE FROM import_state WHERE source = ?",
        [source.as_ref()],
    )?;
    Ok(())
}

/// [`ImportCursorStore`] backed by the `import_state` table.
pub struct DuckDbCursorStore<'a> {
    conn: &'a Connection,
}

impl<'a> DuckDbCursorStore<'a> {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn cursor_error(e: DbError) -> TelraamError {
    TelraamError::Cursor(Box::new(e))
}

impl ImportCursorStore for DuckDbCursorStore<'_> {
    fn get_cursor(&self, source: CounterSource) -> Result<Option<NaiveDate>, TelraamError> {
        get_cursor(self.conn, source).map_err(cursor_error)
    }

    fn set_cursor(&self, source: CounterSource, day: NaiveDate) -> Result<(), TelraamError> {
        set_cursor(self.conn, source, day).map_err(cursor_error)
    }

    fn clear_cursor(&self, source: CounterSource) -> Result<(), TelraamError> {
        clear_cursor(self.conn, source).map_err(cursor_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn cursor_round_trips_per_source() {
        let conn = crate::open_in_memory().unwrap();
        assert_eq!(get_cursor(&conn, CounterSource::TelraamCsv).unwrap(), None);

        set_cursor(&conn, CounterSource::TelraamCsv, date("2024-02-29")).unwrap();
        set_cursor(&conn, CounterSource::EcoCounter, date("2023-01-01")).unwrap();
        set_cursor(&conn, CounterSource::TelraamCsv, date("2024-03-01")).unwrap();

        assert_eq!(
            get_cursor(&conn, CounterSource::TelraamCsv).unwrap(),
            Some(date("2024-03-01"))
        );
        assert_eq!(
            get_cursor(&conn, CounterSource::EcoCounter).unwrap(),
            Some(date("2023-01-01"))
        );
    }

    #[test]
    fn clear_removes_only_that_source() {
        let conn = crate::open_in_memory().unwrap();
        set_cursor(&conn, CounterSource::TelraamCsv, date("2024-02-29")).unwrap();
        set_cursor(&conn, CounterSource::EcoCounter, date("2023-01-01")).unwrap();

        clear_cursor(&conn, CounterSource::TelraamCsv).unwrap();

        assert_eq!(get_cursor(&conn, CounterSource::TelraamCsv).unwrap(), None);
        assert!(get_cursor(&conn, CounterSource::EcoCounter).unwrap().is_some());
    }

    #[test]
    fn store_implements_cursor_trait() {
        let conn = crate::open_in_memory().unwrap();
        let store = DuckDbCursorStore::new(&conn);
        store
            .set_cursor(CounterSource::TelraamCsv, date("2024-05-01"))
            .unwrap();
        assert_eq!(
            store.get_cursor(CounterSource::TelraamCsv).unwrap(),
            Some(date("2024-05-01"))
        );
        store.clear_cursor(CounterSource::TelraamCsv).unwrap();
        assert_eq!(store.get_cursor(CounterSource::TelraamCsv).unwrap(), None);
    }
}

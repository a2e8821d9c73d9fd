//! Maintenance units and their GPS works.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use city_data_maintenance_models::{MaintenanceUnit, MaintenanceWork, WorkFilter};
use duckdb::Connection;

use crate::{DbError, to_i64, to_usize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `LIMIT`/`OFFSET` of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Maximum number of rows.
    pub limit: usize,
    /// Rows to skip.
    pub offset: usize,
}

/// Returns the ID of the unit with source identifier `unit_id`, creating
/// it if needed.
///
/// # Errors
///
/// Returns [`DbError`] if the insert or lookup fails.
pub fn upsert_unit(conn: &Connection, unit_id: &str) -> Result<i64, DbError> {
    conn.execute(
        "INSERT INTO maintenance_units (unit_id) VALUES (?)
         ON CONFLICT (unit_id) DO NOTHING",
        [unit_id],
    )?;
    let mut stmt = conn.prepare("SELECT id FROM maintenance_units WHERE unit_id = ?")?;
    Ok(stmt.query_row([unit_id], |row| row.get(0))?)
}

/// Stores one work and its events. Returns the new work ID.
///
/// # Errors
///
/// Returns [`DbError`] if an insert fails.
pub fn insert_work(
    conn: &Connection,
    maintenance_unit_id: i64,
    timestamp: DateTime<Utc>,
    longitude: f64,
    latitude: f64,
    events: &[String],
) -> Result<i64, DbError> {
    let mut stmt = conn.prepare(
        "INSERT INTO maintenance_works (maintenance_unit_id, timestamp, longitude, latitude)
         VALUES (?, CAST(? AS TIMESTAMP), ?, ?)
         RETURNING id",
    )?;
    let ts = timestamp.naive_utc().format(TIMESTAMP_FORMAT).to_string();
    let id: i64 = stmt.query_row(
        duckdb::params![maintenance_unit_id, ts, longitude, latitude],
        |row| row.get(0),
    )?;

    let mut event_stmt = conn.prepare(
        "INSERT INTO maintenance_work_events (work_id, position, event) VALUES (?, ?, ?)",
    )?;
    for (position, event) in events.iter().enumerate() {
        event_stmt.execute(duckdb::params![id, to_i64(position)?, event])?;
    }

    Ok(id)
}

fn where_clause(filter: &WorkFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(event) = &filter.event {
        clauses.push(
            "EXISTS (SELECT 1 FROM maintenance_work_events e
                     WHERE e.work_id = w.id AND e.event = ?)",
        );
        params.push(event.clone());
    }

    if let Some(start) = filter.start_date_time {
        clauses.push("w.timestamp >= CAST(? AS TIMESTAMP)");
        params.push(start.format(TIMESTAMP_FORMAT).to_string());
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), params)
    }
}

/// Counts the works matching `filter`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_works(conn: &Connection, filter: &WorkFilter) -> Result<usize, DbError> {
    let (where_sql, params) = where_clause(filter);
    let mut stmt = conn.prepare(&format!(
        "SELECT COUNT(*) FROM maintenance_works w {where_sql}"
    ))?;
    for (i, p) in params.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, p)?;
    }
    stmt.raw_execute()?;

    let mut rows = stmt.raw_query();
    let count: i64 = match rows.next()? {
        Some(row) => row.get(0)?,
        None => 0,
    };
    to_usize(count)
}

/// Returns the works matching `filter` ordered by ID, optionally limited to
/// one page.
///
/// # Errors
///
/// Returns [`DbError`] if a query fails or a stored timestamp is invalid.
pub fn list_works(
    conn: &Connection,
    filter: &WorkFilter,
    window: Option<Window>,
) -> Result<Vec<MaintenanceWork>, DbError> {
    let (where_sql, params) = where_clause(filter);
    let page_sql = window.map_or_else(String::new, |w| {
        format!("LIMIT {} OFFSET {}", w.limit, w.offset)
    });

    let mut stmt = conn.prepare(&format!(
        "SELECT w.id, w.maintenance_unit_id, CAST(w.timestamp AS VARCHAR), w.longitude, w.latitude
         FROM maintenance_works w
         {where_sql}
         ORDER BY w.id
         {page_sql}"
    ))?;
    for (i, p) in params.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, p)?;
    }
    stmt.raw_execute()?;

    let mut works = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let ts: String = row.get(2)?;
        works.push(MaintenanceWork {
            id: row.get(0)?,
            maintenance_unit_id: row.get(1)?,
            timestamp: parse_timestamp(&ts)?,
            longitude: row.get(3)?,
            latitude: row.get(4)?,
            events: Vec::new(),
        });
    }

    let ids: Vec<i64> = works.iter().map(|w| w.id).collect();
    let mut events = load_events(conn, &ids)?;
    for work in &mut works {
        work.events = events.remove(&work.id).unwrap_or_default();
    }

    Ok(works)
}

fn load_events(conn: &Connection, work_ids: &[i64]) -> Result<BTreeMap<i64, Vec<String>>, DbError> {
    let mut events: BTreeMap<i64, Vec<String>> = BTreeMap::new();

    for chunk in work_ids.chunks(1000) {
        let placeholders: String = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT work_id, event FROM maintenance_work_events
             WHERE work_id IN ({placeholders})
             ORDER BY work_id, position"
        ))?;
        for (i, id) in chunk.iter().enumerate() {
            stmt.raw_bind_parameter(i + 1, id)?;
        }
        stmt.raw_execute()?;

        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let event: String = row.get(1)?;
            events.entry(id).or_default().push(event);
        }
    }

    Ok(events)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DbError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| DbError::Conversion {
            message: format!("invalid timestamp {s:?}: {e}"),
        })
}

/// Counts all maintenance units.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_units(conn: &Connection) -> Result<usize, DbError> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM maintenance_units")?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    to_usize(count)
}

/// Returns maintenance units ordered by ID.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_units(conn: &Connection, window: Window) -> Result<Vec<MaintenanceUnit>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, unit_id FROM maintenance_units ORDER BY id LIMIT {} OFFSET {}",
        window.limit, window.offset
    ))?;
    let units = stmt
        .query_map([], |row| {
            Ok(MaintenanceUnit {
                id: row.get(0)?,
                unit_id: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(units)
}

/// Returns every distinct event name, sorted.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn active_events(conn: &Connection) -> Result<Vec<String>, DbError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT event FROM maintenance_work_events ORDER BY event")?;
    let events = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn seed(conn: &Connection) {
        let plough = upsert_unit(conn, "plough-1").unwrap();
        let sweeper = upsert_unit(conn, "sweeper-7").unwrap();
        let t = |h| Utc.with_ymd_and_hms(2022, 9, 18, h, 0, 0).unwrap();

        insert_work(conn, plough, t(9), 22.0, 60.0, &["auraus".to_string()]).unwrap();
        insert_work(
            conn,
            plough,
            t(10),
            22.1,
            60.1,
            &["auraus".to_string(), "hiekoitus".to_string()],
        )
        .unwrap();
        insert_work(conn, sweeper, t(11), 22.2, 60.2, &["harjaus".to_string()]).unwrap();
    }

    #[test]
    fn upsert_unit_is_stable() {
        let conn = crate::open_in_memory().unwrap();
        let a = upsert_unit(&conn, "plough-1").unwrap();
        let b = upsert_unit(&conn, "plough-1").unwrap();
        assert_eq!(a, b);
        assert_eq!(count_units(&conn).unwrap(), 1);
    }

    #[test]
    fn lists_works_with_events_in_order() {
        let conn = crate::open_in_memory().unwrap();
        seed(&conn);

        let works = list_works(&conn, &WorkFilter::default(), None).unwrap();
        assert_eq!(works.len(), 3);
        assert_eq!(works[1].events, vec!["auraus", "hiekoitus"]);
        assert_eq!(
            works[0].timestamp,
            Utc.with_ymd_and_hms(2022, 9, 18, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn filters_by_event_and_start_time() {
        let conn = crate::open_in_memory().unwrap();
        seed(&conn);

        let by_event = WorkFilter {
            event: Some("auraus".to_string()),
            ..WorkFilter::default()
        };
        assert_eq!(count_works(&conn, &by_event).unwrap(), 2);

        let by_time = WorkFilter {
            start_date_time: Some(
                NaiveDateTime::parse_from_str("2022-09-18 10:00:00", TIMESTAMP_FORMAT).unwrap(),
            ),
            ..WorkFilter::default()
        };
        assert_eq!(count_works(&conn, &by_time).unwrap(), 2);

        let both = WorkFilter {
            event: Some("auraus".to_string()),
            ..by_time
        };
        let works = list_works(&conn, &both, None).unwrap();
        assert_eq!(works.len(), 1);
        assert!((works[0].longitude - 22.1).abs() < f64::EPSILON);
    }

    #[test]
    fn pages_works() {
        let conn = crate::open_in_memory().unwrap();
        seed(&conn);

        let page = list_works(
            &conn,
            &WorkFilter::default(),
            Some(Window {
                limit: 2,
                offset: 2,
            }),
        )
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].events, vec!["harjaus"]);
    }

    #[test]
    fn active_events_are_distinct() {
        let conn = crate::open_in_memory().unwrap();
        seed(&conn);
        assert_eq!(
            active_events(&conn).unwrap(),
            vec!["auraus", "harjaus", "hiekoitus"]
        );
    }

    #[test]
    fn lists_units_page() {
        let conn = crate::open_in_memory().unwrap();
        seed(&conn);
        let units = list_units(
            &conn,
            Window {
                limit: 10,
                offset: 0,
            },
        )
        .unwrap();
        let ids: Vec<&str> = units.iter().map(|u| u.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["plough-1", "sweeper-7"]);
    }
}

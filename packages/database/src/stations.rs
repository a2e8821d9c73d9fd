//! Fixed counting stations.

use city_data_counter_models::{CounterSource, CounterStation};
use duckdb::Connection;

use crate::DbError;

/// Inserts `station` unless one with the same source and name exists.
///
/// Returns `true` if a row was inserted.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub fn insert_station_if_absent(conn: &Connection, station: &CounterStation) -> Result<bool, DbError> {
    let inserted = conn.execute(
        "INSERT INTO counter_stations (source, name, longitude, latitude)
         VALUES (?, ?, ?, ?)
         ON CONFLICT (source, name) DO NOTHING",
        duckdb::params![
            station.source.as_ref(),
            station.name,
            station.longitude,
            station.latitude
        ],
    )?;
    Ok(inserted > 0)
}

/// Returns the stations of `source`, ordered by name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored source is unknown.
pub fn list_stations(conn: &Connection, source: CounterSource) -> Result<Vec<CounterStation>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT name, longitude, latitude FROM counter_stations
         WHERE source = ? ORDER BY name",
    )?;
    stmt.raw_bind_parameter(1, source.as_ref())?;
    stmt.raw_execute()?;

    let mut stations = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        stations.push(CounterStation {
            name: row.get(0)?,
            source,
            longitude: row.get(1)?,
            latitude: row.get(2)?,
        });
    }

    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str) -> CounterStation {
        CounterStation {
            name: name.to_string(),
            source: CounterSource::EcoCounter,
            longitude: 22.27,
            latitude: 60.45,
        }
    }

    #[test]
    fn existing_station_is_skipped() {
        let conn = crate::open_in_memory().unwrap();
        assert!(insert_station_if_absent(&conn, &station("Auransilta")).unwrap());
        assert!(!insert_station_if_absent(&conn, &station("Auransilta")).unwrap());
        assert!(insert_station_if_absent(&conn, &station("Aurajoki")).unwrap());

        let names: Vec<String> = list_stations(&conn, CounterSource::EcoCounter)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Aurajoki", "Auransilta"]);
        assert!(list_stations(&conn, CounterSource::TelraamCsv).unwrap().is_empty());
    }
}

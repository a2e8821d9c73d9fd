#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for running the city data importers against the `DuckDB`
//! database.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use city_data_counter::{
    TelraamError,
    config::TelraamConfig,
    importer::{ImportSummary, TelraamImporter},
};
use city_data_counter_models::CounterStation;
use city_data_database::{
    DbError, import_state::DuckDbCursorStore, maintenance, mobility, mobility::DuckDbStreetLookup,
    stations,
};
use city_data_mobility::{MobilityError, content_types::content_type, gas_station};
use city_data_mobility_models::{MobileUnit, Translated};
use duckdb::Connection;
use serde::Deserialize;

/// Format of the `--from-date` argument.
pub const FROM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur while running an import.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Counter import failed.
    #[error(transparent)]
    Telraam(#[from] TelraamError),

    /// Mobility import failed.
    #[error(transparent)]
    Mobility(#[from] MobilityError),

    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// An input file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A CSV input row could not be parsed.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A JSON input file could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Parses a `--from-date` value.
///
/// Logs an error and returns `None` if the value is not `YYYY-MM-DD`; the
/// caller then exits without touching files or the cursor.
#[must_use]
pub fn parse_from_date(value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value.trim(), FROM_DATE_FORMAT) {
        Ok(day) => Some(day),
        Err(e) => {
            log::error!("Invalid --from-date {value:?}, expected YYYY-MM-DD: {e}");
            None
        }
    }
}

/// Runs the Telraam CSV import, resuming from the cursor in `conn`.
///
/// # Errors
///
/// Returns [`IngestError::Telraam`] if configuration, fetching, writing
/// or the cursor update fails.
#[allow(clippy::future_not_send)]
pub async fn telraam_to_csv(
    conn: &Connection,
    config: TelraamConfig,
    from_date: Option<NaiveDate>,
) -> Result<ImportSummary, IngestError> {
    let importer = TelraamImporter::from_config(config, DuckDbCursorStore::new(conn))?;
    Ok(importer.run(from_date).await?)
}

/// Stores stations not yet known by name. Returns the number inserted.
///
/// # Errors
///
/// Returns [`IngestError::Database`] if an insert fails.
pub fn save_stations(conn: &Connection, list: &[CounterStation]) -> Result<usize, IngestError> {
    let mut inserted = 0;
    for station in list {
        if stations::insert_station_if_absent(conn, station)? {
            inserted += 1;
        } else {
            log::debug!("Station {} already exists", station.name);
        }
    }
    log::info!(
        "Saved {inserted} new stations, {} already present",
        list.len() - inserted
    );
    Ok(inserted)
}

/// Fetches eco-counter stations from `url` and stores the new ones.
///
/// # Errors
///
/// Returns [`IngestError`] if fetching or storing fails.
#[allow(clippy::future_not_send)]
pub async fn import_eco_counter_stations(
    conn: &Connection,
    url: &str,
) -> Result<usize, IngestError> {
    let list = city_data_counter::eco_counter::fetch_stations(url).await?;
    save_stations(conn, &list)
}

/// Stores mobile units of `type_name`.
///
/// Existing units of the type are deleted first unless `keep_existing` is
/// set. The content type is upserted from the embedded registry. Returns
/// the number of units stored.
///
/// # Errors
///
/// Returns [`IngestError::Mobility`] if `type_name` is not in the registry
/// and [`IngestError::Database`] if a write fails.
pub fn save_mobile_units(
    conn: &Connection,
    type_name: &str,
    units: &[MobileUnit],
    keep_existing: bool,
) -> Result<usize, IngestError> {
    let content_type = content_type(type_name)?;

    if !keep_existing {
        mobility::delete_mobile_units(conn, type_name)?;
    }
    mobility::upsert_content_type(conn, &content_type)?;

    for unit in units {
        mobility::insert_mobile_unit(conn, unit)?;
    }

    log::info!("Saved {} {type_name} units", units.len());
    Ok(units.len())
}

/// Loads gas filling stations from `file` or `url`, keeps those inside
/// Southwest Finland, and stores them as mobile units.
///
/// # Errors
///
/// Returns [`IngestError`] if loading, parsing or storing fails.
#[allow(clippy::future_not_send)]
pub async fn import_gas_filling_stations(
    conn: &Connection,
    file: Option<&Path>,
    url: &str,
    keep_existing: bool,
) -> Result<usize, IngestError> {
    let feature_set = gas_station::load_feature_set(file, url).await?;
    let lookup = DuckDbStreetLookup::new(conn);
    let units: Vec<MobileUnit> = gas_station::parse_stations(feature_set, &lookup)?
        .into_iter()
        .map(gas_station::GasFillingStation::into_mobile_unit)
        .collect();
    save_mobile_units(conn, gas_station::CONTENT_TYPE_NAME, &units, keep_existing)
}

/// One row of a street names CSV file.
#[derive(Debug, Deserialize)]
struct StreetRow {
    name_fi: String,
    name_sv: Option<String>,
    name_en: Option<String>,
    municipality: String,
}

/// Loads street name translations from a CSV file with the header
/// `name_fi,name_sv,name_en,municipality`. Empty Swedish or English cells
/// are stored as missing. Returns the number of rows stored.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if the file cannot be read or a row is
/// malformed, and [`IngestError::Database`] if an upsert fails.
pub fn import_streets(conn: &Connection, path: &Path) -> Result<usize, IngestError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut stored = 0;

    for row in reader.deserialize() {
        let row: StreetRow = row?;
        let names = Translated {
            fi: Some(row.name_fi),
            sv: row.name_sv.filter(|s| !s.is_empty()),
            en: row.name_en.filter(|s| !s.is_empty()),
        };
        mobility::upsert_street(conn, &names, &row.municipality)?;
        stored += 1;
    }

    log::info!("Saved {stored} streets from {}", path.display());
    Ok(stored)
}

/// One GPS report of a maintenance unit.
#[derive(Debug, Deserialize)]
struct WorkRecord {
    unit_id: String,
    timestamp: DateTime<Utc>,
    longitude: f64,
    latitude: f64,
    #[serde(default)]
    events: Vec<String>,
}

/// Loads maintenance works from a JSON array of
/// `{unit_id, timestamp, longitude, latitude, events}` objects. Units are
/// created as they first appear. Returns the number of works stored.
///
/// # Errors
///
/// Returns [`IngestError::Io`] or [`IngestError::Json`] if the file cannot
/// be read or parsed, and [`IngestError::Database`] if an insert fails.
pub fn import_maintenance_works(conn: &Connection, path: &Path) -> Result<usize, IngestError> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<WorkRecord> = serde_json::from_str(&text)?;

    for record in &records {
        let unit = maintenance::upsert_unit(conn, &record.unit_id)?;
        maintenance::insert_work(
            conn,
            unit,
            record.timestamp,
            record.longitude,
            record.latitude,
            &record.events,
        )?;
    }

    log::info!(
        "Saved {} maintenance works from {}",
        records.len(),
        path.display()
    );
    Ok(records.len())
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street maintenance record types.
//!
//! A [`MaintenanceUnit`] is a vehicle (plough, sweeper, gritter) reporting
//! GPS positions. Each report is stored as a [`MaintenanceWork`]: a
//! timestamped point plus the events (e.g. `auraus`, `liukkaudentorjunta`)
//! the vehicle was performing at that moment.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A maintenance vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceUnit {
    /// Database ID.
    pub id: i64,
    /// Identifier assigned by the source system.
    pub unit_id: String,
}

/// One GPS report of a maintenance vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceWork {
    /// Database ID.
    pub id: i64,
    /// [`MaintenanceUnit::id`] of the reporting vehicle.
    pub maintenance_unit_id: i64,
    /// When the position was recorded.
    pub timestamp: DateTime<Utc>,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Events active at this point.
    pub events: Vec<String>,
}

/// Filters accepted by the maintenance work endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkFilter {
    /// Only works whose events contain this name.
    pub event: Option<String>,
    /// Only works recorded at or after this instant (UTC).
    pub start_date_time: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn work(events: &[&str], hour: u32) -> MaintenanceWork {
        MaintenanceWork {
            id: 1,
            maintenance_unit_id: 1,
            timestamp: Utc.with_ymd_and_hms(2022, 9, 18, hour, 0, 0).unwrap(),
            longitude: 22.27,
            latitude: 60.45,
            events: events.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let json = serde_json::to_value(work(&["auraus"], 0)).unwrap();
        assert_eq!(json["maintenance_unit_id"], 1);
        assert_eq!(json["events"][0], "auraus");
    }
}

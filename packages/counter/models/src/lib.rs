#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic counter vocabulary and record types.
//!
//! Telraam cameras report hourly counts for four vehicle kinds in three
//! directions. [`CountKey`] enumerates every `(vehicle, direction)` pair and
//! [`HourlyCounts`] holds one hour of those counts in a fixed-size table.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of hourly records in a complete day report.
pub const HOURS_PER_DAY: usize = 24;

/// Kind of road user counted by a camera.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VehicleKind {
    /// Pedestrians
    Pedestrian,
    /// Bicycles
    Bike,
    /// Passenger cars
    Car,
    /// Heavy vehicles (trucks, buses). Folded into [`VehicleKind::Car`] on output.
    Heavy,
}

impl VehicleKind {
    /// Returns every vehicle kind in report order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pedestrian, Self::Bike, Self::Car, Self::Heavy]
    }

    /// Vehicle kinds that get their own output columns.
    #[must_use]
    pub const fn output_kinds() -> &'static [Self] {
        &[Self::Pedestrian, Self::Bike, Self::Car]
    }

    /// Single-letter column code (`J` walking, `P` cycling, `A` motor
    /// vehicles).
    #[must_use]
    pub const fn column_code(self) -> char {
        match self {
            Self::Pedestrian => 'J',
            Self::Bike => 'P',
            Self::Car | Self::Heavy => 'A',
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Lane direction of a count, relative to the camera.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// Left lane (`_lft` suffix in reports)
    Left,
    /// Right lane (`_rgt` suffix in reports)
    Right,
    /// Both lanes combined (no suffix in reports)
    Total,
}

impl Direction {
    /// Returns every direction in column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Left, Self::Right, Self::Total]
    }

    /// Suffix appended to the vehicle name in report field keys.
    #[must_use]
    pub const fn report_suffix(self) -> &'static str {
        match self {
            Self::Left => "_lft",
            Self::Right => "_rgt",
            Self::Total => "",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// A `(vehicle, direction)` pair identifying one count field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountKey {
    /// Vehicle kind.
    pub vehicle: VehicleKind,
    /// Lane direction.
    pub direction: Direction,
}

/// Number of distinct count fields per hour.
pub const COUNT_KEYS: usize = 12;

impl CountKey {
    /// Creates a new key.
    #[must_use]
    pub const fn new(vehicle: VehicleKind, direction: Direction) -> Self {
        Self { vehicle, direction }
    }

    /// Returns all twelve keys, vehicles outermost.
    #[must_use]
    pub fn all() -> Vec<Self> {
        VehicleKind::all()
            .iter()
            .flat_map(|v| Direction::all().iter().map(|d| Self::new(*v, *d)))
            .collect()
    }

    /// Field name used by the Telraam API, e.g. `car_lft` or `bike`.
    #[must_use]
    pub fn report_field(self) -> String {
        format!("{}{}", self.vehicle.as_ref(), self.direction.report_suffix())
    }

    const fn index(self) -> usize {
        self.vehicle.index() * Direction::all().len() + self.direction.index()
    }
}

/// Error returned when a report entry carries a count that is not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCountError {
    /// The report field holding the bad value.
    pub field: String,
    /// The offending value rendered as JSON.
    pub value: String,
}

impl std::fmt::Display for InvalidCountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid count for field '{}': expected a number, got {}",
            self.field, self.value
        )
    }
}

impl std::error::Error for InvalidCountError {}

/// Counts for one hour, indexed by [`CountKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourlyCounts {
    counts: [i64; COUNT_KEYS],
}

impl HourlyCounts {
    /// An hour with every count at zero.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            counts: [0; COUNT_KEYS],
        }
    }

    /// Builds an hour from one entry of a Telraam `report` array.
    ///
    /// Values are rounded to the nearest integer. Missing and `null` fields
    /// count as zero.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCountError`] if a count field holds a non-numeric
    /// value.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_report_entry(
        entry: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, InvalidCountError> {
        let mut hour = Self::zeroed();
        for key in CountKey::all() {
            let field = key.report_field();
            let value = match entry.get(&field) {
                None | Some(serde_json::Value::Null) => 0,
                Some(v) => {
                    let n = v.as_f64().ok_or_else(|| InvalidCountError {
                        field: field.clone(),
                        value: v.to_string(),
                    })?;
                    n.round() as i64
                }
            };
            hour.set(key, value);
        }
        Ok(hour)
    }

    /// Returns the raw count for `key`.
    #[must_use]
    pub const fn get(&self, key: CountKey) -> i64 {
        self.counts[key.index()]
    }

    /// Sets the raw count for `key`.
    pub const fn set(&mut self, key: CountKey, value: i64) {
        self.counts[key.index()] = value;
    }

    /// Returns the count as written to output: heavy vehicles are added to
    /// the car count of the same direction.
    #[must_use]
    pub const fn folded(&self, key: CountKey) -> i64 {
        match key.vehicle {
            VehicleKind::Car => {
                self.get(key) + self.get(CountKey::new(VehicleKind::Heavy, key.direction))
            }
            _ => self.get(key),
        }
    }

    /// Whether every count is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }
}

/// A Telraam camera monitored by the importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelraamCamera {
    /// Camera MAC identifier, used in output file and column names.
    pub mac: String,
    /// Instance ID used as the remote API key.
    pub instance_id: String,
    /// When `true`, the left lane is the one heading toward the city centre.
    pub direction: bool,
}

/// Which importer a persisted cursor or station belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterSource {
    /// Telraam hourly CSV import
    TelraamCsv,
    /// Eco-counter bicycle/pedestrian counters
    EcoCounter,
}

/// A fixed counting station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterStation {
    /// Station name (unique per source).
    pub name: String,
    /// Source the station belongs to.
    pub source: CounterSource,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_fields_match_api_names() {
        let fields: Vec<String> = CountKey::all().iter().map(|k| k.report_field()).collect();
        assert_eq!(
            fields,
            vec![
                "pedestrian_lft",
                "pedestrian_rgt",
                "pedestrian",
                "bike_lft",
                "bike_rgt",
                "bike",
                "car_lft",
                "car_rgt",
                "car",
                "heavy_lft",
                "heavy_rgt",
                "heavy",
            ]
        );
    }

    #[test]
    fn count_key_indices_are_unique() {
        let mut indices: Vec<usize> = CountKey::all().iter().map(|k| k.index()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), COUNT_KEYS);
    }

    #[test]
    fn parses_report_entry_with_rounding() {
        let entry = serde_json::json!({
            "date": "2024-05-01T10:00:00.000Z",
            "car_lft": 3.4,
            "car_rgt": 2.5,
            "heavy_lft": 2,
            "bike": null,
        });
        let hour = HourlyCounts::from_report_entry(entry.as_object().unwrap()).unwrap();
        assert_eq!(hour.get(CountKey::new(VehicleKind::Car, Direction::Left)), 3);
        assert_eq!(hour.get(CountKey::new(VehicleKind::Car, Direction::Right)), 3);
        assert_eq!(hour.get(CountKey::new(VehicleKind::Bike, Direction::Total)), 0);
        assert_eq!(
            hour.get(CountKey::new(VehicleKind::Pedestrian, Direction::Left)),
            0
        );
    }

    #[test]
    fn rejects_non_numeric_count() {
        let entry = serde_json::json!({"car_lft": "lots"});
        let err = HourlyCounts::from_report_entry(entry.as_object().unwrap()).unwrap_err();
        assert_eq!(err.field, "car_lft");
    }

    #[test]
    fn folds_heavy_into_car() {
        let mut hour = HourlyCounts::zeroed();
        hour.set(CountKey::new(VehicleKind::Car, Direction::Left), 3);
        hour.set(CountKey::new(VehicleKind::Heavy, Direction::Left), 2);
        hour.set(CountKey::new(VehicleKind::Bike, Direction::Left), 7);
        assert_eq!(
            hour.folded(CountKey::new(VehicleKind::Car, Direction::Left)),
            5
        );
        assert_eq!(
            hour.folded(CountKey::new(VehicleKind::Bike, Direction::Left)),
            7
        );
        assert_eq!(
            hour.folded(CountKey::new(VehicleKind::Car, Direction::Right)),
            0
        );
    }

    #[test]
    fn counter_source_round_trips_through_strings() {
        assert_eq!(CounterSource::TelraamCsv.as_ref(), "TELRAAM_CSV");
        assert_eq!(
            "ECO_COUNTER".parse::<CounterSource>().unwrap(),
            CounterSource::EcoCounter
        );
    }
}

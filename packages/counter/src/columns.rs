//! Projection of hourly counts into a camera's named output columns.

use chrono::TimeDelta;
use city_data_counter_models::{CountKey, Direction, HourlyCounts, TelraamCamera, VehicleKind};

use crate::window::DayWindow;

/// Name of the CSV index column.
pub const INDEX_COLUMN: &str = "startTime";

/// Output columns of one camera, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: Vec<(CountKey, String)>,
}

impl ColumnMapping {
    /// Builds the mapping for `camera`.
    ///
    /// Columns are named `"{mac} {vehicle}{direction}"`. The direction code
    /// is `K` for the lane toward the city centre, `P` for the lane away
    /// from it and `T` for the total. `camera.direction` selects which of
    /// the camera's left/right lanes is which.
    #[must_use]
    pub fn for_camera(camera: &TelraamCamera) -> Self {
        let columns = VehicleKind::output_kinds()
            .iter()
            .flat_map(|vehicle| {
                Direction::all().iter().map(move |direction| {
                    let key = CountKey::new(*vehicle, *direction);
                    let name = format!(
                        "{} {}{}",
                        camera.mac,
                        vehicle.column_code(),
                        direction_code(*direction, camera.direction)
                    );
                    (key, name)
                })
            })
            .collect();

        Self { columns }
    }

    /// Column names in order, without the index column.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, name)| name.as_str())
    }

    /// Projects one hour into column order, folding heavy vehicles into cars.
    #[must_use]
    pub fn project(&self, hour: &HourlyCounts) -> Vec<i64> {
        self.columns.iter().map(|(key, _)| hour.folded(*key)).collect()
    }
}

const fn direction_code(direction: Direction, toward_centre_is_left: bool) -> char {
    match (direction, toward_centre_is_left) {
        (Direction::Left, true) | (Direction::Right, false) => 'K',
        (Direction::Left, false) | (Direction::Right, true) => 'P',
        (Direction::Total, _) => 'T',
    }
}

/// One camera-day ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTable {
    /// Header row, index column first.
    pub header: Vec<String>,
    /// One row per hour: the local timestamp and the projected counts.
    pub rows: Vec<(String, Vec<i64>)>,
}

impl DayTable {
    /// Projects a reconciled day into a table.
    #[must_use]
    pub fn build(
        mapping: &ColumnMapping,
        window: &DayWindow,
        utc_offset: TimeDelta,
        hours: &[HourlyCounts],
    ) -> Self {
        let header = std::iter::once(INDEX_COLUMN)
            .chain(mapping.names())
            .map(str::to_string)
            .collect();

        let rows = (0u32..)
            .zip(hours)
            .map(|(hour, counts)| {
                (
                    window.local_hour_label(hour, utc_offset),
                    mapping.project(counts),
                )
            })
            .collect();

        Self { header, rows }
    }
}

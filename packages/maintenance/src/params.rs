//! Query parameter parsing for the maintenance endpoints.

use chrono::NaiveDateTime;

use crate::MaintenanceError;

/// Largest gap, in seconds, between two reports of one continuous work.
pub const DEFAULT_MAX_WORK_LENGTH: i64 = 30 * 60;

const START_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses `start_date_time` as `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// Returns [`MaintenanceError::InvalidStartDateTime`] for any other format.
pub fn parse_start_date_time(value: &str) -> Result<NaiveDateTime, MaintenanceError> {
    let value = value.trim();
    START_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or(MaintenanceError::InvalidStartDateTime)
}

/// Parses an optional `max_work_length`, falling back to
/// [`DEFAULT_MAX_WORK_LENGTH`].
///
/// # Errors
///
/// Returns [`MaintenanceError::InvalidMaxWorkLength`] if the value is not an
/// integer.
pub fn parse_max_work_length(value: Option<&str>) -> Result<i64, MaintenanceError> {
    value.map_or(Ok(DEFAULT_MAX_WORK_LENGTH), |v| {
        v.trim()
            .parse::<i64>()
            .map_err(|_| MaintenanceError::InvalidMaxWorkLength)
    })
}

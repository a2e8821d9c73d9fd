#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street maintenance logic.
//!
//! [`history`] turns a stream of vehicle GPS reports into the line strings
//! and isolated points drawn on the maintenance map. [`params`] parses the
//! query parameters the maintenance endpoints accept.

pub mod history;
pub mod params;

pub use city_data_maintenance_models as models;

/// Errors raised while handling maintenance queries.
///
/// The messages are returned to API clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaintenanceError {
    /// `start_date_time` did not parse.
    #[error("'start_date_time' must be in format YYYY-MM-DD HH:MM e.g.,'2022-09-18 10:00'")]
    InvalidStartDateTime,

    /// `max_work_length` was not an integer.
    #[error("'max_work_length' needs to be of type integer.")]
    InvalidMaxWorkLength,
}

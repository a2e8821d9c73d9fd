#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic counter importers.
//!
//! The Telraam importer pulls hourly per-camera reports from the Telraam
//! API and writes one CSV file per camera and day. It resumes from a
//! persisted cursor (see [`cursor::ImportCursorStore`]) so that repeated
//! runs only touch new days plus today's still-incomplete file.
//!
//! The eco-counter module fetches counting station locations from a
//! `GeoJSON` feed.

pub mod columns;
pub mod config;
pub mod csv_sink;
pub mod cursor;
pub mod eco_counter;
pub mod fetcher;
pub mod http;
pub mod importer;
pub mod reconcile;
pub mod registry;
pub mod window;

pub use city_data_counter_models as models;

/// Errors that can occur while importing counter data.
#[derive(Debug, thiserror::Error)]
pub enum TelraamError {
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with an unusable response.
    #[error("Unexpected response: {message}")]
    Response {
        /// Description of what went wrong.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The persisted import cursor could not be read or written.
    #[error("Import cursor error: {0}")]
    Cursor(#[source] Box<dyn std::error::Error + Send + Sync>),
}

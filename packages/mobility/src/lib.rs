#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Mobility data importers.
//!
//! Content type metadata comes from the embedded `content_types.toml`.
//! Importers turn third-party feeds into [`models::MobileUnit`] values and
//! leave persistence to the caller.

pub mod address;
pub mod boundary;
pub mod content_types;
pub mod gas_station;

pub use city_data_mobility_models as models;

/// Errors that can occur while importing mobility data.
#[derive(Debug, thiserror::Error)]
pub enum MobilityError {
    /// A content type or importer is misconfigured.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote feed answered with an unusable response.
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

    /// Street name lookup failed.
    #[error("Street lookup failed: {0}")]
    Lookup(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Fetches `url` and parses the body as JSON.
///
/// # Errors
///
/// Returns [`MobilityError::Http`] if the request fails,
/// [`MobilityError::Response`] on a non-success status and
/// [`MobilityError::Json`] if the body is not JSON.
pub async fn fetch_json(url: &str) -> Result<serde_json::Value, MobilityError> {
    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        log::error!("Fetching {url} failed with status {status}");
        return Err(MobilityError::Response {
            message: format!("Fetching {url} status code: {status}"),
        });
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

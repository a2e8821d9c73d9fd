//! Importer configuration.
//!
//! [`TelraamConfig`] is built once at process start and handed to the
//! importer. Nothing in this crate reads the environment after that.

use std::path::PathBuf;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::TelraamError;

/// Default Telraam traffic report endpoint.
pub const DEFAULT_API_URL: &str = "https://telraam-api.net/v1/reports/traffic";

/// Default directory for the per-camera, per-day CSV files.
pub const DEFAULT_CSV_DIR: &str = "data/telraam_data";

/// Timezone the cameras' local days are expressed in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Helsinki;

/// First day imported when no cursor exists yet.
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2023, 1, 1);

/// Configuration for the Telraam importer.
#[derive(Debug, Clone)]
pub struct TelraamConfig {
    /// Telraam report endpoint.
    pub api_url: String,
    /// Value of the `X-Api-Key` header.
    pub token: String,
    /// Directory the CSV files are written to.
    pub csv_dir: PathBuf,
    /// Timezone of the cameras' local days.
    pub timezone: Tz,
    /// Day the cursor is initialised to on the first run.
    pub start_date: NaiveDate,
}

impl TelraamConfig {
    /// Builds the configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TELRAAM_TOKEN` | required |
    /// | `TELRAAM_API_URL` | [`DEFAULT_API_URL`] |
    /// | `TELRAAM_CSV_DIR` | [`DEFAULT_CSV_DIR`] |
    /// | `TELRAAM_TIMEZONE` | `Europe/Helsinki` |
    /// | `TELRAAM_START_DATE` | `2023-01-01` |
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError::Config`] if the token is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, TelraamError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError::Config`] if the token is missing or any
    /// value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TelraamError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TELRAAM_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TelraamError::Config {
                message: "TELRAAM_TOKEN is not set".to_string(),
            })?;

        let api_url = lookup("TELRAAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let csv_dir = PathBuf::from(
            lookup("TELRAAM_CSV_DIR").unwrap_or_else(|| DEFAULT_CSV_DIR.to_string()),
        );

        let timezone = match lookup("TELRAAM_TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|e| TelraamError::Config {
                message: format!("invalid TELRAAM_TIMEZONE {name:?}: {e}"),
            })?,
            None => DEFAULT_TIMEZONE,
        };

        let start_date = match lookup("TELRAAM_START_DATE") {
            Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                TelraamError::Config {
                    message: format!("invalid TELRAAM_START_DATE {s:?}: {e}"),
                }
            })?,
            None => default_start_date(),
        };

        Ok(Self {
            api_url,
            token,
            csv_dir,
            timezone,
            start_date,
        })
    }
}

fn default_start_date() -> NaiveDate {
    let (y, m, d) = DEFAULT_START_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

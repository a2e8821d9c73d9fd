//! Remote report fetching.
//!
//! [`ReportFetcher`] is the seam between the importer and the Telraam API.
//! [`TelraamClient`] is the real implementation; tests substitute a fake.

use async_trait::async_trait;
use city_data_counter_models::HourlyCounts;
use serde_json::{Value, json};

use crate::{TelraamError, config::TelraamConfig, http, window::DayWindow};

/// Source of hourly reports for one camera and one day window.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    /// Fetches the hourly records of `instance_id` inside `window`.
    ///
    /// The result may be empty or shorter than a full day.
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError`] if the request fails or the response cannot
    /// be parsed. Nothing is retried.
    async fn fetch_report(
        &self,
        instance_id: &str,
        window: &DayWindow,
    ) -> Result<Vec<HourlyCounts>, TelraamError>;
}

/// HTTP client for the Telraam traffic report endpoint.
#[derive(Debug, Clone)]
pub struct TelraamClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelraamClient {
    /// Creates a client for the endpoint and token in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &TelraamConfig) -> Result<Self, TelraamError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl ReportFetcher for TelraamClient {
    async fn fetch_report(
        &self,
        instance_id: &str,
        window: &DayWindow,
    ) -> Result<Vec<HourlyCounts>, TelraamError> {
        let body = json!({
            "level": "instances",
            "format": "per-hour",
            "id": instance_id,
            "time_start": window.start_param(),
            "time_end": window.end_param(),
        });

        let request = self
            .client
            .post(&self.api_url)
            .header("X-Api-Key", &self.token)
            .header("Content-Type", "application/json")
            .json(&body);

        let response = http::send_json(request).await?;
        let report = parse_report(&response)?;

        log::info!(
            "Fetched {} hourly records for instance {instance_id} on {}",
            report.len(),
            window.day
        );

        Ok(report)
    }
}

/// Parses the `report` array of a Telraam response.
///
/// A response without a `report` field is treated as an empty report.
///
/// # Errors
///
/// Returns [`TelraamError::Response`] if `report` is not an array of
/// objects or an entry holds a non-numeric count.
pub fn parse_report(response: &Value) -> Result<Vec<HourlyCounts>, TelraamError> {
    let entries = match response.get("report") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(TelraamError::Response {
                message: format!("'report' is not an array: {other}"),
            });
        }
    };

    entries
        .iter()
        .map(|entry| {
            let obj = entry.as_object().ok_or_else(|| TelraamError::Response {
                message: format!("report entry is not an object: {entry}"),
            })?;
            HourlyCounts::from_report_entry(obj).map_err(|e| TelraamError::Response {
                message: e.to_string(),
            })
        })
        .collect()
}

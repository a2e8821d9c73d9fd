//! Gas filling stations from the ArcGIS feature service.
//!
//! The feed covers all of Finland. Only stations inside Southwest Finland
//! are kept.

use std::path::Path;

use city_data_mobility_models::{MobileUnit, Translated};
use serde::Deserialize;
use serde_json::json;

use crate::{
    MobilityError,
    address::{StreetNameLookup, translated_address},
    boundary::in_southwest_finland,
    fetch_json,
};

/// Content type of imported stations.
pub const CONTENT_TYPE_NAME: &str = "GasFillingStation";

/// Environment variable overriding [`DEFAULT_URL`].
pub const URL_ENV: &str = "GAS_FILLING_STATIONS_URL";

/// Feature service query returning every station.
pub const DEFAULT_URL: &str = "https://services1.arcgis.com/rhs5fjYxdOG1Et61/ArcGIS/rest/services/GasFillingStations/FeatureServer/0/query?f=json&where=1%3D1&outFields=OPERATOR%2CLAT%2CLON%2CSTATION_NAME%2CADDRESS%2CCITY%2CZIP_CODE%2CLNG_CNG%2CObjectId";

#[derive(Debug, Deserialize)]
struct FeatureSet {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    attributes: Attributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
struct Attributes {
    operator: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    station_name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    zip_code: Option<String>,
    lng_cng: Option<String>,
}

/// A parsed gas filling station.
#[derive(Debug, Clone, PartialEq)]
pub struct GasFillingStation {
    /// Station name.
    pub name: String,
    /// Operating company.
    pub operator: String,
    /// Fuel availability, e.g. `"CNG"` or `"LNG, CNG"`.
    pub lng_cng: String,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Full address per language.
    pub address: Translated,
}

impl GasFillingStation {
    fn from_attributes(
        attrs: Attributes,
        lookup: &dyn StreetNameLookup,
    ) -> Result<Self, MobilityError> {
        let city = attrs.city.unwrap_or_default();
        let address = translated_address(
            lookup,
            attrs.address.as_deref().unwrap_or_default(),
            attrs.zip_code.as_deref().unwrap_or_default(),
            &city,
        )?;

        Ok(Self {
            name: attrs.station_name.unwrap_or_default(),
            operator: attrs.operator.unwrap_or_default(),
            lng_cng: attrs.lng_cng.unwrap_or_default(),
            longitude: attrs.lon.unwrap_or_default(),
            latitude: attrs.lat.unwrap_or_default(),
            address,
        })
    }

    /// Converts the station into a storable mobile unit.
    #[must_use]
    pub fn into_mobile_unit(self) -> MobileUnit {
        MobileUnit {
            id: None,
            type_name: CONTENT_TYPE_NAME.to_string(),
            name: self.name,
            is_active: true,
            longitude: self.longitude,
            latitude: self.latitude,
            address: self.address,
            extra: json!({ "operator": self.operator, "lng_cng": self.lng_cng }),
        }
    }
}

/// Parses a feature set and keeps the stations inside Southwest Finland.
///
/// Coordinates are taken as WGS84 regardless of the spatial reference the
/// feed declares.
///
/// # Errors
///
/// Returns [`MobilityError::Json`] if the document is not a feature set
/// and propagates street lookup failures.
pub fn parse_stations(
    feature_set: serde_json::Value,
    lookup: &dyn StreetNameLookup,
) -> Result<Vec<GasFillingStation>, MobilityError> {
    let feature_set: FeatureSet = serde_json::from_value(feature_set)?;
    let total = feature_set.features.len();

    let mut stations = Vec::new();
    for feature in feature_set.features {
        let station = GasFillingStation::from_attributes(feature.attributes, lookup)?;
        if in_southwest_finland(station.longitude, station.latitude) {
            stations.push(station);
        }
    }

    log::info!(
        "Filtered: {total} gas filling stations by location to: {}.",
        stations.len()
    );

    Ok(stations)
}

/// Loads the raw feature set from `file`, or from `url` when no file is
/// given.
///
/// # Errors
///
/// Returns [`MobilityError`] if the file or URL cannot be read as JSON.
pub async fn load_feature_set(
    file: Option<&Path>,
    url: &str,
) -> Result<serde_json::Value, MobilityError> {
    if let Some(path) = file {
        log::info!("Reading gas filling stations from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&text)?);
    }

    log::info!("Fetching gas filling stations from {url}");
    fetch_json(url).await
}

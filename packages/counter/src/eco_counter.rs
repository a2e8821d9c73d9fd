//! Eco-counter station locations from a `GeoJSON` feed.

use city_data_counter_models::{CounterSource, CounterStation};
use geojson::{FeatureCollection, GeoJson};

use crate::{TelraamError, http};

/// Environment variable holding the station feed URL.
pub const STATIONS_URL_ENV: &str = "ECO_COUNTER_STATIONS_URL";

/// Property holding the station name.
const NAME_PROPERTY: &str = "Nimi";

/// Fetches and parses the station feed at `url`.
///
/// # Errors
///
/// Returns [`TelraamError`] if the request fails or the body is not a valid
/// station `FeatureCollection`.
pub async fn fetch_stations(url: &str) -> Result<Vec<CounterStation>, TelraamError> {
    let client = reqwest::Client::new();
    let body = http::send_text(client.get(url)).await?;
    let stations = parse_stations(&body)?;
    log::info!("Fetched {} eco-counter stations", stations.len());
    Ok(stations)
}

/// Parses a station `FeatureCollection`.
///
/// Features without a point geometry or a name are skipped with a warning.
///
/// # Errors
///
/// Returns [`TelraamError::Response`] if the document is not a
/// `FeatureCollection`.
pub fn parse_stations(body: &str) -> Result<Vec<CounterStation>, TelraamError> {
    let geojson = body
        .parse::<GeoJson>()
        .map_err(|e| TelraamError::Response {
            message: format!("invalid GeoJSON: {e}"),
        })?;

    let collection = FeatureCollection::try_from(geojson).map_err(|e| TelraamError::Response {
        message: format!("expected a FeatureCollection: {e}"),
    })?;

    let mut stations = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let Some(name) = feature
            .property(NAME_PROPERTY)
            .and_then(serde_json::Value::as_str)
        else {
            log::warn!("Skipping station feature without a '{NAME_PROPERTY}' property");
            continue;
        };

        let point = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::Point(coords)) if coords.len() >= 2 => (coords[0], coords[1]),
            _ => {
                log::warn!("Skipping station {name}: geometry is not a point");
                continue;
            }
        };

        stations.push(CounterStation {
            name: name.to_string(),
            source: CounterSource::EcoCounter,
            longitude: point.0,
            latitude: point.1,
        });
    }

    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"Nimi": "Auransilta"},
                "geometry": {"type": "Point", "coordinates": [22.2705, 60.4487]}
            },
            {
                "type": "Feature",
                "properties": {"Other": "x"},
                "geometry": {"type": "Point", "coordinates": [22.0, 60.0]}
            },
            {
                "type": "Feature",
                "properties": {"Nimi": "Line"},
                "geometry": {"type": "LineString", "coordinates": [[22.0, 60.0], [22.1, 60.1]]}
            }
        ]
    }"#;

    #[test]
    fn parses_named_point_features() {
        let stations = parse_stations(FEED).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Auransilta");
        assert_eq!(stations[0].source, CounterSource::EcoCounter);
        assert!((stations[0].longitude - 22.2705).abs() < f64::EPSILON);
        assert!((stations[0].latitude - 60.4487).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_collections() {
        let err = parse_stations(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#).unwrap_err();
        assert!(matches!(err, TelraamError::Response { .. }));
        assert!(parse_stations("not json").is_err());
    }
}

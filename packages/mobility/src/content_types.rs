//! Content type registry loaded from the embedded `content_types.toml`.

use city_data_mobility_models::ContentType;
use serde::Deserialize;

use crate::MobilityError;

/// Registry embedded at compile time.
const CONTENT_TYPES_TOML: &str = include_str!("../content_types.toml");

#[derive(Debug, Deserialize)]
struct ContentTypeFile {
    content_types: Vec<ContentType>,
}

/// Parses a content type registry document.
///
/// # Errors
///
/// Returns the TOML error message if the document is malformed.
pub fn parse_content_types_toml(toml_str: &str) -> Result<Vec<ContentType>, String> {
    toml::de::from_str::<ContentTypeFile>(toml_str)
        .map(|f| f.content_types)
        .map_err(|e| e.to_string())
}

/// Returns every configured content type.
///
/// # Panics
///
/// Panics if the embedded registry is malformed.
#[must_use]
pub fn all_content_types() -> Vec<ContentType> {
    parse_content_types_toml(CONTENT_TYPES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse content_types.toml: {e}"))
}

/// Returns the content type named `type_name`.
///
/// # Errors
///
/// Returns [`MobilityError::Config`] if the registry has no such type.
pub fn content_type(type_name: &str) -> Result<ContentType, MobilityError> {
    all_content_types()
        .into_iter()
        .find(|c| c.type_name == type_name)
        .ok_or_else(|| MobilityError::Config {
            message: format!("Configuration not found for {type_name} in content_types.toml"),
        })
}

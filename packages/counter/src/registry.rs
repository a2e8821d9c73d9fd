//! Camera registry loaded from the embedded `cameras/telraam.toml`.
//!
//! Adding a camera means appending a `[[cameras]]` table to that file.

use city_data_counter_models::TelraamCamera;
use serde::Deserialize;

/// Camera list embedded at compile time.
const TELRAAM_CAMERAS_TOML: &str = include_str!("../cameras/telraam.toml");

#[derive(Debug, Deserialize)]
struct CameraFile {
    cameras: Vec<TelraamCamera>,
}

/// Parses a camera registry document.
///
/// # Errors
///
/// Returns the TOML error message if the document is malformed.
pub fn parse_cameras_toml(toml_str: &str) -> Result<Vec<TelraamCamera>, String> {
    toml::de::from_str::<CameraFile>(toml_str)
        .map(|f| f.cameras)
        .map_err(|e| e.to_string())
}

/// Returns every monitored Telraam camera.
///
/// # Panics
///
/// Panics if the embedded registry is malformed.
#[must_use]
pub fn telraam_cameras() -> Vec<TelraamCamera> {
    parse_cameras_toml(TELRAAM_CAMERAS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse telraam.toml: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_cameras() {
        let cameras = telraam_cameras();
        assert!(!cameras.is_empty());
        for camera in &cameras {
            assert!(!camera.mac.is_empty(), "camera mac is empty");
            assert!(
                !camera.instance_id.is_empty(),
                "{}: no instance_id",
                camera.mac
            );
        }
    }

    #[test]
    fn camera_macs_are_unique() {
        let cameras = telraam_cameras();
        let mut macs: Vec<&str> = cameras.iter().map(|c| c.mac.as_str()).collect();
        macs.sort_unstable();
        macs.dedup();
        assert_eq!(macs.len(), cameras.len());
    }

    #[test]
    fn parses_direction_flag() {
        let cameras = parse_cameras_toml(
            r#"
            [[cameras]]
            mac = "1"
            instance_id = "10"
            direction = false
            "#,
        )
        .unwrap();
        assert_eq!(cameras.len(), 1);
        assert!(!cameras[0].direction);
    }
}

//! Region boundary used to keep only points inside Southwest Finland.

use std::sync::LazyLock;

use geo::{Intersects as _, Point, Polygon, polygon};

/// Southwest Finland (Varsinais-Suomi) outline, WGS84 lon/lat.
static SOUTHWEST_FINLAND: LazyLock<Polygon<f64>> = LazyLock::new(|| {
    polygon![
        (x: 21.00, y: 59.70),
        (x: 23.30, y: 59.75),
        (x: 23.95, y: 60.15),
        (x: 24.20, y: 60.55),
        (x: 23.70, y: 60.95),
        (x: 22.80, y: 61.20),
        (x: 21.35, y: 61.10),
        (x: 21.05, y: 60.65),
        (x: 20.90, y: 60.10),
        (x: 21.00, y: 59.70),
    ]
});

/// Whether `(longitude, latitude)` lies inside Southwest Finland.
#[must_use]
pub fn in_southwest_finland(longitude: f64, latitude: f64) -> bool {
    SOUTHWEST_FINLAND.intersects(&Point::new(longitude, latitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turku_is_inside() {
        assert!(in_southwest_finland(22.2666, 60.4518));
        assert!(in_southwest_finland(23.1300, 60.3850));
    }

    #[test]
    fn other_regions_are_outside() {
        assert!(!in_southwest_finland(24.9384, 60.1699));
        assert!(!in_southwest_finland(23.7610, 61.4978));
        assert!(!in_southwest_finland(0.0, 0.0));
    }
}

//! Geometry history of maintenance vehicles.
//!
//! Reports are grouped per unit and walked in time order. Consecutive
//! reports belong to the same run of work unless they are more than
//! `max_work_length` seconds apart. A run with two or more reports becomes
//! a line string; a run with a single report becomes a point.

use std::collections::BTreeMap;

use city_data_maintenance_models::MaintenanceWork;
use geo::{Coord, LineString, Point};
use serde_json::{Value, json};

/// Line strings and isolated points of a set of works.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryHistory {
    /// Runs of two or more reports.
    pub linestrings: Vec<LineString<f64>>,
    /// Runs of exactly one report.
    pub points: Vec<Point<f64>>,
}

impl GeometryHistory {
    /// Segments `works` into runs separated by gaps longer than
    /// `max_work_length` seconds.
    ///
    /// Units are processed in ascending ID order. Input order does not
    /// matter.
    #[must_use]
    pub fn build(works: &[MaintenanceWork], max_work_length: i64) -> Self {
        let mut per_unit: BTreeMap<i64, Vec<&MaintenanceWork>> = BTreeMap::new();
        for work in works {
            per_unit
                .entry(work.maintenance_unit_id)
                .or_default()
                .push(work);
        }

        let mut history = Self::default();

        for (unit_id, mut unit_works) in per_unit {
            unit_works.sort_by_key(|w| w.timestamp);
            log::debug!("Unit {unit_id}: {} reports", unit_works.len());

            let mut run: Vec<Coord<f64>> = Vec::new();
            let mut prev: Option<chrono::DateTime<chrono::Utc>> = None;

            for work in unit_works {
                if let Some(prev) = prev {
                    let gap = (work.timestamp - prev).num_seconds();
                    if gap > max_work_length {
                        history.push_run(std::mem::take(&mut run));
                    }
                }
                run.push(Coord {
                    x: work.longitude,
                    y: work.latitude,
                });
                prev = Some(work.timestamp);
            }

            history.push_run(run);
        }

        history
    }

    fn push_run(&mut self, run: Vec<Coord<f64>>) {
        match run.len() {
            0 => {}
            1 => self.points.push(Point(run[0])),
            _ => self.linestrings.push(LineString::new(run)),
        }
    }

    /// Renders the history as the API response body:
    /// `[{"linestrings": [...], "points": [...]}]` with `GeoJSON`
    /// geometries.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let linestrings: Vec<geojson::Geometry> = self
            .linestrings
            .iter()
            .map(|l| geojson::Geometry::new(geojson::Value::from(l)))
            .collect();
        let points: Vec<geojson::Geometry> = self
            .points
            .iter()
            .map(|p| geojson::Geometry::new(geojson::Value::from(p)))
            .collect();

        json!([{ "linestrings": linestrings, "points": points }])
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone as _, Utc};

    use super::*;

    fn work(unit: i64, seconds: i64, x: f64) -> MaintenanceWork {
        MaintenanceWork {
            id: seconds,
            maintenance_unit_id: unit,
            timestamp: Utc.with_ymd_and_hms(2022, 12, 1, 6, 0, 0).unwrap()
                + TimeDelta::seconds(seconds),
            longitude: x,
            latitude: 60.0,
            events: vec!["auraus".to_string()],
        }
    }

    #[test]
    fn gap_longer_than_limit_splits_runs() {
        let works = vec![
            work(1, 0, 22.0),
            work(1, 60, 22.1),
            work(1, 60 + 1801, 22.2),
            work(1, 60 + 1801 + 30, 22.3),
        ];
        let history = GeometryHistory::build(&works, 1800);
        assert_eq!(history.linestrings.len(), 2);
        assert!(history.points.is_empty());
        assert_eq!(history.linestrings[1].0[0].x, 22.2);
    }

    #[test]
    fn gap_equal_to_limit_does_not_split() {
        let works = vec![work(1, 0, 22.0), work(1, 1800, 22.1)];
        let history = GeometryHistory::build(&works, 1800);
        assert_eq!(history.linestrings.len(), 1);
        assert_eq!(history.linestrings[0].0.len(), 2);
    }

    #[test]
    fn single_report_runs_become_points() {
        let works = vec![
            work(1, 0, 22.0),
            work(1, 4000, 22.5),
            work(1, 4010, 22.6),
            work(2, 0, 23.0),
        ];
        let history = GeometryHistory::build(&works, 1800);
        assert_eq!(history.linestrings.len(), 1);
        assert_eq!(history.points.len(), 2);
        assert_eq!(history.points[0].x(), 22.0);
        assert_eq!(history.points[1].x(), 23.0);
    }

    #[test]
    fn gaps_longer_than_a_day_still_split() {
        let works = vec![work(1, 0, 22.0), work(1, 86_400 + 10, 22.1)];
        let history = GeometryHistory::build(&works, 1800);
        assert!(history.linestrings.is_empty());
        assert_eq!(history.points.len(), 2);
    }

    #[test]
    fn input_order_is_irrelevant() {
        let works = vec![work(1, 120, 22.2), work(1, 0, 22.0), work(1, 60, 22.1)];
        let history = GeometryHistory::build(&works, 1800);
        let xs: Vec<f64> = history.linestrings[0].0.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![22.0, 22.1, 22.2]);
    }

    #[test]
    fn renders_geojson_geometries() {
        let works = vec![work(1, 0, 22.0), work(1, 60, 22.1), work(2, 0, 23.0)];
        let body = GeometryHistory::build(&works, 1800).to_geojson();
        assert_eq!(body[0]["linestrings"][0]["type"], "LineString");
        assert_eq!(body[0]["linestrings"][0]["coordinates"][1][0], 22.1);
        assert_eq!(body[0]["points"][0]["type"], "Point");
        assert_eq!(body[0]["points"][0]["coordinates"][0], 23.0);
    }
}

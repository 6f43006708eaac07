//! Aircraft performance lookups consumed by the scenario generators.
//!
//! Scenarios only see the [`TrajectoryPredictor`] trait. The bundled
//! [`LookupTrajectoryPredictor`] interpolates per-type climb profiles
//! tabulated by flight level.

use crate::error::{ScenarioError, ScenarioResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Predictor handle shared between scenarios.
pub type SharedPredictor = Arc<dyn TrajectoryPredictor + Send + Sync>;

/// Performance queries keyed by aircraft type.
pub trait TrajectoryPredictor {
    /// True airspeed (knots) when cruising at `flight_level`.
    fn cruise_speed(&self, aircraft_type: &str, flight_level: u32) -> ScenarioResult<f64>;

    /// Seconds needed to climb from `from_level` to `to_level`.
    fn climb_time(&self, aircraft_type: &str, from_level: u32, to_level: u32) -> ScenarioResult<f64>;

    /// Ground distance (metres) covered while climbing from `from_level` to `to_level`.
    fn downtrack_distance(
        &self,
        aircraft_type: &str,
        from_level: u32,
        to_level: u32,
    ) -> ScenarioResult<f64>;
}

/// One row of a climb profile. Time and distance are cumulative from the
/// lowest tabulated level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub flight_level: u32,
    pub cruise_speed_kt: f64,
    pub climb_time_s: f64,
    pub downtrack_m: f64,
}

impl ProfilePoint {
    pub const fn new(flight_level: u32, cruise_speed_kt: f64, climb_time_s: f64, downtrack_m: f64) -> Self {
        Self {
            flight_level,
            cruise_speed_kt,
            climb_time_s,
            downtrack_m,
        }
    }
}

/// Table-driven predictor: aircraft type → climb profile sorted by level.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<ProfilePoint>>")]
#[serde(into = "BTreeMap<String, Vec<ProfilePoint>>")]
pub struct LookupTrajectoryPredictor {
    profiles: BTreeMap<String, Vec<ProfilePoint>>,
}

impl LookupTrajectoryPredictor {
    pub fn new() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Add or replace the profile for `aircraft_type`.
    pub fn with_profile(mut self, aircraft_type: &str, mut points: Vec<ProfilePoint>) -> Self {
        points.sort_by_key(|p| p.flight_level);
        self.profiles.insert(aircraft_type.to_string(), points);
        self
    }

    pub fn aircraft_types(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Linear interpolation of one profile column at `flight_level`.
    fn interpolate(
        &self,
        aircraft_type: &str,
        flight_level: u32,
        column: fn(&ProfilePoint) -> f64,
    ) -> ScenarioResult<f64> {
        let profile = self
            .profiles
            .get(aircraft_type)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ScenarioError::UnknownAircraftType(aircraft_type.to_string()))?;

        let out_of_range = || ScenarioError::FlightLevelOutOfRange {
            aircraft_type: aircraft_type.to_string(),
            flight_level,
        };

        let upper = profile
            .iter()
            .position(|p| p.flight_level >= flight_level)
            .ok_or_else(out_of_range)?;
        let hi = &profile[upper];
        if hi.flight_level == flight_level {
            return Ok(column(hi));
        }
        if upper == 0 {
            return Err(out_of_range());
        }
        let lo = &profile[upper - 1];
        let t = f64::from(flight_level - lo.flight_level) / f64::from(hi.flight_level - lo.flight_level);
        Ok(column(lo) + t * (column(hi) - column(lo)))
    }
}

impl Default for LookupTrajectoryPredictor {
    /// Illustrative profiles for the default aircraft pool.
    fn default() -> Self {
        Self::new()
            .with_profile(
                "B744",
                vec![
                    ProfilePoint::new(0, 250.0, 0.0, 0.0),
                    ProfilePoint::new(100, 300.0, 240.0, 28_000.0),
                    ProfilePoint::new(200, 420.0, 540.0, 60_000.0),
                    ProfilePoint::new(300, 470.0, 900.0, 100_000.0),
                    ProfilePoint::new(400, 490.0, 1380.0, 150_000.0),
                ],
            )
            .with_profile(
                "B743",
                vec![
                    ProfilePoint::new(0, 250.0, 0.0, 0.0),
                    ProfilePoint::new(100, 295.0, 250.0, 29_000.0),
                    ProfilePoint::new(200, 410.0, 560.0, 62_000.0),
                    ProfilePoint::new(300, 460.0, 940.0, 104_000.0),
                    ProfilePoint::new(400, 480.0, 1440.0, 156_000.0),
                ],
            )
            .with_profile(
                "A320",
                vec![
                    ProfilePoint::new(0, 250.0, 0.0, 0.0),
                    ProfilePoint::new(100, 290.0, 200.0, 25_000.0),
                    ProfilePoint::new(200, 400.0, 460.0, 52_000.0),
                    ProfilePoint::new(300, 440.0, 780.0, 85_000.0),
                    ProfilePoint::new(400, 450.0, 1200.0, 125_000.0),
                ],
            )
    }
}

impl From<BTreeMap<String, Vec<ProfilePoint>>> for LookupTrajectoryPredictor {
    fn from(profiles: BTreeMap<String, Vec<ProfilePoint>>) -> Self {
        profiles
            .into_iter()
            .fold(Self::new(), |acc, (ty, points)| acc.with_profile(&ty, points))
    }
}

impl From<LookupTrajectoryPredictor> for BTreeMap<String, Vec<ProfilePoint>> {
    fn from(predictor: LookupTrajectoryPredictor) -> Self {
        predictor.profiles
    }
}

impl TrajectoryPredictor for LookupTrajectoryPredictor {
    fn cruise_speed(&self, aircraft_type: &str, flight_level: u32) -> ScenarioResult<f64> {
        self.interpolate(aircraft_type, flight_level, |p| p.cruise_speed_kt)
    }

    fn climb_time(&self, aircraft_type: &str, from_level: u32, to_level: u32) -> ScenarioResult<f64> {
        let from = self.interpolate(aircraft_type, from_level, |p| p.climb_time_s)?;
        let to = self.interpolate(aircraft_type, to_level, |p| p.climb_time_s)?;
        Ok(to - from)
    }

    fn downtrack_distance(
        &self,
        aircraft_type: &str,
        from_level: u32,
        to_level: u32,
    ) -> ScenarioResult<f64> {
        let from = self.interpolate(aircraft_type, from_level, |p| p.downtrack_m)?;
        let to = self.interpolate(aircraft_type, to_level, |p| p.downtrack_m)?;
        Ok(to - from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabulated_levels_are_exact() {
        let tp = LookupTrajectoryPredictor::default();
        assert_eq!(tp.cruise_speed("B744", 400).unwrap(), 490.0);
        assert_eq!(tp.climb_time("B744", 200, 400).unwrap(), 840.0);
        assert_eq!(tp.downtrack_distance("B744", 200, 400).unwrap(), 90_000.0);
    }

    #[test]
    fn interpolates_between_levels() {
        let tp = LookupTrajectoryPredictor::default();
        let v = tp.cruise_speed("A320", 250).unwrap();
        assert!((v - 420.0).abs() < 1e-9);
        let t = tp.climb_time("A320", 0, 150).unwrap();
        assert!((t - 330.0).abs() < 1e-9);
    }

    #[test]
    fn lookup_misses_are_errors() {
        let tp = LookupTrajectoryPredictor::default();
        assert_eq!(
            tp.cruise_speed("C172", 50),
            Err(ScenarioError::UnknownAircraftType("C172".into()))
        );
        assert!(matches!(
            tp.climb_time("B744", 200, 450),
            Err(ScenarioError::FlightLevelOutOfRange { flight_level: 450, .. })
        ));
    }

    #[test]
    fn unsorted_tables_are_sorted_on_load() {
        let json = r#"{"DH8D": [
            {"flight_level": 250, "cruise_speed_kt": 300.0, "climb_time_s": 900.0, "downtrack_m": 70000.0},
            {"flight_level": 50, "cruise_speed_kt": 200.0, "climb_time_s": 0.0, "downtrack_m": 0.0}
        ]}"#;
        let tp: LookupTrajectoryPredictor = serde_json::from_str(json).unwrap();
        assert_eq!(tp.climb_time("DH8D", 50, 250).unwrap(), 900.0);
        assert!((tp.downtrack_distance("DH8D", 50, 150).unwrap() - 35_000.0).abs() < 1e-9);
    }
}

//! The aircraft record produced by every scenario.
//!
//! A record is a fixed ten-field description of one aircraft at scenario
//! start. It serializes to a flat JSON object whose keys are listed in
//! [`AircraftRecord::KEYS`]; unknown keys are rejected on the way in.

use sector_models::Point;
use serde::{Deserialize, Serialize};

/// One synthetic aircraft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AircraftRecord {
    pub callsign: String,
    /// ICAO type designator, e.g. `B744`
    #[serde(rename = "type")]
    pub aircraft_type: String,
    /// Fix the aircraft is considered to depart from
    pub departure: String,
    /// Last fix of its route
    pub destination: String,
    /// Fix names still to be flown
    pub route: Vec<String>,
    /// Position at `timedelta`, serialized as `[lon, lat]`
    #[serde(with = "lon_lat")]
    pub start_position: Point,
    pub current_flight_level: u32,
    pub cleared_flight_level: u32,
    pub requested_flight_level: u32,
    /// Seconds after scenario start at which the aircraft appears
    pub timedelta: f64,
}

impl AircraftRecord {
    /// Serialized keys, sorted.
    pub const KEYS: [&'static str; 10] = [
        "callsign",
        "clearedFlightLevel",
        "currentFlightLevel",
        "departure",
        "destination",
        "requestedFlightLevel",
        "route",
        "startPosition",
        "timedelta",
        "type",
    ];
}

mod lon_lat {
    use sector_models::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(p: &Point, s: S) -> Result<S::Ok, S::Error> {
        [p.x(), p.y()].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point, D::Error> {
        let [lon, lat] = <[f64; 2]>::deserialize(d)?;
        Ok(Point::new(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AircraftRecord {
        AircraftRecord {
            callsign: "VJ159".into(),
            aircraft_type: "B744".into(),
            departure: "E".into(),
            destination: "A".into(),
            route: vec!["E".into(), "D".into(), "C".into(), "B".into(), "A".into()],
            start_position: Point::new(-0.1275, 50.41),
            current_flight_level: 200,
            cleared_flight_level: 400,
            requested_flight_level: 400,
            timedelta: 42.0,
        }
    }

    #[test]
    fn serializes_exactly_the_ten_keys() {
        let value = serde_json::to_value(record()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, AircraftRecord::KEYS);
        assert_eq!(value["startPosition"], serde_json::json!([-0.1275, 50.41]));
        assert_eq!(value["type"], "B744");
    }

    #[test]
    fn rejects_extra_keys() {
        let mut value = serde_json::to_value(record()).unwrap();
        value["squawk"] = serde_json::json!("7000");
        assert!(serde_json::from_value::<AircraftRecord>(value).is_err());
    }
}

//! Great-circle primitives on a spherical earth.
//!
//! Arguments follow the aviation convention of latitude before longitude;
//! returned [`Point`]s are `(x = longitude, y = latitude)` in degrees.
//! Distances are metres along the haversine great circle (mean earth radius).

use crate::Point;
use geo::{Bearing, Destination, Distance, Haversine, InterpolatePoint};

/// Metres in one international nautical mile.
pub const METRES_PER_NM: f64 = 1852.0;

/// Great-circle distance in metres between `(lat1, lon1)` and `(lat2, lon2)`.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance_between(Point::new(lon1, lat1), Point::new(lon2, lat2))
}

/// Great-circle distance in metres between two points.
pub fn distance_between(from: Point, to: Point) -> f64 {
    if from == to {
        return 0.0;
    }
    Haversine::distance(from, to)
}

/// The point reached after travelling `distance_m` from point 1 towards
/// point 2 along the great circle joining them.
///
/// Zero distance returns point 1 verbatim. Distances beyond the end of the
/// segment continue along the same great circle.
pub fn waypoint_location(lat1: f64, lon1: f64, lat2: f64, lon2: f64, distance_m: f64) -> Point {
    point_towards(Point::new(lon1, lat1), Point::new(lon2, lat2), distance_m)
}

/// [`waypoint_location`] for points.
pub fn point_towards(from: Point, to: Point, distance_m: f64) -> Point {
    if distance_m == 0.0 || from == to {
        return from;
    }
    let total = Haversine::distance(from, to);
    if distance_m <= total {
        Haversine::point_at_distance_between(from, to, distance_m)
    } else {
        destination(from, bearing(from, to), distance_m)
    }
}

/// Initial great-circle bearing from `from` to `to`, degrees clockwise from north.
pub fn bearing(from: Point, to: Point) -> f64 {
    Haversine::bearing(from, to)
}

/// The point `distance_m` metres from `origin` on initial bearing `bearing_deg`.
pub fn destination(origin: Point, bearing_deg: f64, distance_m: f64) -> Point {
    if distance_m == 0.0 {
        return origin;
    }
    Haversine::destination(origin, bearing_deg, distance_m)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: (f64, f64) = (51.5, -0.1275);
    const PARIS: (f64, f64) = (48.8566, 2.3522);

    #[test]
    fn distance_is_symmetric_and_positive() {
        let d1 = distance(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        let d2 = distance(PARIS.0, PARIS.1, LONDON.0, LONDON.1);
        assert!((d1 - d2).abs() < 1e-6);
        // London to Paris is roughly 343 km.
        assert!(d1 > 330_000.0 && d1 < 355_000.0, "d = {d1}");
        assert_eq!(distance(LONDON.0, LONDON.1, LONDON.0, LONDON.1), 0.0);
    }

    #[test]
    fn triangle_inequality() {
        let (lat3, lon3) = (50.1109, 8.6821);
        let ab = distance(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        let bc = distance(PARIS.0, PARIS.1, lat3, lon3);
        let ac = distance(LONDON.0, LONDON.1, lat3, lon3);
        assert!(ac <= ab + bc);
    }

    #[test]
    fn waypoint_endpoints() {
        let start = waypoint_location(LONDON.0, LONDON.1, PARIS.0, PARIS.1, 0.0);
        assert_eq!(start, Point::new(LONDON.1, LONDON.0));

        let total = distance(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        let end = waypoint_location(LONDON.0, LONDON.1, PARIS.0, PARIS.1, total);
        assert!((end.x() - PARIS.1).abs() <= 1e-8 * PARIS.1.abs());
        assert!((end.y() - PARIS.0).abs() <= 1e-8 * PARIS.0.abs());
    }

    #[test]
    fn waypoint_is_monotonic_along_path() {
        let total = distance(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        let mut last = 0.0;
        for k in 1..=10 {
            let p = waypoint_location(LONDON.0, LONDON.1, PARIS.0, PARIS.1, total * k as f64 / 10.0);
            let travelled = distance(LONDON.0, LONDON.1, p.y(), p.x());
            assert!(travelled > last);
            assert!((travelled - total * k as f64 / 10.0).abs() < 1.0);
            last = travelled;
        }
    }

    #[test]
    fn destination_matches_bearing_and_distance() {
        let origin = Point::new(LONDON.1, LONDON.0);
        let north = destination(origin, 0.0, 60.0 * METRES_PER_NM);
        assert!((north.x() - origin.x()).abs() < 1e-9);
        // One degree of latitude is close to 60 nm.
        assert!((north.y() - origin.y() - 1.0).abs() < 0.01);
        assert!((distance_between(origin, north) - 60.0 * METRES_PER_NM).abs() < 1e-3);
    }
}

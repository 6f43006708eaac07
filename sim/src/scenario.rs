//! The scenario capability and the pieces every generator shares.
//!
//! A [`Scenario`] produces a finite, lazy and restartable stream of
//! [`AircraftRecord`]s. Generators own a seed, never a live RNG: each call to
//! [`Scenario::aircraft_generator`] reseeds a fresh `ChaCha8Rng`, so repeated
//! calls on the same instance replay the same draws.
//!
//! Layered scenarios expose the scenario they wrap through
//! [`Scenario::underlying_scenario`] and only produce their own aircraft in
//! [`Scenario::own_aircraft`]. The full stream walks the chain with a loop,
//! so stack use does not grow with the number of layers.

use crate::aircraft::AircraftRecord;
use crate::error::{ScenarioError, ScenarioResult};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use sector_models::{Point, Route, SectorElement};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lazy aircraft sequence. An `Err` item ends a well-formed consumer's read.
pub type AircraftStream<'a> = Box<dyn Iterator<Item = ScenarioResult<AircraftRecord>> + 'a>;

/// Callsign suffixes are drawn from this range.
const CALLSIGN_NUMBERS: std::ops::Range<u32> = 100..1000;

/// Anything that can produce a reproducible aircraft sequence over a sector.
pub trait Scenario {
    /// The sector whose routes the aircraft fly.
    fn sector(&self) -> &Arc<SectorElement>;

    /// Pools the aircraft are drawn from.
    fn settings(&self) -> &ScenarioSettings;

    /// Aircraft added by this scenario alone, excluding anything it wraps.
    fn own_aircraft(&self) -> AircraftStream<'_>;

    /// The scenario this one wraps, if any.
    fn underlying_scenario(&self) -> Option<&dyn Scenario> {
        None
    }

    /// A fresh iterator over the aircraft of the whole chain, innermost first.
    /// The stream ends right after the first `Err`.
    fn aircraft_generator(&self) -> AircraftStream<'_> {
        let mut inner = Vec::new();
        let mut next = self.underlying_scenario();
        while let Some(scenario) = next {
            inner.push(scenario);
            next = scenario.underlying_scenario();
        }
        let stream = inner
            .into_iter()
            .rev()
            .flat_map(|scenario| scenario.own_aircraft())
            .chain(self.own_aircraft());
        Box::new(stop_after_error(stream))
    }

    /// Run the generator to completion, stopping at the first error.
    fn collect_aircraft(&self) -> ScenarioResult<Vec<AircraftRecord>> {
        self.aircraft_generator().collect()
    }
}

impl<S: Scenario + ?Sized> Scenario for Box<S> {
    fn sector(&self) -> &Arc<SectorElement> {
        (**self).sector()
    }

    fn settings(&self) -> &ScenarioSettings {
        (**self).settings()
    }

    fn own_aircraft(&self) -> AircraftStream<'_> {
        (**self).own_aircraft()
    }

    fn underlying_scenario(&self) -> Option<&dyn Scenario> {
        (**self).underlying_scenario()
    }

    fn aircraft_generator(&self) -> AircraftStream<'_> {
        (**self).aircraft_generator()
    }
}

/// Pass items through until the first `Err`, which is yielded and ends the
/// stream without pulling anything further from `stream`.
fn stop_after_error<'a, I>(mut stream: I) -> impl Iterator<Item = ScenarioResult<AircraftRecord>> + 'a
where
    I: Iterator<Item = ScenarioResult<AircraftRecord>> + 'a,
{
    let mut failed = false;
    std::iter::from_fn(move || {
        if failed {
            return None;
        }
        let item = stream.next()?;
        failed = item.is_err();
        Some(item)
    })
}

/// Draw pools shared by a scenario and every layer stacked on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// ICAO type designators
    pub aircraft_types: Vec<String>,
    /// Callsign prefixes; a three-digit number is appended
    pub callsign_prefixes: Vec<String>,
    /// Allowed flight levels (hundreds of feet)
    pub flight_levels: Vec<u32>,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            aircraft_types: vec!["B744".into(), "B743".into(), "A320".into()],
            callsign_prefixes: vec!["SPEEDBIRD".into(), "VJ".into(), "DELTA".into(), "EZY".into()],
            flight_levels: vec![200, 400],
        }
    }
}

impl ScenarioSettings {
    /// Flight levels sorted ascending without repeats.
    pub fn distinct_flight_levels(&self) -> Vec<u32> {
        let mut levels = self.flight_levels.clone();
        levels.sort_unstable();
        levels.dedup();
        levels
    }

    /// Every pool must offer at least one entry.
    pub fn require_pools(&self) -> ScenarioResult<()> {
        if self.aircraft_types.is_empty() {
            return Err(ScenarioError::EmptyPool("aircraft types"));
        }
        if self.callsign_prefixes.is_empty() {
            return Err(ScenarioError::EmptyPool("callsign prefixes"));
        }
        if self.flight_levels.is_empty() {
            return Err(ScenarioError::EmptyPool("flight levels"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shared draw helpers
// ---------------------------------------------------------------------------

pub(crate) fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform pick from a non-empty pool.
pub(crate) fn pick<'a, T>(rng: &mut ChaCha8Rng, pool: &'a [T], what: &'static str) -> ScenarioResult<&'a T> {
    pool.choose(rng).ok_or(ScenarioError::EmptyPool(what))
}

/// Prefix from the pool followed by a three-digit number, e.g. `EZY318`.
pub(crate) fn draw_callsign(rng: &mut ChaCha8Rng, prefixes: &[String]) -> ScenarioResult<String> {
    let prefix = pick(rng, prefixes, "callsign prefixes")?;
    Ok(format!("{prefix}{}", rng.gen_range(CALLSIGN_NUMBERS)))
}

pub(crate) fn require_routes(sector: &SectorElement) -> ScenarioResult<()> {
    if sector.routes().is_empty() {
        return Err(ScenarioError::NoRoutes(sector.name().to_string()));
    }
    Ok(())
}

/// Flight-level triple of a record.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Levels {
    pub current: u32,
    pub cleared: u32,
    pub requested: u32,
}

impl Levels {
    pub fn level(flight_level: u32) -> Self {
        Self {
            current: flight_level,
            cleared: flight_level,
            requested: flight_level,
        }
    }
}

/// A record flying `route` from the fix at `departure_index` to its end.
pub(crate) fn route_record(
    callsign: String,
    aircraft_type: String,
    route: &Route,
    departure_index: usize,
    start_position: Point,
    levels: Levels,
    timedelta: f64,
) -> AircraftRecord {
    let names = route.fix_names();
    let departure_index = departure_index.min(names.len().saturating_sub(1));
    AircraftRecord {
        callsign,
        aircraft_type,
        departure: names.get(departure_index).cloned().unwrap_or_default(),
        destination: names.last().cloned().unwrap_or_default(),
        route: names[departure_index..].to_vec(),
        start_position,
        current_flight_level: levels.current,
        cleared_flight_level: levels.cleared,
        requested_flight_level: levels.requested,
        timedelta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_models::{SectorType, ShapeParams};

    #[test]
    fn distinct_levels_are_sorted() {
        let settings = ScenarioSettings {
            flight_levels: vec![400, 200, 400, 300],
            ..Default::default()
        };
        assert_eq!(settings.distinct_flight_levels(), vec![200, 300, 400]);
    }

    #[test]
    fn empty_pools_are_reported() {
        let settings = ScenarioSettings {
            callsign_prefixes: vec![],
            ..Default::default()
        };
        assert_eq!(
            settings.require_pools(),
            Err(ScenarioError::EmptyPool("callsign prefixes"))
        );
        assert!(ScenarioSettings::default().require_pools().is_ok());
    }

    #[test]
    fn callsigns_are_reproducible() {
        let prefixes = ScenarioSettings::default().callsign_prefixes;
        let a = draw_callsign(&mut seeded_rng(7), &prefixes).unwrap();
        let b = draw_callsign(&mut seeded_rng(7), &prefixes).unwrap();
        assert_eq!(a, b);
        let digits = &a[a.len() - 3..];
        assert!(digits.chars().all(|c| c.is_ascii_digit()), "{a}");
        assert!(prefixes.iter().any(|p| a.starts_with(p.as_str())));
    }

    #[test]
    fn route_record_starts_at_departure() {
        let sector = SectorElement::build("S", SectorType::I, &ShapeParams::default()).unwrap();
        let route = &sector.routes()[1];
        let start = route.fix_points()[1];
        let rec = route_record("EZY100".into(), "A320".into(), route, 1, start, Levels::level(300), 0.0);
        assert_eq!(rec.departure, "B");
        assert_eq!(rec.destination, "E");
        assert_eq!(rec.route, vec!["B", "C", "D", "E"]);
        assert_eq!(rec.cleared_flight_level, 300);
    }
}

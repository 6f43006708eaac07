//! Overflier/climber conflict seed.
//!
//! Two aircraft per run:
//! - an **overflier** crossing the sector at the higher of two flight levels;
//! - a **climber** starting below it and levelling off at the overflier's
//!   level exactly where, and when, the overflier passes the sector centre.
//!
//! # Draw order (one `ChaCha8Rng` seeded from `seed` per call)
//! 1. overflier type, 2. overflier callsign, 3. climber type,
//! 4. climber callsign (number redrawn while equal to the overflier's),
//! 5. overflier route, 6. climber route, 7. two distinct flight levels,
//! 8. overflier entry offset in whole seconds.
//!
//! # Geometry
//! Every spoke crosses the centre fix, which is the conflict point. The
//! overflier enters at its route's first fix and reaches the centre at
//! `T = offset + d / v_cruise`. The climber starts `downtrack_distance` short
//! of the centre on its own route and appears at `T - climb_time`. If that is
//! negative both offsets shift so the earliest aircraft appears at 0.

use crate::aircraft::AircraftRecord;
use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::{
    draw_callsign, pick, require_routes, route_record, seeded_rng, AircraftStream, Levels, Scenario,
    ScenarioSettings,
};
use crate::trajectory::SharedPredictor;
use rand::prelude::*;
use sector_models::geo_helper::{bearing, destination, distance_between, METRES_PER_NM};
use sector_models::{SectorElement, SPOKE_CENTRE};
use std::sync::Arc;

/// Upper bound of the overflier's entry offset (seconds).
pub const MAX_ENTRY_OFFSET_S: u32 = 300;

/// Metres per second in one knot.
const MPS_PER_KNOT: f64 = METRES_PER_NM / 3600.0;

/// Canonical two-aircraft conflict scenario.
#[derive(Clone)]
pub struct OverflierClimberScenario {
    sector: Arc<SectorElement>,
    predictor: SharedPredictor,
    settings: ScenarioSettings,
    seed: u64,
}

impl OverflierClimberScenario {
    pub fn new(
        sector: Arc<SectorElement>,
        predictor: SharedPredictor,
        settings: ScenarioSettings,
        seed: u64,
    ) -> ScenarioResult<Self> {
        settings.require_pools()?;
        if settings.distinct_flight_levels().len() < 2 {
            return Err(ScenarioError::InsufficientFlightLevels(settings.flight_levels.clone()));
        }
        require_routes(&sector)?;
        Ok(Self {
            sector,
            predictor,
            settings,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build both records; nothing is returned unless both succeed.
    fn synthesize(&self) -> ScenarioResult<[AircraftRecord; 2]> {
        let mut rng = seeded_rng(self.seed);
        let settings = &self.settings;

        let overflier_type = pick(&mut rng, &settings.aircraft_types, "aircraft types")?.clone();
        let overflier_callsign = draw_callsign(&mut rng, &settings.callsign_prefixes)?;
        let climber_type = pick(&mut rng, &settings.aircraft_types, "aircraft types")?.clone();
        let mut climber_callsign = draw_callsign(&mut rng, &settings.callsign_prefixes)?;
        while climber_callsign == overflier_callsign {
            climber_callsign = draw_callsign(&mut rng, &settings.callsign_prefixes)?;
        }

        let routes = self.sector.routes();
        let overflier_route = &routes[rng.gen_range(0..routes.len())];
        let climber_route = &routes[rng.gen_range(0..routes.len())];

        let levels = settings.distinct_flight_levels();
        let pair: Vec<u32> = levels.choose_multiple(&mut rng, 2).copied().collect();
        let (low, high) = match pair.as_slice() {
            [a, b] => ((*a).min(*b), (*a).max(*b)),
            _ => return Err(ScenarioError::InsufficientFlightLevels(settings.flight_levels.clone())),
        };
        let entry_offset = f64::from(rng.gen_range(0..=MAX_ENTRY_OFFSET_S));

        let cruise_kt = self.predictor.cruise_speed(&overflier_type, high)?;
        if !cruise_kt.is_finite() || cruise_kt <= 0.0 {
            return Err(ScenarioError::InvalidPerformance {
                aircraft_type: overflier_type,
                quantity: "cruise speed",
                value: cruise_kt,
            });
        }
        let climb_time = self.predictor.climb_time(&climber_type, low, high)?;
        let downtrack = self.predictor.downtrack_distance(&climber_type, low, high)?;
        for (quantity, value) in [("climb time", climb_time), ("downtrack distance", downtrack)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::InvalidPerformance {
                    aircraft_type: climber_type.clone(),
                    quantity,
                    value,
                });
            }
        }

        let overflier_points = overflier_route.fix_points();
        let conflict = overflier_points[SPOKE_CENTRE];
        let to_conflict = distance_between(overflier_points[0], conflict);
        let conflict_time = entry_offset + to_conflict / (cruise_kt * MPS_PER_KNOT);

        let climber_entry = climber_route.fix_points()[0];
        let climber_start = destination(conflict, bearing(conflict, climber_entry), downtrack);

        let mut overflier_td = entry_offset;
        let mut climber_td = conflict_time - climb_time;
        if climber_td < 0.0 {
            let shift = -climber_td;
            tracing::warn!(shift, "climber would start before the scenario; shifting both aircraft");
            overflier_td += shift;
            climber_td = 0.0;
        }

        tracing::debug!(
            overflier = %overflier_callsign,
            climber = %climber_callsign,
            overflier_route = overflier_route.name(),
            climber_route = climber_route.name(),
            low,
            high,
            conflict_time = conflict_time + overflier_td - entry_offset,
            "synthesized overflier/climber pair"
        );

        let overflier = route_record(
            overflier_callsign,
            overflier_type,
            overflier_route,
            0,
            overflier_points[0],
            Levels::level(high),
            overflier_td,
        );
        let climber = route_record(
            climber_callsign,
            climber_type,
            climber_route,
            0,
            climber_start,
            Levels {
                current: low,
                cleared: high,
                requested: high,
            },
            climber_td,
        );
        Ok([overflier, climber])
    }
}

impl Scenario for OverflierClimberScenario {
    fn sector(&self) -> &Arc<SectorElement> {
        &self.sector
    }

    fn settings(&self) -> &ScenarioSettings {
        &self.settings
    }

    fn own_aircraft(&self) -> AircraftStream<'_> {
        Box::new(
            std::iter::once_with(move || self.synthesize()).flat_map(|pair| match pair {
                Ok(records) => records.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            }),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::{LookupTrajectoryPredictor, TrajectoryPredictor};
    use sector_models::{SectorType, ShapeParams};

    fn sector(kind: SectorType) -> Arc<SectorElement> {
        Arc::new(SectorElement::build("HELL", kind, &ShapeParams::default()).unwrap())
    }

    fn settings() -> ScenarioSettings {
        ScenarioSettings {
            aircraft_types: vec!["B744".into(), "B743".into()],
            callsign_prefixes: vec!["SPEEDBIRD".into(), "VJ".into(), "DELTA".into(), "EZY".into()],
            flight_levels: vec![200, 400],
        }
    }

    fn scenario(kind: SectorType, seed: u64) -> OverflierClimberScenario {
        OverflierClimberScenario::new(
            sector(kind),
            Arc::new(LookupTrajectoryPredictor::default()),
            settings(),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn yields_exactly_two_records() {
        for kind in [SectorType::I, SectorType::X, SectorType::Y] {
            let aircraft = scenario(kind, 223).collect_aircraft().unwrap();
            assert_eq!(aircraft.len(), 2);
            for rec in &aircraft {
                let value = serde_json::to_value(rec).unwrap();
                assert_eq!(value.as_object().unwrap().len(), AircraftRecord::KEYS.len());
            }
        }
    }

    #[test]
    fn repeated_calls_replay_the_same_pair() {
        let s = scenario(SectorType::X, 11);
        assert_eq!(s.collect_aircraft().unwrap(), s.collect_aircraft().unwrap());
        assert_eq!(
            s.collect_aircraft().unwrap(),
            scenario(SectorType::X, 11).collect_aircraft().unwrap()
        );
    }

    #[test]
    fn climber_levels_off_at_the_overflier_crossing() {
        let predictor = LookupTrajectoryPredictor::default();
        for seed in 0..20 {
            let s = scenario(SectorType::Y, seed);
            let [overflier, climber]: [AircraftRecord; 2] =
                s.collect_aircraft().unwrap().try_into().unwrap();

            assert_eq!(overflier.current_flight_level, 400);
            assert_eq!(overflier.cleared_flight_level, 400);
            assert_eq!(climber.current_flight_level, 200);
            assert_eq!(climber.cleared_flight_level, 400);
            assert_eq!(climber.requested_flight_level, 400);
            assert_ne!(overflier.callsign, climber.callsign);
            assert!(overflier.timedelta >= 0.0 && climber.timedelta >= 0.0);

            let centre = s.sector().shape().centre_fix().position;
            let downtrack = predictor.downtrack_distance(&climber.aircraft_type, 200, 400).unwrap();
            assert!((distance_between(climber.start_position, centre) - downtrack).abs() < 1.0);

            let speed = predictor.cruise_speed(&overflier.aircraft_type, 400).unwrap() * MPS_PER_KNOT;
            let overflier_at_centre =
                overflier.timedelta + distance_between(overflier.start_position, centre) / speed;
            let climb = predictor.climb_time(&climber.aircraft_type, 200, 400).unwrap();
            assert!((climber.timedelta + climb - overflier_at_centre).abs() < 1e-6, "seed {seed}");
        }
    }

    #[test]
    fn overflier_enters_at_its_first_fix() {
        let s = scenario(SectorType::I, 5);
        let overflier = &s.collect_aircraft().unwrap()[0];
        let route = s
            .sector()
            .routes()
            .iter()
            .find(|r| r.fix_names()[0] == overflier.departure)
            .unwrap();
        assert_eq!(overflier.start_position, route.fix_points()[0]);
        assert_eq!(overflier.route, route.fix_names());
        assert_eq!(&overflier.destination, route.fix_names().last().unwrap());
    }

    #[test]
    fn needs_two_distinct_levels() {
        let err = OverflierClimberScenario::new(
            sector(SectorType::I),
            Arc::new(LookupTrajectoryPredictor::default()),
            ScenarioSettings {
                flight_levels: vec![300, 300],
                ..settings()
            },
            1,
        )
        .err()
        .unwrap();
        assert_eq!(err, ScenarioError::InsufficientFlightLevels(vec![300, 300]));
    }

    #[test]
    fn unknown_type_fails_before_any_record() {
        let s = OverflierClimberScenario::new(
            sector(SectorType::I),
            Arc::new(LookupTrajectoryPredictor::new()),
            settings(),
            3,
        )
        .unwrap();
        let mut stream = s.aircraft_generator();
        assert!(matches!(
            stream.next(),
            Some(Err(ScenarioError::UnknownAircraftType(_)))
        ));
        assert!(stream.next().is_none());
    }
}

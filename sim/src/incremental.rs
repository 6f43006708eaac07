//! Incremental layer: re-emit an underlying scenario, then add one aircraft.
//!
//! Each layer owns its inner scenario, a seed and five start-position
//! weights. At construction the seed picks one of the sector's routes. On
//! every generator call the layer replays that draw, samples a "fifth" of the
//! route's end-to-end great circle with probability proportional to its
//! weight, and starts the new aircraft at the beginning of that fifth.
//!
//! Each layer keeps its own handle on the sector and a copy of the draw
//! pools, so nothing walks down the chain except the shared stream driver in
//! [`Scenario::aircraft_generator`].
//!
//! ```text
//! P0 ----+----+----+----+---- P4      fifths j = 0..4
//!   j=0   j=1  j=2  j=3  j=4
//! pre-fix  0    1    1    2    2      floor((j + 1) / 2)
//! ```

use crate::aircraft::AircraftRecord;
use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::{
    draw_callsign, pick, require_routes, route_record, seeded_rng, AircraftStream, Levels, Scenario,
    ScenarioSettings,
};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use sector_models::geo_helper::{distance_between, point_towards};
use sector_models::{Point, Route, SectorElement};
use std::sync::Arc;

/// Number of equal-distance subdivisions of a route.
pub const SEGMENT_COUNT: usize = 5;

/// Decorator adding one aircraft to `S`.
#[derive(Clone, Debug)]
pub struct IncrementalOcdScenario<S> {
    underlying: S,
    sector: Arc<SectorElement>,
    settings: ScenarioSettings,
    seed: u64,
    weights: [f64; SEGMENT_COUNT],
    segment_index: WeightedIndex<f64>,
    route_count: usize,
    route: Route,
}

impl<S: Scenario> IncrementalOcdScenario<S> {
    /// Layer with uniform start-position weights.
    pub fn new(underlying: S, seed: u64) -> ScenarioResult<Self> {
        Self::with_start_position_distribution(underlying, seed, &[1.0; SEGMENT_COUNT])
    }

    /// Layer whose start fifth is drawn proportionally to `weights`.
    pub fn with_start_position_distribution(
        underlying: S,
        seed: u64,
        weights: &[f64],
    ) -> ScenarioResult<Self> {
        let weights: [f64; SEGMENT_COUNT] = weights.try_into().map_err(|_| {
            ScenarioError::InvalidWeights(format!(
                "expected {SEGMENT_COUNT} weights, got {}",
                weights.len()
            ))
        })?;
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ScenarioError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {w}"
            )));
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err(ScenarioError::InvalidWeights("all weights are zero".into()));
        }
        let segment_index =
            WeightedIndex::new(weights).map_err(|e| ScenarioError::InvalidWeights(e.to_string()))?;

        let settings = underlying.settings().clone();
        settings.require_pools()?;
        let sector = Arc::clone(underlying.sector());
        require_routes(&sector)?;
        let route_count = sector.routes().len();
        let route = sector.routes()[seeded_rng(seed).gen_range(0..route_count)].clone();

        tracing::info!(seed, route = route.name(), ?weights, "incremental layer");

        Ok(Self {
            underlying,
            sector,
            settings,
            seed,
            weights,
            segment_index,
            route_count,
            route,
        })
    }

    /// The route chosen for this layer's aircraft.
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn start_position_distribution(&self) -> &[f64; SEGMENT_COUNT] {
        &self.weights
    }

    pub fn underlying(&self) -> &S {
        &self.underlying
    }

    pub fn into_underlying(self) -> S {
        self.underlying
    }

    /// The two ends of the sampled fifth of the route.
    pub fn choose_route_segment(&self) -> [Point; 2] {
        let mut rng = self.reseed();
        self.segment(self.segment_index.sample(&mut rng))
    }

    /// Route fix associated with the sampled fifth: `floor((j + 1) / 2)`.
    pub fn pre_fix_index(&self) -> usize {
        let mut rng = self.reseed();
        pre_fix(self.segment_index.sample(&mut rng))
    }

    /// A generator positioned just after the route draw, as at construction.
    fn reseed(&self) -> ChaCha8Rng {
        let mut rng = seeded_rng(self.seed);
        let _route = rng.gen_range(0..self.route_count);
        rng
    }

    /// Boundaries of the five fifths, `P0` and `P4` verbatim at the ends.
    fn fifths(&self) -> [Point; SEGMENT_COUNT + 1] {
        let points = self.route.fix_points();
        let (first, last) = (points[0], points[points.len() - 1]);
        let total = distance_between(first, last);
        let mut fifths = [first; SEGMENT_COUNT + 1];
        for (k, fifth) in fifths.iter_mut().enumerate().skip(1) {
            *fifth = if k == SEGMENT_COUNT {
                last
            } else {
                point_towards(first, last, total * k as f64 / SEGMENT_COUNT as f64)
            };
        }
        fifths
    }

    fn segment(&self, j: usize) -> [Point; 2] {
        let fifths = self.fifths();
        [fifths[j], fifths[j + 1]]
    }

    fn synthesize(&self) -> ScenarioResult<AircraftRecord> {
        let mut rng = self.reseed();
        let j = self.segment_index.sample(&mut rng);
        let [start, _] = self.segment(j);

        let settings = &self.settings;
        let aircraft_type = pick(&mut rng, &settings.aircraft_types, "aircraft types")?.clone();
        let callsign = draw_callsign(&mut rng, &settings.callsign_prefixes)?;
        let level = *pick(&mut rng, &settings.flight_levels, "flight levels")?;

        tracing::debug!(
            seed = self.seed,
            %callsign,
            route = self.route.name(),
            segment = j,
            level,
            "synthesized incremental aircraft"
        );

        Ok(route_record(
            callsign,
            aircraft_type,
            &self.route,
            pre_fix(j),
            start,
            Levels::level(level),
            0.0,
        ))
    }
}

fn pre_fix(segment: usize) -> usize {
    (segment + 1) / 2
}

impl<S: Scenario> Scenario for IncrementalOcdScenario<S> {
    fn sector(&self) -> &Arc<SectorElement> {
        &self.sector
    }

    fn settings(&self) -> &ScenarioSettings {
        &self.settings
    }

    fn own_aircraft(&self) -> AircraftStream<'_> {
        Box::new(std::iter::once_with(move || self.synthesize()))
    }

    fn underlying_scenario(&self) -> Option<&dyn Scenario> {
        Some(&self.underlying)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

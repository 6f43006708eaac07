//! `sim` — Seeded scenario generators: conflict seeds and incremental layers.
//!
//! # Module layout
//! - [`scenario`]          — The `Scenario` capability and shared draw helpers
//! - [`empty`]             — Aircraft-free base scenario
//! - [`overflier_climber`] — Two-aircraft conflict seed
//! - [`incremental`]       — Layer adding one aircraft on a weighted fifth of a route
//! - [`trajectory`]        — Aircraft performance lookups
//! - [`aircraft`]          — The serialized aircraft record
//! - [`config`]            — JSON scenario-chain description
//! - [`output`]            — Aircraft list file IO

pub mod aircraft;
pub mod config;
pub mod empty;
pub mod error;
pub mod incremental;
pub mod output;
pub mod overflier_climber;
pub mod scenario;
pub mod trajectory;

pub use aircraft::AircraftRecord;
pub use config::{load_config, BaseScenario, LayerConfig, ScenarioConfig};
pub use empty::EmptyScenario;
pub use error::{ScenarioError, ScenarioResult};
pub use incremental::{IncrementalOcdScenario, SEGMENT_COUNT};
pub use output::{load_aircraft, save_aircraft, write_aircraft};
pub use overflier_climber::OverflierClimberScenario;
pub use scenario::{AircraftStream, Scenario, ScenarioSettings};
pub use trajectory::{LookupTrajectoryPredictor, ProfilePoint, SharedPredictor, TrajectoryPredictor};

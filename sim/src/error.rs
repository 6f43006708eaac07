//! Scenario construction and generation errors.

use sector_models::SectorError;
use thiserror::Error;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error(transparent)]
    Sector(#[from] SectorError),

    /// Start-position weights must be five finite, non-negative values, not all zero.
    #[error("invalid start position distribution: {0}")]
    InvalidWeights(String),

    #[error("at least two distinct flight levels are required, got {0:?}")]
    InsufficientFlightLevels(Vec<u32>),

    #[error("no {0} configured")]
    EmptyPool(&'static str),

    #[error("sector '{0}' has no routes")]
    NoRoutes(String),

    /// The trajectory predictor has no profile for this type.
    #[error("no performance data for aircraft type '{0}'")]
    UnknownAircraftType(String),

    #[error("flight level {flight_level} outside the {aircraft_type} profile")]
    FlightLevelOutOfRange {
        aircraft_type: String,
        flight_level: u32,
    },

    /// A predictor returned a value no flight can have.
    #[error("{aircraft_type}: {quantity} of {value} is not usable")]
    InvalidPerformance {
        aircraft_type: String,
        quantity: &'static str,
        value: f64,
    },
}

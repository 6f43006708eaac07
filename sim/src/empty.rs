//! A scenario with no aircraft, used as the base of incremental chains.

use crate::scenario::{AircraftStream, Scenario, ScenarioSettings};
use sector_models::SectorElement;
use std::sync::Arc;

/// Yields nothing; carries the sector and draw pools for layers above it.
#[derive(Clone, Debug)]
pub struct EmptyScenario {
    sector: Arc<SectorElement>,
    settings: ScenarioSettings,
}

impl EmptyScenario {
    pub fn new(sector: Arc<SectorElement>) -> Self {
        Self::with_settings(sector, ScenarioSettings::default())
    }

    pub fn with_settings(sector: Arc<SectorElement>, settings: ScenarioSettings) -> Self {
        Self { sector, settings }
    }
}

impl Scenario for EmptyScenario {
    fn sector(&self) -> &Arc<SectorElement> {
        &self.sector
    }

    fn settings(&self) -> &ScenarioSettings {
        &self.settings
    }

    fn own_aircraft(&self) -> AircraftStream<'_> {
        Box::new(std::iter::empty())
    }
}

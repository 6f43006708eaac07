//! JSON description of a full scenario chain.
//!
//! A config names the sector, picks a base scenario, and stacks any number of
//! incremental layers on top:
//!
//! ```json
//! {
//!   "sector_name": "HELL",
//!   "shape": "y",
//!   "base": "overflier_climber",
//!   "seed": 223,
//!   "layers": [{ "seed": 22 }, { "seed": 7, "start_position_distribution": [0, 1, 1, 1, 0] }]
//! }
//! ```
//!
//! Every field is optional and falls back to [`ScenarioConfig::default`].

use crate::empty::EmptyScenario;
use crate::error::{ScenarioError, ScenarioResult};
use crate::incremental::IncrementalOcdScenario;
use crate::overflier_climber::OverflierClimberScenario;
use crate::scenario::{Scenario, ScenarioSettings};
use crate::trajectory::LookupTrajectoryPredictor;
use sector_models::{SectorElement, SectorType, ShapeParams};
use serde::{Deserialize, Serialize};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Scenario at the bottom of the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseScenario {
    /// No aircraft of its own
    Empty,
    /// The two-aircraft conflict seed
    #[default]
    OverflierClimber,
}

/// One incremental layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub seed: u64,
    /// Five start-position weights; uniform when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position_distribution: Option<Vec<f64>>,
}

impl LayerConfig {
    pub fn uniform(seed: u64) -> Self {
        Self {
            seed,
            start_position_distribution: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub sector_name: String,
    pub shape: SectorType,
    pub shape_params: ShapeParams,
    pub base: BaseScenario,
    /// Seed of the base scenario
    pub seed: u64,
    pub settings: ScenarioSettings,
    /// Applied bottom-up: the first layer wraps the base
    pub layers: Vec<LayerConfig>,
    /// Aircraft performance table used by the overflier/climber base
    pub performance: LookupTrajectoryPredictor,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sector_name: "HELL".into(),
            shape: SectorType::I,
            shape_params: ShapeParams::default(),
            base: BaseScenario::default(),
            seed: 0,
            settings: ScenarioSettings::default(),
            layers: Vec::new(),
            performance: LookupTrajectoryPredictor::default(),
        }
    }
}

impl ScenarioConfig {
    /// Append `count` uniform layers seeded `seed + 1, seed + 2, ...`.
    pub fn with_extra_layers(mut self, count: usize) -> Self {
        let next = self.layers.iter().map(|l| l.seed).max().unwrap_or(self.seed);
        self.layers
            .extend((1..=count as u64).map(|k| LayerConfig::uniform(next.wrapping_add(k))));
        self
    }

    /// Build the sector, the base scenario and every layer, in that order.
    pub fn build(&self) -> ScenarioResult<Box<dyn Scenario>> {
        let sector = Arc::new(SectorElement::build(
            self.sector_name.as_str(),
            self.shape,
            &self.shape_params,
        )?);

        let mut scenario: Box<dyn Scenario> = match self.base {
            BaseScenario::Empty => Box::new(EmptyScenario::with_settings(sector, self.settings.clone())),
            BaseScenario::OverflierClimber => {
                self.check_performance()?;
                Box::new(OverflierClimberScenario::new(
                    sector,
                    Arc::new(self.performance.clone()),
                    self.settings.clone(),
                    self.seed,
                )?)
            }
        };

        for layer in &self.layers {
            let wrapped = match &layer.start_position_distribution {
                Some(weights) => {
                    IncrementalOcdScenario::with_start_position_distribution(scenario, layer.seed, weights)?
                }
                None => IncrementalOcdScenario::new(scenario, layer.seed)?,
            };
            scenario = Box::new(wrapped);
        }

        tracing::info!(
            sector = %self.sector_name,
            shape = %self.shape,
            base = ?self.base,
            layers = self.layers.len(),
            "scenario chain built"
        );
        Ok(scenario)
    }

    /// Every aircraft type the base may draw needs a performance profile.
    fn check_performance(&self) -> ScenarioResult<()> {
        let known: Vec<&str> = self.performance.aircraft_types().collect();
        match self
            .settings
            .aircraft_types
            .iter()
            .find(|t| !known.contains(&t.as_str()))
        {
            Some(missing) => Err(ScenarioError::UnknownAircraftType(missing.clone())),
            None => Ok(()),
        }
    }
}

/// Load a scenario config from a JSON file.
pub fn load_config(path: &Path) -> anyhow::Result<ScenarioConfig> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let config: ScenarioConfig = serde_json::from_reader(reader)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chain_is_the_conflict_pair() {
        let scenario = ScenarioConfig::default().build().unwrap();
        assert_eq!(scenario.collect_aircraft().unwrap().len(), 2);
    }

    #[test]
    fn extra_layers_add_one_aircraft_each() {
        let config = ScenarioConfig {
            base: BaseScenario::Empty,
            ..Default::default()
        }
        .with_extra_layers(4);
        assert_eq!(config.layers.len(), 4);
        assert_eq!(config.layers[0].seed, 1);
        assert_eq!(config.build().unwrap().collect_aircraft().unwrap().len(), 4);

        let more = config.with_extra_layers(2);
        assert_eq!(more.layers[4].seed, 5);
    }

    #[test]
    fn parses_a_partial_document() {
        let json = r#"{
            "shape": "y",
            "seed": 223,
            "shape_params": { "centre": [2.35, 48.85] },
            "layers": [{ "seed": 22 }, { "seed": 7, "start_position_distribution": [0, 1, 1, 1, 0] }]
        }"#;
        let config: ScenarioConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.shape, SectorType::Y);
        assert_eq!(config.base, BaseScenario::OverflierClimber);
        assert_eq!(config.shape_params.length_nm, 50.0);
        assert_eq!(config.settings, ScenarioSettings::default());

        let aircraft = config.build().unwrap().collect_aircraft().unwrap();
        assert_eq!(aircraft.len(), 4);
    }

    #[test]
    fn bad_layer_weights_fail_the_build() {
        let config = ScenarioConfig {
            layers: vec![LayerConfig {
                seed: 1,
                start_position_distribution: Some(vec![1.0, 1.0]),
            }],
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(ScenarioError::InvalidWeights(_))));
    }

    #[test]
    fn types_without_performance_fail_the_build() {
        let mut config = ScenarioConfig::default();
        config.settings.aircraft_types.push("C172".into());
        assert_eq!(
            config.build().err(),
            Some(ScenarioError::UnknownAircraftType("C172".into()))
        );

        // The empty base never consults the performance table.
        config.base = BaseScenario::Empty;
        assert!(config.build().is_ok());
    }

    #[test]
    fn sector_errors_surface_through_the_build() {
        let config = ScenarioConfig {
            shape_params: ShapeParams::default().with_fix_names(&["a", "b", "c"]),
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(ScenarioError::Sector(_))));
    }
}

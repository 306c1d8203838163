//! Scenario configuration
//!
//! Loaded once from YAML before any action is processed; the per-building
//! table is looked up by the action layer at validate/execute time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buildings::BuildingKind;
use crate::map::tile::LandType;
use crate::map::MAX_AGENTS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("scenario parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("scenario validation error: {0}")]
    Validation(String),
}

/// Top-level scenario settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    pub map: MapConfig,
    pub agents: AgentConfig,
    #[serde(default)]
    pub actions: ActionTable,
}

fn default_ticks() -> u64 {
    200
}

/// Grid geometry and terrain-walker budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_walkers")]
    pub walkers: u32,
    #[serde(default = "default_water_budget")]
    pub water_budget: u32,
    #[serde(default = "default_mountain_budget")]
    pub mountain_budget: u32,
    #[serde(default = "default_desert_budget")]
    pub desert_budget: u32,
    #[serde(default = "default_river_budget")]
    pub river_budget: u32,
    #[serde(default = "default_marsh_budget")]
    pub marsh_budget: u32,
    #[serde(default = "default_resource_chance")]
    pub resource_chance: f64,
}

fn default_walkers() -> u32 {
    10
}

fn default_water_budget() -> u32 {
    100
}

fn default_mountain_budget() -> u32 {
    40
}

fn default_desert_budget() -> u32 {
    20
}

fn default_river_budget() -> u32 {
    20
}

fn default_marsh_budget() -> u32 {
    15
}

fn default_resource_chance() -> f64 {
    0.05
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub count: usize,
    #[serde(default = "default_starting_money")]
    pub starting_money: f64,
}

fn default_starting_money() -> f64 {
    1000.0
}

/// Cost/reward tuning for the claim action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSettings {
    pub cost: f64,
    pub reward: f64,
}

impl Default for ClaimSettings {
    fn default() -> Self {
        Self {
            cost: 10.0,
            reward: 1.0,
        }
    }
}

/// Tuning for one building kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingSettings {
    pub cost: f64,
    pub reward: f64,
    #[serde(default)]
    pub money_gain_per_turn: f64,
    #[serde(default)]
    pub maintenance_cost_per_turn: f64,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    pub allowed_land_types: Vec<LandType>,
}

fn default_max_level() -> u32 {
    1
}

/// Per-action tuning table, fully materialized before the first tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionTable {
    #[serde(default)]
    pub claim: ClaimSettings,
    #[serde(default = "default_city")]
    pub city: BuildingSettings,
    #[serde(default = "default_farm")]
    pub farm: BuildingSettings,
    #[serde(default = "default_mine")]
    pub mine: BuildingSettings,
    #[serde(default = "default_road")]
    pub road: BuildingSettings,
    #[serde(default = "default_bridge")]
    pub bridge: BuildingSettings,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self {
            claim: ClaimSettings::default(),
            city: default_city(),
            farm: default_farm(),
            mine: default_mine(),
            road: default_road(),
            bridge: default_bridge(),
        }
    }
}

fn default_city() -> BuildingSettings {
    BuildingSettings {
        cost: 500.0,
        reward: 10.0,
        money_gain_per_turn: 110.0,
        maintenance_cost_per_turn: 10.0,
        max_level: 3,
        allowed_land_types: vec![LandType::Land, LandType::Desert, LandType::Marsh],
    }
}

fn default_farm() -> BuildingSettings {
    BuildingSettings {
        cost: 100.0,
        reward: 3.0,
        money_gain_per_turn: 20.0,
        maintenance_cost_per_turn: 2.0,
        max_level: 1,
        allowed_land_types: vec![LandType::Land, LandType::Marsh],
    }
}

fn default_mine() -> BuildingSettings {
    BuildingSettings {
        cost: 150.0,
        reward: 3.0,
        money_gain_per_turn: 25.0,
        maintenance_cost_per_turn: 3.0,
        max_level: 1,
        allowed_land_types: vec![LandType::Mountain],
    }
}

fn default_road() -> BuildingSettings {
    BuildingSettings {
        cost: 20.0,
        reward: 1.0,
        money_gain_per_turn: 0.0,
        maintenance_cost_per_turn: 1.0,
        max_level: 1,
        allowed_land_types: vec![
            LandType::Land,
            LandType::Desert,
            LandType::Marsh,
            LandType::Mountain,
        ],
    }
}

fn default_bridge() -> BuildingSettings {
    BuildingSettings {
        cost: 50.0,
        reward: 1.0,
        money_gain_per_turn: 0.0,
        maintenance_cost_per_turn: 2.0,
        max_level: 1,
        allowed_land_types: vec![LandType::River, LandType::Ocean],
    }
}

impl ActionTable {
    pub fn building(&self, kind: BuildingKind) -> &BuildingSettings {
        match kind {
            BuildingKind::City => &self.city,
            BuildingKind::Farm => &self.farm,
            BuildingKind::Mine => &self.mine,
            BuildingKind::Road => &self.road,
            BuildingKind::Bridge => &self.bridge,
        }
    }
}

impl Settings {
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width == 0 || self.map.height == 0 {
            return Err(ConfigError::Validation(
                "map must have non-zero width and height".into(),
            ));
        }
        if self.agents.count == 0 {
            return Err(ConfigError::Validation(
                "scenario must define at least one agent".into(),
            ));
        }
        if self.agents.count > MAX_AGENTS {
            return Err(ConfigError::Validation(format!(
                "agent count {} exceeds the supported maximum of {}",
                self.agents.count, MAX_AGENTS
            )));
        }
        if !(0.0..=1.0).contains(&self.map.resource_chance) {
            return Err(ConfigError::Validation(
                "resource_chance must lie in [0, 1]".into(),
            ));
        }
        for kind in BuildingKind::ALL {
            if self.actions.building(kind).allowed_land_types.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "building {kind:?} has an empty land-type allow-list"
                )));
            }
        }
        Ok(())
    }

    /// Built-in scenario used when no YAML is supplied.
    pub fn small_world() -> Self {
        Self {
            name: "small_world".to_string(),
            seed: 7,
            ticks: default_ticks(),
            map: MapConfig {
                width: 100,
                height: 100,
                walkers: default_walkers(),
                water_budget: default_water_budget(),
                mountain_budget: default_mountain_budget(),
                desert_budget: default_desert_budget(),
                river_budget: default_river_budget(),
                marsh_budget: default_marsh_budget(),
                resource_chance: default_resource_chance(),
            },
            agents: AgentConfig {
                count: 4,
                starting_money: default_starting_money(),
            },
            actions: ActionTable::default(),
        }
    }
}

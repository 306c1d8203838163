//! Episode orchestration
//!
//! Owns the map, the agent roster, and the rng streams. Each tick takes one
//! command per agent and resolves them strictly sequentially in agent-index
//! order: validation reads live state, so an earlier agent's successful
//! claim or build can reject a later agent's command in the same tick.

use anyhow::Result;
use rand::Rng;
use serde::Serialize;

use crate::actions::{build_action_for, Action, ClaimAction};
use crate::agent::{Agent, AgentSummary};
use crate::buildings::BuildingKind;
use crate::config::Settings;
use crate::map::generator;
use crate::map::position::MapPosition;
use crate::map::{AgentId, Map};
use crate::rng::RngManager;

/// One agent's proposal for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentCommand {
    Idle,
    Claim(MapPosition),
    Build(BuildingKind, MapPosition),
}

impl AgentCommand {
    fn into_action(self) -> Option<Box<dyn Action>> {
        match self {
            AgentCommand::Idle => None,
            AgentCommand::Claim(pos) => Some(Box::new(ClaimAction::new(pos))),
            AgentCommand::Build(kind, pos) => Some(build_action_for(kind, pos)),
        }
    }
}

/// Outcome of one tick: the per-agent rewards, in agent-index order.
#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub rewards: Vec<f64>,
}

/// Read-only bulk export of the world, one row per tile plus agent lines.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<[i32; 3]>,
    pub agents: Vec<AgentSummary>,
}

pub struct Engine {
    settings: Settings,
    map: Map,
    agents: Vec<Agent>,
    rng: RngManager,
    tick: u64,
}

impl Engine {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let map = Map::new(settings.map.width, settings.map.height);
        let agents = (0..settings.agents.count)
            .map(|id| Agent::new(id, settings.agents.starting_money))
            .collect();
        let rng = RngManager::new(settings.seed);
        let mut engine = Self {
            settings,
            map,
            agents,
            rng,
            tick: 0,
        };
        engine.reset();
        Ok(engine)
    }

    /// Regenerates terrain and restores every tile and agent to its initial
    /// state. Each agent gets a revealed neighborhood around a spawn tile;
    /// everything else starts under fog.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.rng.reset();
        self.map.reset();
        generator::generate(&mut self.map, &self.settings.map, self.rng.stream("mapgen"));

        let starting_money = self.settings.agents.starting_money;
        for agent in &mut self.agents {
            agent.reset(starting_money);
        }
        for id in 0..self.agents.len() {
            let spawn = self.pick_spawn();
            self.agents[id].uncover_around(&mut self.map, spawn);
        }
    }

    /// A land tile chosen from the spawn stream; falls back to the map
    /// center when the terrain is hostile everywhere.
    fn pick_spawn(&mut self) -> MapPosition {
        let width = self.map.width() as i32;
        let height = self.map.height() as i32;
        let rng = self.rng.stream("spawn");
        let mut candidate = MapPosition::new(width / 2, height / 2);
        for _ in 0..64 {
            let pos = MapPosition::new(rng.gen_range(0..width), rng.gen_range(0..height));
            if self
                .map
                .tile(pos)
                .is_some_and(|t| t.land() == crate::map::tile::LandType::Land)
            {
                candidate = pos;
                break;
            }
        }
        candidate
    }

    /// Resolves one tick. `commands` is indexed by agent id; missing entries
    /// are treated as `Idle`. Rejected commands yield zero reward and leave
    /// no trace on the map.
    pub fn step(&mut self, commands: &[AgentCommand]) -> TickSummary {
        let mut rewards = vec![0.0; self.agents.len()];
        for index in 0..self.agents.len() {
            let command = commands.get(index).copied().unwrap_or(AgentCommand::Idle);
            let Some(action) = command.into_action() else {
                continue;
            };
            let agent = &mut self.agents[index];
            if action.validate(&self.map, agent, &self.settings.actions) {
                rewards[index] = action.execute(&mut self.map, agent, &self.settings.actions);
            }
        }

        self.accrue_income();
        self.tick += 1;
        TickSummary {
            tick: self.tick,
            rewards,
        }
    }

    /// Credits every owned building's net income to its owner, scaled by the
    /// tile's land income multiplier. Ownerless roads and bridges cost
    /// nobody anything.
    fn accrue_income(&mut self) {
        let mut deltas: Vec<(AgentId, f64)> = Vec::new();
        for tile in self.map.tiles() {
            for building in tile.buildings() {
                if let Some(owner) = building.owner {
                    deltas.push((
                        owner,
                        building.net_income_per_turn() * tile.land_income_multiplier(),
                    ));
                }
            }
        }
        for (owner, delta) in deltas {
            if let Some(agent) = self.agents.get_mut(owner) {
                agent.money += delta;
            }
        }
    }

    pub fn observation(&self) -> Observation {
        Observation {
            tick: self.tick,
            width: self.map.width(),
            height: self.map.height(),
            tiles: self.map.full_info(),
            agents: self.agents.iter().map(Agent::summary).collect(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn rng(&mut self) -> &mut RngManager {
        &mut self.rng
    }

    /// A uniformly random command drawn from the policy stream. Demo driver
    /// for the CLI runner; real policies live outside this crate.
    pub fn random_command(&mut self) -> AgentCommand {
        let width = self.map.width() as i32;
        let height = self.map.height() as i32;
        let rng = self.rng.stream("policy");
        let pos = MapPosition::new(rng.gen_range(0..width), rng.gen_range(0..height));
        match rng.gen_range(0..7) {
            0 => AgentCommand::Idle,
            1 => AgentCommand::Claim(pos),
            2 => AgentCommand::Build(BuildingKind::City, pos),
            3 => AgentCommand::Build(BuildingKind::Farm, pos),
            4 => AgentCommand::Build(BuildingKind::Mine, pos),
            5 => AgentCommand::Build(BuildingKind::Road, pos),
            _ => AgentCommand::Build(BuildingKind::Bridge, pos),
        }
    }
}

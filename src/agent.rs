//! Acting agents, referenced by id inside the core

use std::collections::HashSet;

use serde::Serialize;

use crate::map::position::MapPosition;
use crate::map::{AgentId, Map};

/// One participant in the simulation. The core mutates `money` through action
/// costs/rewards and per-tick accrual, and `claimed_tiles` through claims.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    pub money: f64,
    pub claimed_tiles: HashSet<MapPosition>,
}

/// Per-agent line in the exported observation.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub money: f64,
    pub claimed_tiles: usize,
}

impl Agent {
    pub fn new(id: AgentId, starting_money: f64) -> Self {
        Self {
            id,
            money: starting_money,
            claimed_tiles: HashSet::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn add_claimed_tile(&mut self, pos: MapPosition) {
        self.claimed_tiles.insert(pos);
    }

    /// Reveals `pos` and its surrounding tiles to this agent. Invoked after
    /// every successful claim or build.
    pub fn uncover_around(&self, map: &mut Map, pos: MapPosition) {
        map.set_visible(pos, self.id);
        for neighbor in pos.surrounding() {
            map.set_visible(neighbor, self.id);
        }
    }

    pub fn reset(&mut self, starting_money: f64) {
        self.money = starting_money;
        self.claimed_tiles.clear();
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            money: self.money,
            claimed_tiles: self.claimed_tiles.len(),
        }
    }
}

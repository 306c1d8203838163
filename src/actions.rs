//! Territorial actions: the two-phase validate/execute protocol
//!
//! Every action is checked against live map state and either executes fully
//! or not at all. `validate` is side-effect free; `execute` must only run
//! after `validate` passed for the same world state, which the engine
//! guarantees by re-validating immediately before each execute in a tick.

use crate::agent::Agent;
use crate::buildings::{Building, BuildingKind};
use crate::config::{ActionTable, BuildingSettings};
use crate::map::position::MapPosition;
use crate::map::Map;

/// Common contract for all territorial actions. Actions see only the map,
/// the acting agent, and the tuning table, never the whole environment.
pub trait Action {
    /// Precondition check. Must not mutate anything.
    fn validate(&self, map: &Map, agent: &Agent, actions: &ActionTable) -> bool;

    /// Applies the action and returns its immediate reward.
    fn execute(&self, map: &mut Map, agent: &mut Agent, actions: &ActionTable) -> f64;
}

/// Claim an unowned, visible tile adjacent to the agent's territory.
pub struct ClaimAction {
    pub position: MapPosition,
}

impl ClaimAction {
    pub fn new(position: MapPosition) -> Self {
        Self { position }
    }
}

impl Action for ClaimAction {
    fn validate(&self, map: &Map, agent: &Agent, _actions: &ActionTable) -> bool {
        let Some(tile) = map.tile(self.position) else {
            return false;
        };
        if !tile.is_visible_to(agent.id()) {
            return false;
        }
        match tile.owner() {
            // re-claiming one's own tile is an idempotent success
            Some(owner) if owner == agent.id() => true,
            Some(_) => false,
            None => has_claimable_neighbor(map, agent, self.position),
        }
    }

    fn execute(&self, map: &mut Map, agent: &mut Agent, actions: &ActionTable) -> f64 {
        let already_owned = map
            .tile(self.position)
            .is_some_and(|t| t.owner() == Some(agent.id()));
        if !already_owned {
            map.claim_tile(agent.id(), self.position);
            agent.add_claimed_tile(self.position);
            agent.uncover_around(map, self.position);
        }
        agent.money -= actions.claim.cost;
        actions.claim.reward
    }
}

/// A surrounding tile supports claiming iff the agent owns it, or it holds a
/// city the agent owns. A road or bridge alone never qualifies, whoever
/// placed it; any owned tile qualifies even without a building.
fn has_claimable_neighbor(map: &Map, agent: &Agent, pos: MapPosition) -> bool {
    map.surrounding_tiles(pos).into_iter().any(|tile| {
        if tile.owner() == Some(agent.id()) {
            return true;
        }
        tile.building(BuildingKind::City)
            .is_some_and(|city| city.owner == Some(agent.id()))
    })
}

/// Gate shared by every build action: on-grid, allowed land type, visible to
/// the actor, and no existing building on the tile.
fn build_site_ok(map: &Map, agent: &Agent, actions: &ActionTable, kind: BuildingKind, pos: MapPosition) -> bool {
    let Some(tile) = map.tile(pos) else {
        return false;
    };
    if !actions
        .building(kind)
        .allowed_land_types
        .contains(&tile.land())
    {
        return false;
    }
    if !tile.is_visible_to(agent.id()) {
        return false;
    }
    !tile.has_any_building()
}

fn charge(agent: &mut Agent, settings: &BuildingSettings) -> f64 {
    agent.money -= settings.cost;
    settings.reward
}

pub struct BuildCityAction {
    pub position: MapPosition,
}

impl BuildCityAction {
    pub fn new(position: MapPosition) -> Self {
        Self { position }
    }
}

impl Action for BuildCityAction {
    fn validate(&self, map: &Map, agent: &Agent, actions: &ActionTable) -> bool {
        if !build_site_ok(map, agent, actions, BuildingKind::City, self.position) {
            return false;
        }
        // a city may go on unowned ground or the agent's own ground, never
        // on another agent's tile
        match map.tile(self.position).and_then(|t| t.owner()) {
            Some(owner) => owner == agent.id(),
            None => true,
        }
    }

    fn execute(&self, map: &mut Map, agent: &mut Agent, actions: &ActionTable) -> f64 {
        let settings = actions.building(BuildingKind::City);
        let city = Building::new(
            BuildingKind::City,
            Some(agent.id()),
            self.position,
            settings.money_gain_per_turn,
            settings.maintenance_cost_per_turn,
        );
        map.add_building(city, self.position);
        map.claim_tile(agent.id(), self.position);
        agent.add_claimed_tile(self.position);
        agent.uncover_around(map, self.position);
        map.trigger_surrounding_tile_update(self.position);
        charge(agent, settings)
    }
}

/// Shared rule for farms and mines: only on the agent's own vacant ground,
/// with a compatible resource doubling the configured income.
fn validate_worked_building(
    map: &Map,
    agent: &Agent,
    actions: &ActionTable,
    kind: BuildingKind,
    pos: MapPosition,
) -> bool {
    if !build_site_ok(map, agent, actions, kind, pos) {
        return false;
    }
    map.tile(pos).and_then(|t| t.owner()) == Some(agent.id())
}

fn execute_worked_building(
    map: &mut Map,
    agent: &mut Agent,
    actions: &ActionTable,
    kind: BuildingKind,
    pos: MapPosition,
) -> f64 {
    let settings = actions.building(kind);
    let mut building = Building::new(
        kind,
        Some(agent.id()),
        pos,
        settings.money_gain_per_turn,
        settings.maintenance_cost_per_turn,
    );
    let boosted = kind
        .compatible_resource()
        .is_some_and(|resource| map.tile(pos).is_some_and(|t| t.has_resource(resource)));
    if boosted {
        building.income_per_turn *= 2.0;
    }
    map.add_building(building, pos);
    map.claim_tile(agent.id(), pos);
    agent.add_claimed_tile(pos);
    agent.uncover_around(map, pos);
    map.trigger_surrounding_tile_update(pos);
    charge(agent, settings)
}

pub struct BuildFarmAction {
    pub position: MapPosition,
}

impl BuildFarmAction {
    pub fn new(position: MapPosition) -> Self {
        Self { position }
    }
}

impl Action for BuildFarmAction {
    fn validate(&self, map: &Map, agent: &Agent, actions: &ActionTable) -> bool {
        validate_worked_building(map, agent, actions, BuildingKind::Farm, self.position)
    }

    fn execute(&self, map: &mut Map, agent: &mut Agent, actions: &ActionTable) -> f64 {
        execute_worked_building(map, agent, actions, BuildingKind::Farm, self.position)
    }
}

pub struct BuildMineAction {
    pub position: MapPosition,
}

impl BuildMineAction {
    pub fn new(position: MapPosition) -> Self {
        Self { position }
    }
}

impl Action for BuildMineAction {
    fn validate(&self, map: &Map, agent: &Agent, actions: &ActionTable) -> bool {
        validate_worked_building(map, agent, actions, BuildingKind::Mine, self.position)
    }

    fn execute(&self, map: &mut Map, agent: &mut Agent, actions: &ActionTable) -> f64 {
        execute_worked_building(map, agent, actions, BuildingKind::Mine, self.position)
    }
}

/// Shared rule for roads and bridges: buildable on the agent's own ground or
/// on any ground adjacent to an existing building, whoever owns it. Linear
/// buildings carry no owner and trigger the autotile update on placement.
fn validate_linear_building(
    map: &Map,
    agent: &Agent,
    actions: &ActionTable,
    kind: BuildingKind,
    pos: MapPosition,
) -> bool {
    if !build_site_ok(map, agent, actions, kind, pos) {
        return false;
    }
    if map.tile(pos).and_then(|t| t.owner()) == Some(agent.id()) {
        return true;
    }
    map.tile_is_next_to_building(pos)
}

fn execute_linear_building(
    map: &mut Map,
    agent: &mut Agent,
    actions: &ActionTable,
    kind: BuildingKind,
    pos: MapPosition,
) -> f64 {
    let settings = actions.building(kind);
    let building = Building::new(
        kind,
        None,
        pos,
        settings.money_gain_per_turn,
        settings.maintenance_cost_per_turn,
    );
    map.add_building(building, pos);
    map.update_linear_shape(pos);
    agent.uncover_around(map, pos);
    charge(agent, settings)
}

pub struct BuildRoadAction {
    pub position: MapPosition,
}

impl BuildRoadAction {
    pub fn new(position: MapPosition) -> Self {
        Self { position }
    }
}

impl Action for BuildRoadAction {
    fn validate(&self, map: &Map, agent: &Agent, actions: &ActionTable) -> bool {
        validate_linear_building(map, agent, actions, BuildingKind::Road, self.position)
    }

    fn execute(&self, map: &mut Map, agent: &mut Agent, actions: &ActionTable) -> f64 {
        execute_linear_building(map, agent, actions, BuildingKind::Road, self.position)
    }
}

pub struct BuildBridgeAction {
    pub position: MapPosition,
}

impl BuildBridgeAction {
    pub fn new(position: MapPosition) -> Self {
        Self { position }
    }
}

impl Action for BuildBridgeAction {
    fn validate(&self, map: &Map, agent: &Agent, actions: &ActionTable) -> bool {
        validate_linear_building(map, agent, actions, BuildingKind::Bridge, self.position)
    }

    fn execute(&self, map: &mut Map, agent: &mut Agent, actions: &ActionTable) -> f64 {
        execute_linear_building(map, agent, actions, BuildingKind::Bridge, self.position)
    }
}

/// Builds the action object for a given build kind.
pub fn build_action_for(kind: BuildingKind, position: MapPosition) -> Box<dyn Action> {
    match kind {
        BuildingKind::City => Box::new(BuildCityAction::new(position)),
        BuildingKind::Farm => Box::new(BuildFarmAction::new(position)),
        BuildingKind::Mine => Box::new(BuildMineAction::new(position)),
        BuildingKind::Road => Box::new(BuildRoadAction::new(position)),
        BuildingKind::Bridge => Box::new(BuildBridgeAction::new(position)),
    }
}

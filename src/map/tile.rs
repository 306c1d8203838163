//! Per-cell tile state

use serde::{Deserialize, Serialize};

use crate::buildings::{Building, BuildingKind, DirectionMask};
use crate::map::position::MapPosition;
use crate::map::{valid_agent_id, AgentId};

/// Land classification of a tile. Assigned by map generation, most building
/// kinds are restricted to a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandType {
    Land,
    Ocean,
    Mountain,
    Desert,
    River,
    Marsh,
}

impl LandType {
    /// Value exported in tile observations.
    pub fn value(self) -> i32 {
        match self {
            LandType::Land => 0,
            LandType::Ocean => 1,
            LandType::Mountain => 2,
            LandType::Desert => 3,
            LandType::River => 4,
            LandType::Marsh => 5,
        }
    }
}

/// Static per-tile resource bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Grain,
    Ore,
}

/// Sentinel used in exported tile info when there is no owner or no building.
pub const INFO_NONE: i32 = -1;

/// One grid cell: land, resources, ownership, fog-of-war bits, buildings.
///
/// Tiles are owned exclusively by the `Map` that contains them; the tile only
/// records what is added to it, placement policy lives in the action layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    position: MapPosition,
    land: LandType,
    resources: Vec<ResourceType>,
    owner: Option<AgentId>,
    visibility: u64,
    buildings: Vec<Building>,
    building_bits: u8,
    land_income_multiplier: f64,
}

impl Tile {
    pub fn new(position: MapPosition, land: LandType) -> Self {
        Self {
            position,
            land,
            resources: Vec::new(),
            owner: None,
            visibility: 0,
            buildings: Vec::new(),
            building_bits: 0,
            land_income_multiplier: 1.0,
        }
    }

    pub fn position(&self) -> MapPosition {
        self.position
    }

    pub fn land(&self) -> LandType {
        self.land
    }

    pub fn set_land(&mut self, land: LandType) {
        self.land = land;
    }

    pub fn resources(&self) -> &[ResourceType] {
        &self.resources
    }

    pub fn add_resource(&mut self, resource: ResourceType) {
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
    }

    pub fn has_resource(&self, resource: ResourceType) -> bool {
        self.resources.contains(&resource)
    }

    pub fn owner(&self) -> Option<AgentId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<AgentId>) {
        self.owner = owner;
    }

    pub fn land_income_multiplier(&self) -> f64 {
        self.land_income_multiplier
    }

    pub fn set_land_income_multiplier(&mut self, multiplier: f64) {
        self.land_income_multiplier = multiplier;
    }

    /// Whether agent `agent_id` currently observes this tile.
    /// Ids outside the supported range read as not visible.
    pub fn is_visible_to(&self, agent_id: AgentId) -> bool {
        if !valid_agent_id(agent_id) {
            return false;
        }
        self.visibility & (1 << agent_id) != 0
    }

    /// Marks the tile visible to `agent_id`. Invalid ids are absorbed as a
    /// no-op so speculative queries never corrupt the bitfield.
    pub fn set_visible_to(&mut self, agent_id: AgentId) {
        if valid_agent_id(agent_id) {
            self.visibility |= 1 << agent_id;
        }
    }

    pub fn clear_visible_to(&mut self, agent_id: AgentId) {
        if valid_agent_id(agent_id) {
            self.visibility &= !(1 << agent_id);
        }
    }

    pub fn visibility_bits(&self) -> u64 {
        self.visibility
    }

    /// Inserts a building, keeping the type bitmask in lock-step.
    pub fn add_building(&mut self, building: Building) {
        self.building_bits |= building.kind.bit();
        self.buildings.push(building);
    }

    /// Removes the building of the given kind, if present.
    pub fn remove_building(&mut self, kind: BuildingKind) -> Option<Building> {
        let index = self.buildings.iter().position(|b| b.kind == kind)?;
        let removed = self.buildings.remove(index);
        if !self.buildings.iter().any(|b| b.kind == kind) {
            self.building_bits &= !kind.bit();
        }
        Some(removed)
    }

    pub fn has_building(&self, kind: BuildingKind) -> bool {
        self.building_bits & kind.bit() != 0
    }

    pub fn has_any_building(&self) -> bool {
        self.building_bits != 0
    }

    pub fn has_road(&self) -> bool {
        self.has_building(BuildingKind::Road)
    }

    pub fn has_bridge(&self) -> bool {
        self.has_building(BuildingKind::Bridge)
    }

    pub fn building(&self, kind: BuildingKind) -> Option<&Building> {
        self.buildings.iter().find(|b| b.kind == kind)
    }

    pub fn building_mut(&mut self, kind: BuildingKind) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.kind == kind)
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building_bits(&self) -> u8 {
        self.building_bits
    }

    /// Rewrites the shape descriptor of any linear building on this tile.
    pub fn set_linear_shape(&mut self, shape: DirectionMask) {
        for building in &mut self.buildings {
            if building.kind.is_linear() {
                building.shape = shape;
            }
        }
    }

    /// Restores the tile to its unclaimed, unbuilt state. Land type and
    /// resources are left for map generation to reassign.
    pub fn reset(&mut self) {
        self.owner = None;
        self.visibility = 0;
        self.buildings.clear();
        self.building_bits = 0;
        self.land_income_multiplier = 1.0;
    }

    /// Bulk-export record: `[land_type_value, owner, building_tag]` with
    /// `INFO_NONE` standing in for "no owner" / "no building".
    pub fn info(&self) -> [i32; 3] {
        let owner = self.owner.map_or(INFO_NONE, |id| id as i32);
        let building = self
            .buildings
            .first()
            .map_or(INFO_NONE, |b| b.kind.tag());
        [self.land.value(), owner, building]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> Tile {
        Tile::new(MapPosition::new(5, 10), LandType::Land)
    }

    #[test]
    fn test_initial_state() {
        let tile = tile();
        assert_eq!(tile.position(), MapPosition::new(5, 10));
        assert_eq!(tile.land(), LandType::Land);
        assert!(tile.resources().is_empty());
        assert_eq!(tile.owner(), None);
        assert_eq!(tile.visibility_bits(), 0);
        assert!(!tile.has_any_building());
        assert_eq!(tile.land_income_multiplier(), 1.0);
    }

    #[test]
    fn test_bitmask_tracks_building_set() {
        let mut tile = tile();
        let city = Building::new(BuildingKind::City, Some(0), tile.position(), 110.0, 10.0);
        let road = Building::new(BuildingKind::Road, None, tile.position(), 0.0, 1.0);

        tile.add_building(city);
        assert!(tile.has_building(BuildingKind::City));
        assert!(!tile.has_building(BuildingKind::Road));

        tile.add_building(road);
        assert!(tile.has_road());

        tile.remove_building(BuildingKind::City);
        assert!(!tile.has_building(BuildingKind::City));
        assert!(tile.has_road());

        tile.remove_building(BuildingKind::Road);
        assert_eq!(tile.building_bits(), 0);
        assert!(!tile.has_any_building());

        // removing an absent kind is a no-op
        assert!(tile.remove_building(BuildingKind::City).is_none());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut tile = tile();
        tile.set_owner(Some(2));
        tile.set_visible_to(7);
        tile.set_land_income_multiplier(5.0);
        tile.add_building(Building::new(
            BuildingKind::Farm,
            Some(2),
            tile.position(),
            20.0,
            2.0,
        ));

        tile.reset();

        assert_eq!(tile.owner(), None);
        assert_eq!(tile.visibility_bits(), 0);
        assert!(!tile.has_any_building());
        assert_eq!(tile.land_income_multiplier(), 1.0);
    }

    #[test]
    fn test_info_export() {
        let mut tile = tile();
        tile.set_land(LandType::Mountain);
        tile.set_owner(Some(7));
        tile.add_building(Building::new(
            BuildingKind::City,
            Some(7),
            tile.position(),
            110.0,
            10.0,
        ));

        assert_eq!(tile.info(), [LandType::Mountain.value(), 7, 0]);

        let empty = Tile::new(MapPosition::new(0, 0), LandType::Land);
        assert_eq!(empty.info(), [0, INFO_NONE, INFO_NONE]);
    }
}

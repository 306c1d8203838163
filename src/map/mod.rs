//! Tile grid: bounds checks, adjacency queries, visibility, mutation entry points

pub mod generator;
pub mod position;
pub mod tile;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::buildings::{Building, BuildingKind, DirectionMask};
use position::MapPosition;
use tile::{LandType, Tile};

/// Agent identifier, used as a bit index into tile visibility words.
pub type AgentId = usize;

/// Upper bound on supported agents, fixed by the width of the per-tile
/// visibility word.
pub const MAX_AGENTS: usize = 64;

/// An id is usable wherever population-by-id occurs iff it fits the
/// visibility word. Out-of-range ids are absorbed, never written.
pub fn valid_agent_id(id: AgentId) -> bool {
    id < MAX_AGENTS
}

static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(0);

/// The world grid. Owns every tile; all spatial queries and low-level
/// mutations go through here.
///
/// Failure policy: off-grid coordinates and invalid agent ids are silently
/// absorbed (`None`/`false`/no-op). The action layer is the single point
/// where an illegal request becomes "rejected, zero reward".
pub struct Map {
    id: u64,
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Map {
    /// Creates a grid of plain land tiles. Terrain is assigned afterwards by
    /// the generator.
    pub fn new(width: u32, height: u32) -> Self {
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tiles.push(Tile::new(MapPosition::new(x, y), LandType::Land));
            }
        }
        Self {
            id: NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            tiles,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// True iff `pos` lies on the grid.
    pub fn contains(&self, pos: MapPosition) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: MapPosition) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Off-grid positions yield `None`, not an error; callers treat absence
    /// as "no-op target".
    pub fn tile(&self, pos: MapPosition) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, pos: MapPosition) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The up-to-8 on-grid Chebyshev neighbors of `pos`, in stable row order.
    /// Off-grid neighbors are omitted, never reflected or clamped.
    pub fn surrounding_positions(&self, pos: MapPosition) -> Vec<MapPosition> {
        pos.surrounding()
            .into_iter()
            .filter(|p| self.contains(*p))
            .collect()
    }

    pub fn surrounding_tiles(&self, pos: MapPosition) -> Vec<&Tile> {
        pos.surrounding()
            .into_iter()
            .filter_map(|p| self.tile(p))
            .collect()
    }

    pub fn is_visible(&self, pos: MapPosition, agent_id: AgentId) -> bool {
        self.tile(pos).is_some_and(|t| t.is_visible_to(agent_id))
    }

    pub fn set_visible(&mut self, pos: MapPosition, agent_id: AgentId) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.set_visible_to(agent_id);
        }
    }

    pub fn clear_visible(&mut self, pos: MapPosition, agent_id: AgentId) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.clear_visible_to(agent_id);
        }
    }

    /// Low-level owner assignment. Who *may* claim is decided by the action
    /// layer, not here.
    pub fn claim_tile(&mut self, agent_id: AgentId, pos: MapPosition) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.set_owner(Some(agent_id));
        }
    }

    /// Registers a building on the tile at `pos`. Off-grid is a no-op.
    pub fn add_building(&mut self, building: Building, pos: MapPosition) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.add_building(building);
        }
    }

    /// Removes a building and re-runs shape propagation for linear kinds.
    pub fn remove_building(&mut self, kind: BuildingKind, pos: MapPosition) -> Option<Building> {
        let removed = self.tile_mut(pos)?.remove_building(kind)?;
        if kind.is_linear() {
            self.trigger_surrounding_tile_update(pos);
        }
        Some(removed)
    }

    /// True iff any of the up-to-8 surrounding on-grid tiles holds a building.
    pub fn tile_is_next_to_building(&self, pos: MapPosition) -> bool {
        self.surrounding_tiles(pos)
            .iter()
            .any(|t| t.has_any_building())
    }

    /// Connectivity mask at `pos`: a direction is set iff the cardinal
    /// neighbor holds a building of the same broad linear category
    /// (road connects to road-or-bridge and vice versa).
    pub fn linear_shape_at(&self, pos: MapPosition) -> DirectionMask {
        let mut mask = DirectionMask::EMPTY;
        for (direction, neighbor) in pos.cardinal_neighbors().into_iter().enumerate() {
            if let Some(tile) = self.tile(neighbor) {
                if tile.has_road() || tile.has_bridge() {
                    mask.set(direction);
                }
            }
        }
        mask
    }

    /// Recomputes the shape of the linear building at `pos` (if any) and of
    /// every neighbor that itself holds one. Shape is a purely local
    /// 4-direction descriptor, so propagation never needs to look further.
    pub fn update_linear_shape(&mut self, pos: MapPosition) {
        let has_linear = self
            .tile(pos)
            .is_some_and(|t| t.has_road() || t.has_bridge());
        if has_linear {
            let mask = self.linear_shape_at(pos);
            if let Some(tile) = self.tile_mut(pos) {
                tile.set_linear_shape(mask);
            }
        }
        self.trigger_surrounding_tile_update(pos);
    }

    /// Notifies each on-grid neighbor to recompute adjacency-dependent state.
    /// Called after any mutation that could change a neighbor's shape.
    pub fn trigger_surrounding_tile_update(&mut self, pos: MapPosition) {
        for neighbor in pos.surrounding() {
            let has_linear = self
                .tile(neighbor)
                .is_some_and(|t| t.has_road() || t.has_bridge());
            if has_linear {
                let mask = self.linear_shape_at(neighbor);
                if let Some(tile) = self.tile_mut(neighbor) {
                    tile.set_linear_shape(mask);
                }
            }
        }
    }

    /// Row-major per-tile `[land, owner, building]` export for observation
    /// tensors and renderers.
    pub fn full_info(&self) -> Vec<[i32; 3]> {
        self.tiles.iter().map(Tile::info).collect()
    }

    /// Clears ownership, visibility, and buildings on every tile.
    pub fn reset(&mut self) {
        for tile in &mut self.tiles {
            tile.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_match_indices() {
        let map = Map::new(4, 3);
        assert_eq!(map.tile_count(), 12);
        for y in 0..3 {
            for x in 0..4 {
                let pos = MapPosition::new(x, y);
                assert_eq!(map.tile(pos).unwrap().position(), pos);
            }
        }
    }

    #[test]
    fn test_map_ids_increase() {
        let a = Map::new(2, 2);
        let b = Map::new(2, 2);
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_off_grid_absorbed() {
        let mut map = Map::new(4, 3);
        let off = MapPosition::new(-1, 0);
        assert!(!map.contains(off));
        assert!(map.tile(off).is_none());
        assert!(!map.is_visible(off, 0));
        map.set_visible(off, 0); // must not panic
        map.claim_tile(0, off);
    }

    #[test]
    fn test_linear_shape_at() {
        let mut map = Map::new(5, 5);
        let center = MapPosition::new(2, 2);
        let north = MapPosition::new(2, 1);
        let west = MapPosition::new(1, 2);

        map.add_building(Building::new(BuildingKind::Road, None, north, 0.0, 1.0), north);
        map.add_building(
            Building::new(BuildingKind::Bridge, None, west, 0.0, 1.0),
            west,
        );

        let mask = map.linear_shape_at(center);
        assert!(mask.connects(0)); // north
        assert!(!mask.connects(1)); // east
        assert!(!mask.connects(2)); // south
        assert!(mask.connects(3)); // west
    }
}

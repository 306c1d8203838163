//! Building variants and the linear-structure shape descriptor

use serde::{Deserialize, Serialize};

use crate::map::position::MapPosition;
use crate::map::tile::ResourceType;
use crate::map::AgentId;

/// The closed set of building variants.
///
/// Placement rules, income handling, and shape computation all match on this
/// exhaustively; there is no open-ended building registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    City,
    Farm,
    Mine,
    Road,
    Bridge,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 5] = [
        BuildingKind::City,
        BuildingKind::Farm,
        BuildingKind::Mine,
        BuildingKind::Road,
        BuildingKind::Bridge,
    ];

    /// Bit used in a tile's building-type bitmask.
    pub fn bit(self) -> u8 {
        match self {
            BuildingKind::City => 1 << 0,
            BuildingKind::Farm => 1 << 1,
            BuildingKind::Mine => 1 << 2,
            BuildingKind::Road => 1 << 3,
            BuildingKind::Bridge => 1 << 4,
        }
    }

    /// Roads and bridges autotile against each other.
    pub fn is_linear(self) -> bool {
        matches!(self, BuildingKind::Road | BuildingKind::Bridge)
    }

    /// Value exported in tile observations.
    pub fn tag(self) -> i32 {
        match self {
            BuildingKind::City => 0,
            BuildingKind::Farm => 1,
            BuildingKind::Mine => 2,
            BuildingKind::Road => 3,
            BuildingKind::Bridge => 4,
        }
    }

    /// Resource that doubles this building's income when present on the tile.
    pub fn compatible_resource(self) -> Option<ResourceType> {
        match self {
            BuildingKind::Farm => Some(ResourceType::Grain),
            BuildingKind::Mine => Some(ResourceType::Ore),
            BuildingKind::City | BuildingKind::Road | BuildingKind::Bridge => None,
        }
    }
}

/// Four-direction connectivity bitmask for roads and bridges.
///
/// Bit order is N, E, S, W, matching `CARDINAL_OFFSETS`. A set bit means the
/// cardinal neighbor also holds a linear building, which drives autotiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectionMask(u8);

impl DirectionMask {
    pub const EMPTY: DirectionMask = DirectionMask(0);

    pub fn set(&mut self, direction: usize) {
        debug_assert!(direction < 4);
        self.0 |= 1 << direction;
    }

    pub fn connects(self, direction: usize) -> bool {
        debug_assert!(direction < 4);
        self.0 & (1 << direction) != 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn connection_count(self) -> u32 {
        self.0.count_ones()
    }
}

/// A building placed on a tile.
///
/// Owned by the tile that holds it; records its originating agent (roads and
/// bridges carry no owner) and stays economically active until removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub owner: Option<AgentId>,
    pub position: MapPosition,
    pub income_per_turn: f64,
    pub maintenance_per_turn: f64,
    pub level: u32,
    pub shape: DirectionMask,
}

impl Building {
    pub fn new(
        kind: BuildingKind,
        owner: Option<AgentId>,
        position: MapPosition,
        income_per_turn: f64,
        maintenance_per_turn: f64,
    ) -> Self {
        Self {
            kind,
            owner,
            position,
            income_per_turn,
            maintenance_per_turn,
            level: 1,
            shape: DirectionMask::EMPTY,
        }
    }

    /// Per-tick earnings credited to the owner, maintenance already deducted.
    pub fn net_income_per_turn(&self) -> f64 {
        self.income_per_turn - self.maintenance_per_turn
    }
}

//! Grid coordinates

use serde::{Deserialize, Serialize};

/// Position of a tile in the grid.
///
/// Coordinates are signed so that off-grid probes (e.g. `(-1, 0)`) stay
/// representable; the map itself decides what is in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapPosition {
    pub x: i32,
    pub y: i32,
}

/// Cardinal direction offsets, in shape-mask bit order (N, E, S, W).
pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Chebyshev neighborhood offsets, row by row.
pub const SURROUNDING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl MapPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four cardinal neighbors in N, E, S, W order.
    pub fn cardinal_neighbors(self) -> [MapPosition; 4] {
        let mut out = [self; 4];
        for (slot, (dx, dy)) in out.iter_mut().zip(CARDINAL_OFFSETS) {
            *slot = self.offset(dx, dy);
        }
        out
    }

    /// All eight surrounding positions, including off-grid ones.
    pub fn surrounding(self) -> [MapPosition; 8] {
        let mut out = [self; 8];
        for (slot, (dx, dy)) in out.iter_mut().zip(SURROUNDING_OFFSETS) {
            *slot = self.offset(dx, dy);
        }
        out
    }
}

//! Board geometry: grid coordinates, board bounds and deployment zones.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board width in cells.
pub const BOARD_WIDTH: i32 = 27;

/// Board height in cells.
pub const BOARD_HEIGHT: i32 = 21;

/// Direction offsets for 8-directional movement.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    /// Column, 0 is the left edge.
    pub x: i32,
    /// Row, 0 is the top edge.
    pub y: i32,
}

impl GridPos {
    /// Create a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this cell lies on the standard board.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < BOARD_WIDTH && self.y >= 0 && self.y < BOARD_HEIGHT
    }

    /// Chebyshev distance, the step count under 8-directional movement.
    #[must_use]
    pub fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// Check if two cells touch, diagonals included. A cell is not adjacent
    /// to itself.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.chebyshev(other) == 1
    }

    /// The eight surrounding cells, without bounds filtering.
    pub fn neighbors(self) -> impl Iterator<Item = GridPos> {
        DIRECTIONS
            .iter()
            .map(move |&(dx, dy)| GridPos::new(self.x + dx, self.y + dy))
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board edge an army is deployed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flank {
    /// Columns near x = 0.
    Left,
    /// Columns near x = `BOARD_WIDTH - 1`.
    Right,
}

/// A rectangular band of columns that units are placed into.
///
/// Cells are filled column by column: every row of `x_min` first, then
/// every row of `x_min + 1`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentZone {
    /// First column of the zone (inclusive).
    pub x_min: i32,
    /// Last column of the zone (inclusive).
    pub x_max: i32,
    /// Number of rows, starting at y = 0.
    pub height: i32,
}

impl DeploymentZone {
    /// The three leftmost columns, used for generated armies.
    pub const LEFT: Self = Self {
        x_min: 0,
        x_max: 2,
        height: BOARD_HEIGHT,
    };

    /// The three rightmost columns.
    pub const RIGHT: Self = Self {
        x_min: BOARD_WIDTH - 3,
        x_max: BOARD_WIDTH - 1,
        height: BOARD_HEIGHT,
    };

    /// The zone hugging the given flank.
    #[must_use]
    pub const fn for_flank(flank: Flank) -> Self {
        match flank {
            Flank::Left => Self::LEFT,
            Flank::Right => Self::RIGHT,
        }
    }

    /// Number of columns in the zone.
    #[must_use]
    pub const fn width(&self) -> i32 {
        if self.x_max < self.x_min {
            0
        } else {
            self.x_max - self.x_min + 1
        }
    }

    /// Total number of cells.
    #[must_use]
    pub fn capacity(&self) -> usize {
        (self.width().max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Check if a cell belongs to the zone.
    #[must_use]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= self.x_min && pos.x <= self.x_max && pos.y >= 0 && pos.y < self.height
    }

    /// All cells in fill order (column-major).
    pub fn cells(&self) -> impl Iterator<Item = GridPos> {
        let height = self.height.max(0);
        (self.x_min..=self.x_max).flat_map(move |x| (0..height).map(move |y| GridPos::new(x, y)))
    }
}

impl Default for DeploymentZone {
    fn default() -> Self {
        Self::LEFT
    }
}

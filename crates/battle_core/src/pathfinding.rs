//! Grid-based pathfinding using A* algorithm.
//!
//! Movement is 8-directional with a uniform step cost of 1, diagonals
//! included, so the Chebyshev distance is an exact lower bound and the
//! search returns a shortest path. Equal-priority frontier entries are
//! popped in insertion order, which keeps results reproducible.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::board::{GridPos, BOARD_HEIGHT, BOARD_WIDTH, DIRECTIONS};
use crate::error::{BattleError, Result};
use crate::unit::Unit;

/// Cell types for navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellType {
    /// Free cell.
    #[default]
    Walkable,
    /// Occupied by a unit.
    Blocked,
}

impl CellType {
    /// Returns true if this cell is walkable.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Blocked)
    }
}

/// Navigation grid for pathfinding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGrid {
    /// Grid width in cells.
    width: i32,
    /// Grid height in cells.
    height: i32,
    /// Cell data stored in row-major order.
    cells: Vec<CellType>,
}

impl NavGrid {
    /// Create a new navigation grid with all cells walkable.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0, "NavGrid width must be positive");
        assert!(height > 0, "NavGrid height must be positive");

        let cell_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![CellType::Walkable; cell_count],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, pos: GridPos) -> usize {
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }

    /// Check if coordinates are within grid bounds.
    #[must_use]
    pub const fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Get cell type at coordinates.
    /// Returns `None` if out of bounds.
    #[must_use]
    pub fn get_cell(&self, pos: GridPos) -> Option<CellType> {
        if self.in_bounds(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    /// Set cell type at coordinates.
    /// Returns `false` if out of bounds.
    pub fn set_cell(&mut self, pos: GridPos, cell_type: CellType) -> bool {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.cells[index] = cell_type;
            true
        } else {
            false
        }
    }

    /// Check if a cell is walkable.
    #[must_use]
    pub fn is_walkable(&self, pos: GridPos) -> bool {
        self.get_cell(pos).is_some_and(CellType::is_walkable)
    }

    /// Mark every living, placed unit as an obstacle, except those standing
    /// on one of the `keep_open` cells.
    pub fn block_units<'a, I>(&mut self, units: I, keep_open: &[GridPos])
    where
        I: IntoIterator<Item = &'a Unit>,
    {
        for unit in units {
            if !unit.is_alive() {
                continue;
            }
            let Some(pos) = unit.position else {
                continue;
            };
            if keep_open.contains(&pos) {
                continue;
            }
            self.set_cell(pos, CellType::Blocked);
        }
    }
}

impl Default for NavGrid {
    /// The standard 27x21 battle board.
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

/// A node in the A* open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct AStarNode {
    pos: GridPos,
    /// f_score = g_score + heuristic
    f_score: u32,
    /// Insertion counter, earlier entries win ties.
    sequence: u64,
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so we reverse the comparison for min-heap behavior.
        match other.f_score.cmp(&self.f_score) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Calculate Chebyshev distance heuristic (suitable for 8-directional movement).
#[inline]
fn chebyshev_heuristic(from: GridPos, to: GridPos) -> u32 {
    from.chebyshev(to)
}

/// Find a path from start to goal using A* algorithm.
///
/// The returned cells run from `start` to `goal`, both included; every
/// consecutive pair is 8-adjacent. `start == goal` yields `[start]`.
///
/// # Errors
///
/// Returns `BattleError::InvalidPath` if:
/// - Start or goal position is outside the grid
/// - Start or goal position is blocked
/// - No path exists between start and goal
pub fn find_path(grid: &NavGrid, start: GridPos, goal: GridPos) -> Result<Vec<GridPos>> {
    if !grid.in_bounds(start) {
        return Err(BattleError::InvalidPath(format!("Start {start} outside grid")));
    }
    if !grid.in_bounds(goal) {
        return Err(BattleError::InvalidPath(format!("Goal {goal} outside grid")));
    }
    if !grid.is_walkable(start) {
        return Err(BattleError::InvalidPath(format!("Start {start} is blocked")));
    }
    if !grid.is_walkable(goal) {
        return Err(BattleError::InvalidPath(format!("Goal {goal} is blocked")));
    }

    let cell_count = grid.cells.len();
    let mut g_score = vec![u32::MAX; cell_count];
    let mut came_from: Vec<Option<GridPos>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open_set: BinaryHeap<AStarNode> = BinaryHeap::new();
    let mut sequence = 0u64;

    g_score[grid.index(start)] = 0;
    open_set.push(AStarNode {
        pos: start,
        f_score: chebyshev_heuristic(start, goal),
        sequence,
    });

    while let Some(current) = open_set.pop() {
        let current_index = grid.index(current.pos);
        if closed[current_index] {
            continue;
        }
        closed[current_index] = true;

        // Goal reached
        if current.pos == goal {
            return Ok(reconstruct_path(grid, &came_from, goal));
        }

        let current_g = g_score[current_index];

        for &(dx, dy) in &DIRECTIONS {
            let next = GridPos::new(current.pos.x + dx, current.pos.y + dy);
            if !grid.is_walkable(next) {
                continue;
            }
            let next_index = grid.index(next);
            if closed[next_index] {
                continue;
            }

            let tentative_g = current_g + 1;
            if tentative_g < g_score[next_index] {
                g_score[next_index] = tentative_g;
                came_from[next_index] = Some(current.pos);
                sequence += 1;
                open_set.push(AStarNode {
                    pos: next,
                    f_score: tentative_g + chebyshev_heuristic(next, goal),
                    sequence,
                });
            }
        }
    }

    Err(BattleError::InvalidPath(format!(
        "No path from {start} to {goal}"
    )))
}

/// Reconstruct path from the predecessor table.
fn reconstruct_path(grid: &NavGrid, came_from: &[Option<GridPos>], goal: GridPos) -> Vec<GridPos> {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(prev) = came_from[grid.index(current)] {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

/// Shortest route from `attacker` to `target` on the standard board.
///
/// Every living unit in `existing` is an obstacle, except units standing on
/// the attacker's or the target's own cell. Returns an empty path when
/// either unit is unplaced or off the board, or when the target cannot be
/// reached.
#[must_use]
pub fn find_unit_path<'a, I>(attacker: &Unit, target: &Unit, existing: I) -> Vec<GridPos>
where
    I: IntoIterator<Item = &'a Unit>,
{
    let (Some(start), Some(goal)) = (attacker.position, target.position) else {
        return Vec::new();
    };
    if !start.in_bounds() || !goal.in_bounds() {
        return Vec::new();
    }

    let mut grid = NavGrid::default();
    grid.block_units(existing, &[start, goal]);

    find_path(&grid, start, goal).unwrap_or_default()
}

//! Square grid coordinates for the 8×8 board
//!
//! Rows grow downward, columns grow to the right. Distances are Manhattan.

use serde::{Deserialize, Serialize};

use crate::battle::constants::BOARD_SIZE;

/// Cell coordinate on the board
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct GridCoord {
    pub row: i32,
    pub col: i32,
}

impl GridCoord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        (0..BOARD_SIZE as i32).contains(&self.row) && (0..BOARD_SIZE as i32).contains(&self.col)
    }

    /// Manhattan distance
    pub fn distance(&self, other: &Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Orthogonal neighbours that lie on the board
    pub fn neighbors(&self) -> impl Iterator<Item = GridCoord> {
        let here = *self;
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(move |(dr, dc)| GridCoord::new(here.row + dr, here.col + dc))
            .filter(GridCoord::in_bounds)
    }

    /// Is `other` on the same row or column?
    pub fn is_aligned_with(&self, other: &Self) -> bool {
        self.row == other.row || self.col == other.col
    }

    /// Cells on the axis-aligned segment from self (exclusive) to other
    /// (inclusive). Empty if the two cells are not aligned or identical.
    pub fn segment_to(&self, other: &Self) -> Vec<GridCoord> {
        if self == other || !self.is_aligned_with(other) {
            return Vec::new();
        }

        let dr = (other.row - self.row).signum();
        let dc = (other.col - self.col).signum();
        let steps = self.distance(other) as i32;

        (1..=steps)
            .map(|i| GridCoord::new(self.row + dr * i, self.col + dc * i))
            .collect()
    }

    /// All on-board cells within `radius` (inclusive), including self
    pub fn cells_in_radius(&self, radius: u32) -> Vec<GridCoord> {
        let radius = radius as i32;
        let mut results = Vec::new();
        for dr in -radius..=radius {
            let span = radius - dr.abs();
            for dc in -span..=span {
                let cell = GridCoord::new(self.row + dr, self.col + dc);
                if cell.in_bounds() {
                    results.push(cell);
                }
            }
        }
        results
    }

    /// Every cell on the board in row-major order
    pub fn all_cells() -> impl Iterator<Item = GridCoord> {
        (0..BOARD_SIZE as i32)
            .flat_map(|row| (0..BOARD_SIZE as i32).map(move |col| GridCoord::new(row, col)))
    }
}

//! Battle terrain types, their effects, and symmetric grid generation
//!
//! Both sides must face an equivalent board, so only the upper-left quadrant
//! is rolled and the rest is mirrored from it.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::{BOARD_SIZE, QUADRANT_SIZE};
use crate::battle::grid::GridCoord;
use crate::battle::stats::StatKind;

/// Terrain kind of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Forest,   // Slow, hard to hit
    Desert,   // Slow, saps speed
    Mountain, // Very slow, strong defense
    River,    // Very slow, exposed
    #[default]
    Grassland, // Open ground
    Hills,    // Slow, high ground
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 6] = [
        TerrainKind::Forest,
        TerrainKind::Desert,
        TerrainKind::Mountain,
        TerrainKind::River,
        TerrainKind::Grassland,
        TerrainKind::Hills,
    ];

    /// Movement points spent to enter this terrain (always >= 1)
    pub fn movement_cost(&self) -> u32 {
        match self {
            TerrainKind::Grassland => 1,
            TerrainKind::Forest => 2,
            TerrainKind::Desert => 2,
            TerrainKind::Hills => 2,
            TerrainKind::Mountain => 3,
            TerrainKind::River => 3,
        }
    }

    /// Flat stat modifier for a participant standing on this terrain
    pub fn stat_modifier(&self, stat: StatKind) -> i32 {
        match (self, stat) {
            (TerrainKind::Forest, StatKind::Eva) => 10,
            (TerrainKind::Mountain, StatKind::Def) => 5,
            (TerrainKind::Mountain, StatKind::Res) => 3,
            (TerrainKind::Mountain, StatKind::Spd) => -2,
            (TerrainKind::Hills, StatKind::Atk) => 3,
            (TerrainKind::Hills, StatKind::Crit) => 5,
            (TerrainKind::River, StatKind::Eva) => -10,
            (TerrainKind::River, StatKind::Def) => -3,
            (TerrainKind::Desert, StatKind::Spd) => -3,
            _ => 0,
        }
    }
}

/// The full 8×8 terrain board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    cells: [[TerrainKind; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for TerrainGrid {
    fn default() -> Self {
        Self::uniform(TerrainKind::Grassland)
    }
}

impl TerrainGrid {
    /// A board covered entirely by one terrain kind
    pub fn uniform(kind: TerrainKind) -> Self {
        Self {
            cells: [[kind; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Generate a 4-fold mirror-symmetric board.
    ///
    /// Each quadrant cell copies an already generated orthogonal neighbour
    /// with probability `cluster_chance`, otherwise it picks uniformly.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, cluster_chance: f64) -> Self {
        let mut quadrant = [[TerrainKind::Grassland; QUADRANT_SIZE]; QUADRANT_SIZE];

        for row in 0..QUADRANT_SIZE {
            for col in 0..QUADRANT_SIZE {
                let mut seen = Vec::with_capacity(2);
                if row > 0 {
                    seen.push(quadrant[row - 1][col]);
                }
                if col > 0 {
                    seen.push(quadrant[row][col - 1]);
                }

                let copied = if !seen.is_empty() && rng.gen::<f64>() < cluster_chance {
                    seen.choose(rng).copied()
                } else {
                    None
                };

                quadrant[row][col] = match copied {
                    Some(kind) => kind,
                    None => TerrainKind::ALL[rng.gen_range(0..TerrainKind::ALL.len())],
                };
            }
        }

        let mut cells = [[TerrainKind::Grassland; BOARD_SIZE]; BOARD_SIZE];
        let last = BOARD_SIZE - 1;

        // Mirror right, then down
        for row in 0..QUADRANT_SIZE {
            for col in 0..QUADRANT_SIZE {
                cells[row][col] = quadrant[row][col];
                cells[row][last - col] = quadrant[row][col];
            }
        }
        for row in 0..QUADRANT_SIZE {
            cells[last - row] = cells[row];
        }

        Self { cells }
    }

    /// Terrain at a cell; off-board cells read as grassland
    pub fn get(&self, coord: GridCoord) -> TerrainKind {
        if !coord.in_bounds() {
            return TerrainKind::Grassland;
        }
        self.cells[coord.row as usize][coord.col as usize]
    }

    pub fn set(&mut self, coord: GridCoord, kind: TerrainKind) {
        if coord.in_bounds() {
            self.cells[coord.row as usize][coord.col as usize] = kind;
        }
    }

    pub fn movement_cost(&self, coord: GridCoord) -> u32 {
        self.get(coord).movement_cost()
    }

    /// Does the board read the same under both mirror axes?
    pub fn is_symmetric(&self) -> bool {
        let last = BOARD_SIZE - 1;
        (0..BOARD_SIZE).all(|row| {
            (0..BOARD_SIZE).all(|col| {
                let kind = self.cells[row][col];
                kind == self.cells[row][last - col] && kind == self.cells[last - row][col]
            })
        })
    }

    /// Row-major iteration over every cell and its terrain
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, TerrainKind)> + '_ {
        GridCoord::all_cells().map(move |coord| (coord, self.get(coord)))
    }
}

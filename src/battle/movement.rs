//! Movement planning over variable terrain cost
//!
//! Cost-aware breadth-first expansion: entering a cell spends that cell's
//! terrain cost, and a cell is only expanded while the running total stays
//! within budget. Opponents block; allies can be passed through but never
//! landed on.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use ahash::AHashMap;

use crate::battle::grid::GridCoord;
use crate::battle::state::CombatState;
use crate::core::types::ParticipantId;

/// Node in the open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct MoveNode {
    coord: GridCoord,
    cost: u32,
}

impl Ord for MoveNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; coordinate keeps pops deterministic
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for MoveNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest known cost and predecessor for every explored cell
struct Exploration {
    start: GridCoord,
    best: AHashMap<GridCoord, u32>,
    came_from: AHashMap<GridCoord, GridCoord>,
}

fn explore(state: &CombatState, mover: ParticipantId, budget: u32) -> Option<Exploration> {
    let participant = state.get(mover)?;
    let start = participant.position?;
    let team = participant.team;
    let board = state.occupancy();

    let team_at = |cell: GridCoord| {
        board[cell.row as usize][cell.col as usize]
            .and_then(|id| state.get(id))
            .map(|p| p.team)
    };

    let mut open_set = BinaryHeap::new();
    let mut best: AHashMap<GridCoord, u32> = AHashMap::new();
    let mut came_from: AHashMap<GridCoord, GridCoord> = AHashMap::new();

    best.insert(start, 0);
    open_set.push(MoveNode { coord: start, cost: 0 });

    while let Some(current) = open_set.pop() {
        if best.get(&current.coord).is_some_and(|&known| current.cost > known) {
            continue;
        }

        for neighbor in current.coord.neighbors() {
            // Opponents block traversal entirely
            if team_at(neighbor).is_some_and(|other| other != team) {
                continue;
            }

            let tentative = current.cost + state.terrain.movement_cost(neighbor);
            if tentative > budget {
                continue;
            }

            let known = best.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative < known {
                best.insert(neighbor, tentative);
                came_from.insert(neighbor, current.coord);
                open_set.push(MoveNode {
                    coord: neighbor,
                    cost: tentative,
                });
            }
        }
    }

    Some(Exploration {
        start,
        best,
        came_from,
    })
}

/// Cells the participant may end its move on.
///
/// Never contains the start cell or any occupied cell. Empty if the
/// participant is off the board.
pub fn reachable(state: &CombatState, mover: ParticipantId, budget: u32) -> BTreeSet<GridCoord> {
    let Some(exploration) = explore(state, mover, budget) else {
        return BTreeSet::new();
    };

    exploration
        .best
        .keys()
        .copied()
        .filter(|&cell| cell != exploration.start && state.occupant_at(cell).is_none())
        .collect()
}

/// Cheapest path from the participant's cell to `goal`, both ends included.
///
/// `None` if `goal` is not a legal destination.
pub fn path_to(
    state: &CombatState,
    mover: ParticipantId,
    goal: GridCoord,
    budget: u32,
) -> Option<Vec<GridCoord>> {
    let exploration = explore(state, mover, budget)?;
    if goal == exploration.start || !exploration.best.contains_key(&goal) {
        return None;
    }
    if state.occupant_at(goal).is_some() {
        return None;
    }

    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = exploration.came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    Some(path)
}

/// Total terrain cost of walking a path (the start cell is free)
pub fn path_cost(state: &CombatState, path: &[GridCoord]) -> u32 {
    path.iter()
        .skip(1)
        .map(|cell| state.terrain.movement_cost(*cell))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::data::GameData;
    use crate::battle::participant::Participant;
    use crate::battle::stats::Stats;
    use crate::battle::terrain::{TerrainGrid, TerrainKind};
    use crate::battle::turn_order::TurnOrder;
    use crate::core::types::Team;

    fn unit(id: u32, team: Team, cell: GridCoord) -> Participant {
        let mut p = Participant::new(ParticipantId(id), format!("U{id}"), team, "warrior").with_stats(Stats {
            hp: 10,
            max_hp: 10,
            ..Stats::default()
        });
        p.place(cell, TerrainKind::Grassland);
        p
    }

    fn state_with(participants: Vec<Participant>, terrain: TerrainGrid) -> CombatState {
        let order = TurnOrder::new(&participants, &GameData::default());
        CombatState::new(participants, terrain, order)
    }

    #[test]
    fn test_open_board_budget_three_from_center() {
        let state = state_with(
            vec![unit(0, Team::SideA, GridCoord::new(4, 4))],
            TerrainGrid::default(),
        );
        let cells = reachable(&state, ParticipantId(0), 3);
        assert_eq!(cells.len(), 24);
        assert!(!cells.contains(&GridCoord::new(4, 4)));
        assert!(cells.iter().all(|c| c.distance(&GridCoord::new(4, 4)) <= 3));
    }

    #[test]
    fn test_corner_is_clipped() {
        let state = state_with(
            vec![unit(0, Team::SideA, GridCoord::new(0, 0))],
            TerrainGrid::default(),
        );
        // Cells with row + col in 1..=3
        assert_eq!(reachable(&state, ParticipantId(0), 3).len(), 9);
    }

    #[test]
    fn test_terrain_cost_limits_reach() {
        let state = state_with(
            vec![unit(0, Team::SideA, GridCoord::new(4, 4))],
            TerrainGrid::uniform(TerrainKind::Mountain),
        );
        let cells = reachable(&state, ParticipantId(0), 3);
        // One mountain step costs the full budget
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_enemy_blocks_and_is_excluded() {
        let start = GridCoord::new(4, 0);
        let mut terrain = TerrainGrid::default();
        // Wall of rivers leaves a single corridor along row 4
        for row in 0..8 {
            if row != 4 {
                terrain.set(GridCoord::new(row, 1), TerrainKind::River);
            }
        }
        let state = state_with(
            vec![
                unit(0, Team::SideA, start),
                unit(1, Team::SideB, GridCoord::new(4, 1)),
            ],
            terrain,
        );
        let cells = reachable(&state, ParticipantId(0), 3);
        assert!(!cells.contains(&GridCoord::new(4, 1)));
        assert!(!cells.contains(&GridCoord::new(4, 2)));
    }

    #[test]
    fn test_ally_passable_but_not_a_destination() {
        let start = GridCoord::new(4, 0);
        let mut terrain = TerrainGrid::default();
        for row in 0..8 {
            if row != 4 {
                terrain.set(GridCoord::new(row, 1), TerrainKind::River);
            }
        }
        let state = state_with(
            vec![
                unit(0, Team::SideA, start),
                unit(1, Team::SideA, GridCoord::new(4, 1)),
            ],
            terrain,
        );
        let cells = reachable(&state, ParticipantId(0), 3);
        assert!(!cells.contains(&GridCoord::new(4, 1)));
        // Walked through the ally to get here
        assert!(cells.contains(&GridCoord::new(4, 2)));
        assert!(cells.contains(&GridCoord::new(4, 3)));
    }

    #[test]
    fn test_off_board_participant_has_no_moves() {
        let mut p = unit(0, Team::SideA, GridCoord::new(4, 4));
        p.remove_from_board();
        let state = state_with(vec![p], TerrainGrid::default());
        assert!(reachable(&state, ParticipantId(0), 3).is_empty());
    }

    #[test]
    fn test_cheaper_detour_found() {
        // Going right first crosses a mountain; going up first stays on grass
        let mut terrain = TerrainGrid::default();
        terrain.set(GridCoord::new(4, 5), TerrainKind::Mountain);
        let state = state_with(vec![unit(0, Team::SideA, GridCoord::new(4, 4))], terrain);
        let path = path_to(&state, ParticipantId(0), GridCoord::new(3, 6), 3).unwrap();
        assert_eq!(path.first(), Some(&GridCoord::new(4, 4)));
        assert_eq!(path.last(), Some(&GridCoord::new(3, 6)));
        assert_eq!(path_cost(&state, &path), 3);
        assert!(!path.contains(&GridCoord::new(4, 5)));
    }

    #[test]
    fn test_path_to_unreachable_is_none() {
        let state = state_with(
            vec![unit(0, Team::SideA, GridCoord::new(4, 4))],
            TerrainGrid::default(),
        );
        assert!(path_to(&state, ParticipantId(0), GridCoord::new(0, 0), 3).is_none());
        assert!(path_to(&state, ParticipantId(0), GridCoord::new(4, 4), 3).is_none());
    }
}

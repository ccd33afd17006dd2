//! Combat state: the participant arena plus everything derived from it
//!
//! Participants live in a single `Vec` indexed by `ParticipantId`. The board
//! and the turn order are views over those ids, never separate copies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::constants::BOARD_SIZE;
use crate::battle::grid::GridCoord;
use crate::battle::participant::Participant;
use crate::battle::terrain::TerrainGrid;
use crate::battle::turn_order::TurnOrder;
use crate::core::types::{ParticipantId, Team, Turn};

/// Where the current participant is in its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingMove,
    AwaitingAction,
    TurnComplete,
    Resolved { victory: bool },
}

/// Id-indexed occupancy view of the board
pub type Occupancy = [[Option<ParticipantId>; BOARD_SIZE]; BOARD_SIZE];

/// Handed to the rewards collaborator once a combat is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub victory: bool,
    pub turns_elapsed: Turn,
    pub surviving_ally_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatState {
    pub participants: Vec<Participant>,
    pub terrain: TerrainGrid,
    pub turn_order: TurnOrder,
    pub phase: TurnPhase,
    pub game_over: bool,
    /// Side A's perspective
    pub victory: bool,
    /// Side A's consumables: item id -> count
    pub consumables: BTreeMap<String, u32>,
}

impl CombatState {
    pub fn new(participants: Vec<Participant>, terrain: TerrainGrid, turn_order: TurnOrder) -> Self {
        Self {
            participants,
            terrain,
            turn_order,
            phase: TurnPhase::AwaitingMove,
            game_over: false,
            victory: false,
            consumables: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id.index())
    }

    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(id.index())
    }

    pub fn turn(&self) -> Turn {
        self.turn_order.turn()
    }

    /// Participant whose turn it is, if the combat is still running
    pub fn current_actor(&self) -> Option<ParticipantId> {
        if self.game_over {
            return None;
        }
        self.turn_order.current()
    }

    /// Living participant standing on a cell
    pub fn occupant_at(&self, cell: GridCoord) -> Option<ParticipantId> {
        self.participants
            .iter()
            .find(|p| p.is_alive() && p.position == Some(cell))
            .map(|p| p.id)
    }

    pub fn is_free(&self, cell: GridCoord) -> bool {
        cell.in_bounds() && self.occupant_at(cell).is_none()
    }

    pub fn occupancy(&self) -> Occupancy {
        let mut board: Occupancy = [[None; BOARD_SIZE]; BOARD_SIZE];
        for participant in self.participants.iter().filter(|p| p.is_alive()) {
            if let Some(cell) = participant.position {
                if cell.in_bounds() {
                    board[cell.row as usize][cell.col as usize] = Some(participant.id);
                }
            }
        }
        board
    }

    pub fn living(&self, team: Team) -> impl Iterator<Item = &Participant> {
        self.participants
            .iter()
            .filter(move |p| p.team == team && p.is_alive())
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.living(team).count()
    }

    /// Evaluate terminal state after any HP change.
    ///
    /// Side B wiped is a victory for side A; side A wiped is a defeat and
    /// wins ties. Returns the victory flag once resolved.
    pub fn check_battle_end(&mut self) -> Option<bool> {
        if self.game_over {
            return Some(self.victory);
        }

        let side_a = self.living_count(Team::SideA);
        let side_b = self.living_count(Team::SideB);

        let victory = if side_a == 0 {
            false
        } else if side_b == 0 {
            true
        } else {
            return None;
        };

        self.resolve(victory);
        Some(victory)
    }

    /// Force a terminal state
    pub fn resolve(&mut self, victory: bool) {
        self.game_over = true;
        self.victory = victory;
        self.phase = TurnPhase::Resolved { victory };
    }

    pub fn result(&self) -> Option<CombatResult> {
        if !self.game_over {
            return None;
        }
        Some(CombatResult {
            victory: self.victory,
            turns_elapsed: self.turn(),
            surviving_ally_count: self.living_count(Team::SideA),
        })
    }
}

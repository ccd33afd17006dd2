//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Arena index of a participant inside a single combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Turn counter (one full round of the turn order)
pub type Turn = u32;

/// The two sides of a battle. Side A is the player's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    SideA,
    SideB,
}

impl Team {
    pub fn opponent(&self) -> Self {
        match self {
            Team::SideA => Team::SideB,
            Team::SideB => Team::SideA,
        }
    }
}

/// Who decides a participant's moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Controller {
    #[default]
    Player,
    Ai,
}

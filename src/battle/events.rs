//! Combat event log
//!
//! Every state change the engine makes is recorded here; presentation drains
//! the log instead of diffing state.

use serde::{Deserialize, Serialize};

use crate::battle::grid::GridCoord;
use crate::core::types::{ParticipantId, Turn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEventKind {
    BattleStarted { allies: usize, enemies: usize },
    TurnStarted { actor: ParticipantId },
    Moved { actor: ParticipantId, from: GridCoord, to: GridCoord, cost: u32 },
    Hit { source: ParticipantId, target: ParticipantId, damage: i32, critical: bool },
    Missed { source: ParticipantId, target: ParticipantId },
    SkillUsed { caster: ParticipantId, skill: String },
    ItemUsed { user: ParticipantId, item: String },
    Healed { target: ParticipantId, amount: i32 },
    ManaRestored { target: ParticipantId, amount: i32 },
    StatusApplied { target: ParticipantId, status: String, duration: u32 },
    StatusExpired { target: ParticipantId, status: String },
    /// Turn-start damage and regeneration
    StatusTick { target: ParticipantId, damage: i32, healed: i32 },
    Cleansed { target: ParticipantId, removed: usize },
    /// Turn lost to a control effect
    Incapacitated { actor: ParticipantId },
    Waited { actor: ParticipantId },
    Defeated { target: ParticipantId },
    Revived { target: ParticipantId, cell: GridCoord, hp: i32 },
    BattleEnded { victory: bool },
}

/// Log entry for combat events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub turn: Turn,
    pub kind: CombatEventKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatEventLog {
    pub events: Vec<CombatEvent>,
}

impl CombatEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn, kind: CombatEventKind) {
        self.events.push(CombatEvent { turn, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hand over everything logged so far
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

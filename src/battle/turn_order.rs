//! Deterministic turn order
//!
//! Order is a pure function of (speed, level, name): faster first, then
//! higher level, then alphabetical, with the arena id as a last resort so no
//! two participants ever compare equal.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::battle::data::GameData;
use crate::battle::participant::Participant;
use crate::battle::status::effective_stats;
use crate::core::types::{ParticipantId, Turn};

/// Total ordering used for the turn sequence
fn turn_priority(a: &Participant, a_spd: i32, b: &Participant, b_spd: i32) -> Ordering {
    b_spd
        .cmp(&a_spd)
        .then_with(|| b.level.cmp(&a.level))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort every participant by effective speed, level and name
pub fn compute_order(participants: &[Participant], data: &GameData) -> Vec<ParticipantId> {
    let mut keyed: Vec<(&Participant, i32)> = participants
        .iter()
        .map(|p| (p, effective_stats(p, data).spd))
        .collect();
    keyed.sort_by(|(a, a_spd), (b, b_spd)| turn_priority(a, *a_spd, b, *b_spd));
    keyed.into_iter().map(|(p, _)| p.id).collect()
}

/// The round-robin schedule of a combat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    sequence: Vec<ParticipantId>,
    index: usize,
    turn: Turn,
}

impl TurnOrder {
    /// Order for turn 1, pointing at the fastest participant
    pub fn new(participants: &[Participant], data: &GameData) -> Self {
        Self {
            sequence: compute_order(participants, data),
            index: 0,
            turn: 1,
        }
    }

    pub fn sequence(&self) -> &[ParticipantId] {
        &self.sequence
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn current(&self) -> Option<ParticipantId> {
        self.sequence.get(self.index).copied()
    }

    /// Move to the next participant that is alive and has not acted.
    ///
    /// Wrapping past the end starts a new turn: the counter increments, every
    /// participant's flags reset, and the order is recomputed. Returns `None`
    /// if no one is eligible within `2 × roster` attempts.
    pub fn advance(
        &mut self,
        participants: &mut [Participant],
        data: &GameData,
    ) -> Option<ParticipantId> {
        if self.sequence.is_empty() {
            return None;
        }

        let max_attempts = 2 * participants.len().max(1);
        for _ in 0..max_attempts {
            self.index += 1;
            if self.index >= self.sequence.len() {
                self.start_new_turn(participants, data);
            }

            let id = self.sequence[self.index];
            if let Some(participant) = participants.get(id.index()) {
                if participant.is_alive() && !participant.has_acted {
                    return Some(id);
                }
            }
        }

        None
    }

    fn start_new_turn(&mut self, participants: &mut [Participant], data: &GameData) {
        self.turn += 1;
        self.index = 0;
        for participant in participants.iter_mut() {
            participant.reset_turn_flags();
        }
        self.sequence = compute_order(participants, data);
    }
}

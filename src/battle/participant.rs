//! Combat participants
//!
//! A participant is created once per combat and lives in the combat's arena
//! for the whole battle, defeated or not. Only its `position` says whether it
//! is on the board.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::data::{Archetype, DamageType};
use crate::battle::grid::GridCoord;
use crate::battle::stats::{StatKind, Stats};
use crate::battle::terrain::TerrainKind;
use crate::core::types::{Controller, ParticipantId, Team};

/// One active status record. Stacking adds records, it never merges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub kind: String,
    pub remaining: u32,
    /// Scales the definition's modifiers and HP percentages (default 1.0)
    pub magnitude: Option<f64>,
}

impl ActiveStatus {
    pub fn new(kind: impl Into<String>, remaining: u32) -> Self {
        Self {
            kind: kind.into(),
            remaining,
            magnitude: None,
        }
    }

    pub fn scale(&self) -> f64 {
        self.magnitude.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Roster id for side A members; generated enemies have none
    pub source_id: Option<String>,
    pub name: String,
    pub team: Team,
    pub controller: Controller,
    pub class_id: String,
    pub level: u32,
    pub is_boss: bool,
    pub archetype: Archetype,
    pub attack_type: DamageType,

    /// Stats including the terrain modifier of the occupied cell
    pub current_stats: Stats,
    /// Stats before terrain; reference point for status percentages
    pub base_stats: Stats,

    pub position: Option<GridCoord>,
    pub has_moved: bool,
    pub has_acted: bool,

    pub status_effects: Vec<ActiveStatus>,
    /// Skill id -> invested points
    pub learned_skills: BTreeMap<String, u32>,
    pub equipped_skills: Vec<String>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, team: Team, class_id: impl Into<String>) -> Self {
        Self {
            id,
            source_id: None,
            name: name.into(),
            team,
            controller: match team {
                Team::SideA => Controller::Player,
                Team::SideB => Controller::Ai,
            },
            class_id: class_id.into(),
            level: 1,
            is_boss: false,
            archetype: Archetype::default(),
            attack_type: DamageType::default(),
            current_stats: Stats::default(),
            base_stats: Stats::default(),
            position: None,
            has_moved: false,
            has_acted: false,
            status_effects: Vec::new(),
            learned_skills: BTreeMap::new(),
            equipped_skills: Vec::new(),
        }
    }

    /// Install a full stat line as both base and current stats
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.base_stats = stats;
        self.current_stats = stats;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.current_stats.hp > 0
    }

    pub fn is_on_board(&self) -> bool {
        self.position.is_some()
    }

    pub fn is_ai(&self) -> bool {
        self.controller == Controller::Ai
    }

    /// Points invested in a skill; an equipped but unlearned skill counts as 1
    pub fn skill_points(&self, skill_id: &str) -> u32 {
        self.learned_skills.get(skill_id).copied().unwrap_or(1).max(1)
    }

    pub fn has_equipped(&self, skill_id: &str) -> bool {
        self.equipped_skills.iter().any(|s| s == skill_id)
    }

    /// Put the participant on a cell and re-derive its terrain modifiers
    pub fn place(&mut self, cell: GridCoord, terrain: TerrainKind) {
        self.position = Some(cell);
        self.apply_terrain(terrain);
    }

    /// Take the participant off the board; terrain modifiers are dropped
    pub fn remove_from_board(&mut self) {
        self.position = None;
        for stat in StatKind::COMBAT {
            self.current_stats.set(stat, self.base_stats.get(stat));
        }
    }

    /// current = base + terrain modifier, for every non-pool stat
    pub fn apply_terrain(&mut self, terrain: TerrainKind) {
        for stat in StatKind::COMBAT {
            let value = self.base_stats.get(stat) + terrain.stat_modifier(stat);
            self.current_stats.set(stat, value);
        }
    }

    /// Flat difference terrain currently adds to a stat
    pub fn terrain_delta(&self, stat: StatKind) -> i32 {
        self.current_stats.get(stat) - self.base_stats.get(stat)
    }

    /// Subtract HP, clamped at zero. Returns true if this defeated the participant.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || !self.is_alive() {
            return false;
        }
        self.current_stats.hp = (self.current_stats.hp - amount).max(0);
        !self.is_alive()
    }

    /// Add HP up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.current_stats.hp;
        self.current_stats.hp = (before + amount).min(self.current_stats.max_hp);
        self.current_stats.hp - before
    }

    /// Add mana up to max. Returns the amount actually restored.
    pub fn restore_mana(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.current_stats.mana;
        self.current_stats.mana = (before + amount).min(self.current_stats.max_mana);
        self.current_stats.mana - before
    }

    pub fn reset_turn_flags(&mut self) {
        self.has_moved = false;
        self.has_acted = false;
    }
}

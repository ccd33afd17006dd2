//! Roster building: stored team + stage number -> combat participants
//!
//! Side A comes from roster entries owned by the caller. Side B is generated
//! from the stage number through the caller's `EncounterConfig`. Both sides
//! get arena ids from the same counter so ids stay dense.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::battle::constants::{
    DEPLOYMENT_CAPACITY, DEPLOYMENT_COLUMNS, MAX_EQUIPPED_SKILLS, SIDE_A_ROWS, SIDE_B_ROWS,
};
use crate::battle::data::{ClassDef, EquipSlot, GameData};
use crate::battle::grid::GridCoord;
use crate::battle::participant::Participant;
use crate::battle::stats::{StatKind, Stats};
use crate::battle::terrain::TerrainGrid;
use crate::core::config::EncounterConfig;
use crate::core::error::{Result, TacticsError};
use crate::core::types::{ParticipantId, Team};

/// One stored team member as handed over by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub level: u32,
    pub equipment: BTreeMap<EquipSlot, String>,
    /// Skill id -> invested points
    pub skill_points: BTreeMap<String, u32>,
    pub equipped_skills: Vec<String>,
}

impl RosterEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, class_id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_id: class_id.into(),
            level,
            ..Self::default()
        }
    }

    pub fn with_equipment(mut self, slot: EquipSlot, item: impl Into<String>) -> Self {
        self.equipment.insert(slot, item.into());
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>, points: u32) -> Self {
        let skill = skill.into();
        self.skill_points.insert(skill.clone(), points);
        self.equipped_skills.push(skill);
        self
    }
}

/// `floor(base + growth * (level - 1))` for every stat
pub fn class_stats(class: &ClassDef, level: u32) -> Stats {
    let steps = f64::from(level.max(1) - 1);
    let mut stats = Stats::default();
    for stat in StatKind::ALL {
        let value = (class.base.get(stat) + class.growth.get(stat) * steps).floor() as i32;
        stats.set(stat, value);
    }
    stats
}

/// Hand out the next arena id
fn take_id(next_id: &mut u32) -> ParticipantId {
    let id = ParticipantId(*next_id);
    *next_id += 1;
    id
}

fn participant_for_class(
    id: ParticipantId,
    name: String,
    team: Team,
    class: &ClassDef,
    level: u32,
    stats: Stats,
) -> Participant {
    let mut participant = Participant::new(id, name, team, class.id.clone()).with_stats(stats);
    participant.level = level.max(1);
    participant.archetype = class.archetype;
    participant.attack_type = class.attack_type;
    participant
}

/// Side A participants from stored roster entries.
///
/// Fails with `InvalidClassData` on an unknown class. Unknown equipment or
/// skills are dropped with a warning.
pub fn build_allies(roster: &[RosterEntry], data: &GameData, next_id: &mut u32) -> Result<Vec<Participant>> {
    let mut allies = Vec::with_capacity(roster.len());

    for entry in roster {
        let class = data.class(&entry.class_id)?;
        let mut stats = class_stats(class, entry.level);

        for (slot, item_id) in &entry.equipment {
            let Some(item) = data.equipment(item_id) else {
                warn!(member = %entry.name, ?slot, item = %item_id, "Unknown equipment skipped");
                continue;
            };
            for stat in StatKind::ALL {
                let bonus = item.bonuses.get(stat).floor() as i32;
                if bonus != 0 {
                    stats.add(stat, bonus);
                }
            }
        }

        let mut participant = participant_for_class(
            take_id(next_id),
            entry.name.clone(),
            Team::SideA,
            class,
            entry.level,
            stats,
        );
        participant.source_id = Some(entry.id.clone());

        for (skill_id, points) in &entry.skill_points {
            if data.skill(skill_id).is_some() {
                participant.learned_skills.insert(skill_id.clone(), (*points).max(1));
            } else {
                warn!(member = %entry.name, skill = %skill_id, "Unknown learned skill skipped");
            }
        }

        for skill_id in &entry.equipped_skills {
            if data.skill(skill_id).is_none() {
                warn!(member = %entry.name, skill = %skill_id, "Unknown equipped skill skipped");
                continue;
            }
            if participant.has_equipped(skill_id) {
                continue;
            }
            if participant.equipped_skills.len() >= MAX_EQUIPPED_SKILLS {
                warn!(member = %entry.name, skill = %skill_id, "Equipped skill over the limit dropped");
                continue;
            }
            participant.equipped_skills.push(skill_id.clone());
        }

        debug!(member = %participant.name, class = %participant.class_id, level = participant.level, "Ally built");
        allies.push(participant);
    }

    Ok(allies)
}

/// Boss stat amplification: major stats are hp, atk and mag
fn amplify_boss(stats: Stats, encounter: &EncounterConfig) -> Stats {
    let mut amplified = stats;
    for stat in StatKind::ALL {
        let multiplier = match stat {
            StatKind::Hp | StatKind::Atk | StatKind::Mag => encounter.boss_major_multiplier,
            _ => encounter.boss_minor_multiplier,
        };
        let value = (f64::from(stats.get(stat)) * multiplier).floor() as i32;
        amplified.set(stat, value);
    }
    amplified
}

/// Side B participants for a stage.
///
/// Boss stages spawn a single amplified boss at double the normal level;
/// other stages draw `enemy_count(stage)` classes from the pool.
pub fn build_enemies<R: Rng + ?Sized>(
    stage: u32,
    data: &GameData,
    encounter: &EncounterConfig,
    rng: &mut R,
    next_id: &mut u32,
) -> Result<Vec<Participant>> {
    let level = encounter.enemy_level(stage);

    if encounter.is_boss_stage(stage) {
        let class = data.class(&encounter.boss_class)?;
        let boss_level = level.saturating_mul(2);
        let stats = amplify_boss(class_stats(class, boss_level), encounter);
        let mut boss = participant_for_class(
            take_id(next_id),
            class.name.clone(),
            Team::SideB,
            class,
            boss_level,
            stats,
        );
        boss.is_boss = true;
        debug!(stage, boss = %boss.name, level = boss_level, "Boss generated");
        return Ok(vec![boss]);
    }

    let count = encounter.enemy_count(stage);
    let mut enemies = Vec::with_capacity(count);
    let mut seen: BTreeMap<String, u32> = BTreeMap::new();

    for _ in 0..count {
        let class_id = encounter
            .enemy_classes
            .choose(rng)
            .ok_or_else(|| TacticsError::InvalidConfig("enemy_classes must not be empty".into()))?;
        let class = data.class(class_id)?;

        let ordinal = seen.entry(class.id.clone()).or_insert(0);
        *ordinal += 1;
        let name = format!("{} {}", class.name, ordinal);

        enemies.push(participant_for_class(
            take_id(next_id),
            name,
            Team::SideB,
            class,
            level,
            class_stats(class, level),
        ));
    }

    debug!(stage, count, level, "Enemies generated");
    Ok(enemies)
}

/// Home cells of a side in fill order
pub fn deployment_cells(team: Team) -> Vec<GridCoord> {
    let rows = match team {
        Team::SideA => SIDE_A_ROWS,
        Team::SideB => SIDE_B_ROWS,
    };
    rows.iter()
        .flat_map(|&row| DEPLOYMENT_COLUMNS.iter().map(move |&col| GridCoord::new(row, col)))
        .collect()
}

/// Place every participant of `team` on its home cells and apply terrain
pub fn deploy(participants: &mut [Participant], team: Team, terrain: &TerrainGrid) -> Result<()> {
    let count = participants.iter().filter(|p| p.team == team).count();
    if count > DEPLOYMENT_CAPACITY {
        return Err(TacticsError::RosterTooLarge {
            team,
            count,
            capacity: DEPLOYMENT_CAPACITY,
        });
    }

    let cells = deployment_cells(team);
    for (participant, cell) in participants.iter_mut().filter(|p| p.team == team).zip(cells) {
        participant.place(cell, terrain.get(cell));
    }
    Ok(())
}

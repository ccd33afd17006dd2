//! Status effects: stat modifiers, damage/regen over time, duration decay
//!
//! Percentage modifiers stack ADDITIVELY and are applied once to the base
//! stat, never to an already-modified value.

use tracing::warn;

use crate::battle::data::{ControlKind, GameData};
use crate::battle::participant::{ActiveStatus, Participant};
use crate::battle::stats::{StatKind, Stats};

/// What a participant may do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionGate {
    #[default]
    Free,
    /// Skills blocked; movement and basic attacks allowed
    Silenced,
    /// No actions at all
    Incapacitated,
}

impl ActionGate {
    pub fn can_act(&self) -> bool {
        !matches!(self, ActionGate::Incapacitated)
    }

    pub fn can_use_skills(&self) -> bool {
        matches!(self, ActionGate::Free)
    }
}

/// Summary of turn-start processing for one participant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTick {
    pub damage: i32,
    pub healed: i32,
    pub expired: Vec<String>,
    /// Control in force for the turn, taken before durations decay
    pub gate: ActionGate,
}

/// Sum of fractional modifiers on one stat across all active effects
pub fn modifier_sum(participant: &Participant, data: &GameData, stat: StatKind) -> f64 {
    participant
        .status_effects
        .iter()
        .filter_map(|active| {
            data.status(&active.kind)
                .map(|def| def.stat_modifiers.get(&stat).copied().unwrap_or(0.0) * active.scale())
        })
        .sum()
}

/// Base stats after status percentages, plus the current terrain delta.
///
/// `effective = floor(base * (1 + sum)) + terrain`. Pools are copied from
/// current stats untouched.
pub fn effective_stats(participant: &Participant, data: &GameData) -> Stats {
    let mut stats = participant.current_stats;

    for stat in StatKind::COMBAT {
        let base = f64::from(participant.base_stats.get(stat));
        let sum = modifier_sum(participant, data, stat);
        let modified = (base * (1.0 + sum)).floor().max(0.0) as i32;
        let value = (modified + participant.terrain_delta(stat)).max(0);
        stats.set(stat, value);
    }

    stats
}

/// Add a status record. Repeated applications stack as separate records.
pub fn apply_status(participant: &mut Participant, kind: &str, duration: u32, magnitude: Option<f64>) {
    if duration == 0 {
        return;
    }
    participant.status_effects.push(ActiveStatus {
        kind: kind.to_string(),
        remaining: duration,
        magnitude,
    });
}

/// Turn-start processing: DoT and regen against max HP, clamp, decay.
///
/// A status with one turn remaining still gates the turn it expires on.
pub fn process_turn_start(participant: &mut Participant, data: &GameData) -> StatusTick {
    let mut tick = StatusTick {
        gate: action_gate(participant, data),
        ..StatusTick::default()
    };
    let max_hp = participant.current_stats.max_hp;

    for active in &participant.status_effects {
        let Some(def) = data.status(&active.kind) else {
            warn!(status = %active.kind, participant = %participant.name, "Unknown status effect ignored");
            continue;
        };

        let hp = participant.current_stats.hp;

        if def.dot_percent > 0.0 {
            let amount = ((f64::from(max_hp) * def.dot_percent * active.scale()).floor() as i32).max(1);
            let lost = amount.min(hp);
            participant.current_stats.hp = hp - lost;
            tick.damage += lost;
        }

        if def.regen_percent > 0.0 {
            let hp = participant.current_stats.hp;
            let amount = (f64::from(max_hp) * def.regen_percent * active.scale()).floor() as i32;
            let gained = amount.clamp(0, (max_hp - hp).max(0));
            participant.current_stats.hp = hp + gained;
            tick.healed += gained;
        }
    }

    participant.current_stats.hp = participant.current_stats.hp.clamp(0, max_hp.max(0));

    for active in &mut participant.status_effects {
        active.remaining = active.remaining.saturating_sub(1);
    }
    participant.status_effects.retain(|active| {
        if active.remaining == 0 {
            tick.expired.push(active.kind.clone());
            false
        } else {
            true
        }
    });

    tick
}

/// Strongest control effect currently active
pub fn action_gate(participant: &Participant, data: &GameData) -> ActionGate {
    let mut gate = ActionGate::Free;
    for active in &participant.status_effects {
        match data.status(&active.kind).and_then(|def| def.control) {
            Some(ControlKind::Incapacitate) => return ActionGate::Incapacitated,
            Some(ControlKind::Silence) => gate = ActionGate::Silenced,
            None => {}
        }
    }
    gate
}

/// Remove every harmful effect. Returns how many records were removed.
pub fn cleanse(participant: &mut Participant, data: &GameData) -> usize {
    let before = participant.status_effects.len();
    participant
        .status_effects
        .retain(|active| !data.status(&active.kind).map(|def| def.harmful).unwrap_or(false));
    before - participant.status_effects.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::grid::GridCoord;
    use crate::battle::terrain::TerrainKind;
    use crate::core::types::{ParticipantId, Team};

    fn data() -> GameData {
        GameData::builtin().unwrap()
    }

    fn fighter() -> Participant {
        Participant::new(ParticipantId(0), "Bram", Team::SideA, "warrior").with_stats(Stats {
            hp: 100,
            max_hp: 100,
            mana: 20,
            max_mana: 20,
            atk: 20,
            mag: 5,
            def: 10,
            res: 5,
            spd: 10,
            eva: 5,
            crit: 5,
        })
    }

    #[test]
    fn test_no_effects_means_base_stats() {
        let p = fighter();
        assert_eq!(effective_stats(&p, &data()), p.current_stats);
    }

    #[test]
    fn test_strength_up_single() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "strength_up", 3, None);
        // floor(20 * 1.25)
        assert_eq!(effective_stats(&p, &data).atk, 25);
    }

    #[test]
    fn test_stacking_is_additive() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "strength_up", 3, None);
        apply_status(&mut p, "strength_up", 3, None);
        assert!((modifier_sum(&p, &data, StatKind::Atk) - 0.5).abs() < 1e-9);
        // floor(20 * 1.5), not 20 * 1.25 * 1.25
        assert_eq!(effective_stats(&p, &data).atk, 30);
    }

    #[test]
    fn test_opposing_modifiers_cancel() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "strength_up", 2, None);
        apply_status(&mut p, "weakness", 2, None);
        assert_eq!(effective_stats(&p, &data).atk, 20);
    }

    #[test]
    fn test_pools_never_modified() {
        let data = data();
        let mut p = fighter();
        for _ in 0..3 {
            apply_status(&mut p, "curse", 2, None);
        }
        let stats = effective_stats(&p, &data);
        assert_eq!(stats.max_hp, 100);
        assert_eq!(stats.max_mana, 20);
    }

    #[test]
    fn test_effective_stat_never_negative() {
        let data = data();
        let mut p = fighter();
        for _ in 0..6 {
            apply_status(&mut p, "weakness", 2, None);
        }
        assert_eq!(effective_stats(&p, &data).atk, 0);
    }

    #[test]
    fn test_terrain_delta_added_after_percentages() {
        let data = data();
        let mut p = fighter();
        p.place(GridCoord::new(1, 1), TerrainKind::Mountain);
        apply_status(&mut p, "defense_up", 2, None);
        // floor(10 * 1.25) + 5
        assert_eq!(effective_stats(&p, &data).def, 17);
    }

    #[test]
    fn test_magnitude_scales_modifier() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "strength_up", 2, Some(2.0));
        assert_eq!(effective_stats(&p, &data).atk, 30);
    }

    #[test]
    fn test_poison_ticks_and_expires() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "poison", 2, None);

        let first = process_turn_start(&mut p, &data);
        assert_eq!(first.damage, 8);
        assert_eq!(p.current_stats.hp, 92);
        assert!(first.expired.is_empty());

        let second = process_turn_start(&mut p, &data);
        assert_eq!(second.damage, 8);
        assert_eq!(second.expired, vec!["poison".to_string()]);
        assert!(p.status_effects.is_empty());
    }

    #[test]
    fn test_regen_capped_at_max() {
        let data = data();
        let mut p = fighter();
        p.take_damage(5);
        apply_status(&mut p, "regeneration", 3, None);
        let tick = process_turn_start(&mut p, &data);
        assert_eq!(tick.healed, 5);
        assert_eq!(p.current_stats.hp, 100);
    }

    #[test]
    fn test_dot_clamps_at_zero() {
        let data = data();
        let mut p = fighter();
        p.current_stats.hp = 3;
        apply_status(&mut p, "poison", 3, None);
        let tick = process_turn_start(&mut p, &data);
        assert_eq!(tick.damage, 3);
        assert_eq!(p.current_stats.hp, 0);
    }

    #[test]
    fn test_gates() {
        let data = data();
        let mut p = fighter();
        assert_eq!(action_gate(&p, &data), ActionGate::Free);

        apply_status(&mut p, "silence", 1, None);
        let gate = action_gate(&p, &data);
        assert!(gate.can_act());
        assert!(!gate.can_use_skills());

        apply_status(&mut p, "fear", 1, None);
        assert_eq!(action_gate(&p, &data), ActionGate::Incapacitated);
    }

    #[test]
    fn test_one_turn_control_gates_its_last_turn() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "stun", 1, None);

        let tick = process_turn_start(&mut p, &data);
        assert_eq!(tick.gate, ActionGate::Incapacitated);
        assert_eq!(tick.expired, vec!["stun".to_string()]);
        assert!(p.status_effects.is_empty());

        let tick = process_turn_start(&mut p, &data);
        assert_eq!(tick.gate, ActionGate::Free);
    }

    #[test]
    fn test_silence_gates_every_turn_of_its_duration() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "silence", 2, None);

        assert_eq!(process_turn_start(&mut p, &data).gate, ActionGate::Silenced);
        assert_eq!(process_turn_start(&mut p, &data).gate, ActionGate::Silenced);
        assert_eq!(process_turn_start(&mut p, &data).gate, ActionGate::Free);
    }

    #[test]
    fn test_cleanse_keeps_buffs() {
        let data = data();
        let mut p = fighter();
        apply_status(&mut p, "poison", 3, None);
        apply_status(&mut p, "slow", 3, None);
        apply_status(&mut p, "haste", 3, None);
        assert_eq!(cleanse(&mut p, &data), 2);
        assert_eq!(p.status_effects.len(), 1);
        assert_eq!(p.status_effects[0].kind, "haste");
    }

    #[test]
    fn test_zero_duration_not_applied() {
        let mut p = fighter();
        apply_status(&mut p, "haste", 0, None);
        assert!(p.status_effects.is_empty());
    }
}

//! Damage resolution: evasion, defense curve, minimum floor, critical hits
//!
//! Defense reduces damage asymptotically (`atk / (atk + def * factor)`), so
//! armor matters but never makes a target immune. A miss is decided before
//! anything else and always deals exactly zero.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::ROLL_SCALE;
use crate::battle::stats::Stats;
use crate::core::config::CombatConfig;

/// Outcome of one damage roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub amount: i32,
    pub missed: bool,
    pub critical: bool,
}

impl DamageRoll {
    pub fn miss() -> Self {
        Self {
            amount: 0,
            missed: true,
            critical: false,
        }
    }
}

/// Damage before any dice: `(after_defense, min_damage)` for a given multiplier.
///
/// Both values are non-negative; a zero denominator yields zero.
pub fn damage_components(
    attacker: &Stats,
    defender: &Stats,
    is_physical: bool,
    multiplier: f64,
    config: &CombatConfig,
) -> (f64, f64) {
    let (attack, defense) = if is_physical {
        (attacker.atk, defender.def)
    } else {
        (attacker.mag, defender.res)
    };
    let attack = f64::from(attack.max(0));
    let defense = f64::from(defense.max(0));

    let base = attack * multiplier.max(0.0);
    let reduction = defense * config.defense_factor;
    let denominator = attack + reduction;

    let after_defense = if denominator > 0.0 {
        base * attack / denominator
    } else {
        0.0
    };
    let min_damage = base * config.min_damage_factor;

    (after_defense, min_damage)
}

/// Resolve one hit between two effective stat lines.
///
/// The evasion roll is drawn first; the crit roll only if the hit lands.
pub fn damage<R: Rng + ?Sized>(
    attacker: &Stats,
    defender: &Stats,
    is_physical: bool,
    multiplier: f64,
    rng: &mut R,
    config: &CombatConfig,
) -> DamageRoll {
    let evasion_roll = rng.gen_range(0..ROLL_SCALE);
    if evasion_roll < defender.eva {
        return DamageRoll::miss();
    }

    let (after_defense, min_damage) =
        damage_components(attacker, defender, is_physical, multiplier, config);

    let crit_roll = rng.gen_range(0..ROLL_SCALE);
    let critical = crit_roll < attacker.crit;
    let crit_multiplier = if critical { config.crit_multiplier } else { 1.0 };

    let amount = (after_defense.max(min_damage) * crit_multiplier).floor().max(0.0) as i32;

    DamageRoll {
        amount,
        missed: false,
        critical,
    }
}

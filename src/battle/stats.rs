//! Participant stat blocks
//!
//! `StatBlock` is the fractional form used by class tables, growth rates and
//! equipment bonuses. `Stats` is the integer form a participant carries.

use serde::{Deserialize, Serialize};

/// The nine stats a class table defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Hp,
    Mana,
    Atk,
    Mag,
    Def,
    Res,
    Spd,
    Eva,
    Crit,
}

impl StatKind {
    pub const ALL: [StatKind; 9] = [
        StatKind::Hp,
        StatKind::Mana,
        StatKind::Atk,
        StatKind::Mag,
        StatKind::Def,
        StatKind::Res,
        StatKind::Spd,
        StatKind::Eva,
        StatKind::Crit,
    ];

    /// Stats that status effects and terrain may modify
    pub const COMBAT: [StatKind; 7] = [
        StatKind::Atk,
        StatKind::Mag,
        StatKind::Def,
        StatKind::Res,
        StatKind::Spd,
        StatKind::Eva,
        StatKind::Crit,
    ];

    /// HP and mana are pools, never percentage-modified
    pub fn is_pool(&self) -> bool {
        matches!(self, StatKind::Hp | StatKind::Mana)
    }
}

/// Fractional stat values keyed by `StatKind`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub hp: f64,
    pub mana: f64,
    pub atk: f64,
    pub mag: f64,
    pub def: f64,
    pub res: f64,
    pub spd: f64,
    pub eva: f64,
    pub crit: f64,
}

impl StatBlock {
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Mana => self.mana,
            StatKind::Atk => self.atk,
            StatKind::Mag => self.mag,
            StatKind::Def => self.def,
            StatKind::Res => self.res,
            StatKind::Spd => self.spd,
            StatKind::Eva => self.eva,
            StatKind::Crit => self.crit,
        }
    }
}

/// Integer stats carried by a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub atk: i32,
    pub mag: i32,
    pub def: i32,
    pub res: i32,
    pub spd: i32,
    pub eva: i32,
    pub crit: i32,
}

impl Stats {
    /// Read a stat; pools return their maximum
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Hp => self.max_hp,
            StatKind::Mana => self.max_mana,
            StatKind::Atk => self.atk,
            StatKind::Mag => self.mag,
            StatKind::Def => self.def,
            StatKind::Res => self.res,
            StatKind::Spd => self.spd,
            StatKind::Eva => self.eva,
            StatKind::Crit => self.crit,
        }
    }

    /// Write a stat; writing a pool sets both current and max
    pub fn set(&mut self, kind: StatKind, value: i32) {
        match kind {
            StatKind::Hp => {
                self.hp = value;
                self.max_hp = value;
            }
            StatKind::Mana => {
                self.mana = value;
                self.max_mana = value;
            }
            StatKind::Atk => self.atk = value,
            StatKind::Mag => self.mag = value,
            StatKind::Def => self.def = value,
            StatKind::Res => self.res = value,
            StatKind::Spd => self.spd = value,
            StatKind::Eva => self.eva = value,
            StatKind::Crit => self.crit = value,
        }
    }

    /// Add a flat bonus; pool bonuses raise both current and max
    pub fn add(&mut self, kind: StatKind, bonus: i32) {
        match kind {
            StatKind::Hp => {
                self.hp += bonus;
                self.max_hp += bonus;
            }
            StatKind::Mana => {
                self.mana += bonus;
                self.max_mana += bonus;
            }
            _ => {
                let value = self.get(kind) + bonus;
                self.set(kind, value);
            }
        }
    }
}

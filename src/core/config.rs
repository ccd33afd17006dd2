//! Combat configuration with documented constants
//!
//! All tunable numbers of the combat model live here. The encounter curve
//! (how many enemies, at what level, when a boss spawns) is owned by the
//! caller and passed in with the rest of the config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticsError};

/// Configuration for a single combat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === DAMAGE MODEL ===
    /// Multiplier applied to the defender's defense before it joins the
    /// denominator of the damage curve.
    ///
    /// `after_defense = base * atk / (atk + def * defense_factor)`.
    /// At 1.5, a defender whose def equals the attacker's atk takes 40% damage.
    pub defense_factor: f64,

    /// Fraction of base damage that always gets through
    ///
    /// Keeps attacks against heavily armored targets from becoming negligible.
    pub min_damage_factor: f64,

    /// Damage multiplier on a critical hit
    pub crit_multiplier: f64,

    // === MOVEMENT & RANGE ===
    /// Movement points available each turn
    ///
    /// Grassland costs 1 per cell, so the default budget moves 3 cells
    /// across open ground.
    pub movement_budget: u32,

    /// Basic attack range for melee archetypes (Manhattan distance)
    pub melee_attack_range: u32,

    /// Basic attack range for ranged archetypes (Manhattan distance)
    pub ranged_attack_range: u32,

    // === SKILLS ===
    /// Extra damage multiplier per skill point invested beyond the first
    ///
    /// At 0.1, a skill with 3 points hits 20% harder than with 1 point.
    pub skill_point_bonus: f64,

    // === PACING ===
    /// Turn count after which a stalled battle resolves as a defeat
    pub max_turns: u32,

    // === TERRAIN ===
    /// Chance that a generated cell copies a neighbour's terrain
    ///
    /// Higher values produce larger clusters of the same terrain.
    pub terrain_cluster_chance: f64,

    /// Enemy generation
    pub encounter: EncounterConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            defense_factor: 1.5,
            min_damage_factor: 0.2,
            crit_multiplier: 2.0,

            movement_budget: 3,
            melee_attack_range: 1,
            ranged_attack_range: 3,

            skill_point_bonus: 0.1,

            max_turns: 200,

            terrain_cluster_chance: 0.4,

            encounter: EncounterConfig::default(),
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML. Missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.defense_factor < 0.0 {
            return Err(TacticsError::InvalidConfig(format!(
                "defense_factor ({}) must not be negative",
                self.defense_factor
            )));
        }

        if !(0.0..=1.0).contains(&self.min_damage_factor) {
            return Err(TacticsError::InvalidConfig(format!(
                "min_damage_factor ({}) must be within [0, 1]",
                self.min_damage_factor
            )));
        }

        if self.crit_multiplier < 1.0 {
            return Err(TacticsError::InvalidConfig(format!(
                "crit_multiplier ({}) must be at least 1",
                self.crit_multiplier
            )));
        }

        if self.movement_budget == 0 || self.melee_attack_range == 0 {
            return Err(TacticsError::InvalidConfig(
                "movement_budget and melee_attack_range must be positive".into(),
            ));
        }

        if self.max_turns == 0 {
            return Err(TacticsError::InvalidConfig("max_turns must be positive".into()));
        }

        if !(0.0..=1.0).contains(&self.terrain_cluster_chance) {
            return Err(TacticsError::InvalidConfig(format!(
                "terrain_cluster_chance ({}) must be within [0, 1]",
                self.terrain_cluster_chance
            )));
        }

        self.encounter.validate()
    }
}

/// How the enemy level follows the stage number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelCurve {
    /// `level = stage + offset`
    StageDirect { offset: i32 },
    /// `level = floor(stage * factor)`
    StageMultiplier { factor: f64 },
}

impl LevelCurve {
    /// Enemy level for a stage, never below 1
    pub fn level_for(&self, stage: u32) -> u32 {
        let level = match *self {
            LevelCurve::StageDirect { offset } => i64::from(stage) + i64::from(offset),
            LevelCurve::StageMultiplier { factor } => (f64::from(stage) * factor).floor() as i64,
        };
        level.clamp(1, i64::from(u32::MAX)) as u32
    }
}

/// One step of the enemy count table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountStep {
    pub min_stage: u32,
    pub enemy_count: usize,
}

/// Caller-owned encounter curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Every stage that is a multiple of this spawns a boss (0 disables bosses)
    pub boss_interval: u32,

    /// Monotonic step table; the last step whose `min_stage` is reached wins
    pub count_steps: Vec<CountStep>,

    pub level_curve: LevelCurve,

    /// Classes normal enemies are drawn from
    pub enemy_classes: Vec<String>,

    pub boss_class: String,

    /// Multiplier on boss hp, atk and mag
    pub boss_major_multiplier: f64,

    /// Multiplier on every other boss stat
    pub boss_minor_multiplier: f64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            boss_interval: 10,
            count_steps: vec![
                CountStep { min_stage: 1, enemy_count: 2 },
                CountStep { min_stage: 4, enemy_count: 3 },
                CountStep { min_stage: 8, enemy_count: 4 },
                CountStep { min_stage: 15, enemy_count: 5 },
            ],
            level_curve: LevelCurve::StageDirect { offset: 0 },
            enemy_classes: vec![
                "goblin".to_string(),
                "orc".to_string(),
                "skeleton_archer".to_string(),
            ],
            boss_class: "dragon".to_string(),
            boss_major_multiplier: 2.25,
            boss_minor_multiplier: 1.5,
        }
    }
}

impl EncounterConfig {
    pub fn is_boss_stage(&self, stage: u32) -> bool {
        self.boss_interval > 0 && stage > 0 && stage % self.boss_interval == 0
    }

    pub fn enemy_count(&self, stage: u32) -> usize {
        self.count_steps
            .iter()
            .filter(|step| stage >= step.min_stage)
            .map(|step| step.enemy_count)
            .last()
            .unwrap_or(1)
    }

    pub fn enemy_level(&self, stage: u32) -> u32 {
        self.level_curve.level_for(stage)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count_steps.is_empty() {
            return Err(TacticsError::InvalidConfig("count_steps must not be empty".into()));
        }

        for pair in self.count_steps.windows(2) {
            if pair[1].min_stage <= pair[0].min_stage || pair[1].enemy_count < pair[0].enemy_count {
                return Err(TacticsError::InvalidConfig(format!(
                    "count_steps must be increasing: {:?} then {:?}",
                    pair[0], pair[1]
                )));
            }
        }

        if self.enemy_classes.is_empty() {
            return Err(TacticsError::InvalidConfig("enemy_classes must not be empty".into()));
        }

        if self.boss_major_multiplier <= 0.0 || self.boss_minor_multiplier <= 0.0 {
            return Err(TacticsError::InvalidConfig("boss multipliers must be positive".into()));
        }

        Ok(())
    }
}

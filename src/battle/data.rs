//! Game data tables loaded from TOML
//!
//! Class stat tables, skills, items, equipment and status effects are parsed
//! once into typed maps before a combat starts. The engine never looks
//! anything up by name outside these tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::stats::{StatBlock, StatKind};
use crate::core::error::{Result, TacticsError};

/// Bundled default tables
const BUILTIN_DATA: &str = include_str!("../../data/game_data.toml");

/// Basic attack reach of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    #[default]
    Melee,
    Ranged,
}

/// What an ability does to its targets' HP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Magical,
    Healing,
    /// Effects only, no HP change
    Utility,
}

impl DamageType {
    pub fn is_damage(&self) -> bool {
        matches!(self, DamageType::Physical | DamageType::Magical)
    }
}

/// Area shape of an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AoeType {
    #[default]
    Single,
    Line,
    Radius,
    AllAllies,
    AllEnemies,
}

/// Extra effects an ability applies to each affected participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectSpec {
    ApplyStatus {
        status: String,
        duration: u32,
        /// Percent chance to apply
        #[serde(default = "full_chance")]
        chance: u32,
        #[serde(default)]
        magnitude: Option<f64>,
    },
    /// Restore a percentage of max HP
    Heal { percent: f64 },
    RestoreMana { amount: i32 },
    /// Bring a defeated ally back with a percentage of max HP
    Revive { percent: f64 },
    /// Remove every harmful status
    Cleanse,
}

fn full_chance() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_multiplier() -> f64 {
    1.0
}

/// Base stats and growth for a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archetype: Archetype,
    /// Damage type of the basic attack
    #[serde(default)]
    pub attack_type: DamageType,
    pub base: StatBlock,
    #[serde(default)]
    pub growth: StatBlock,
}

/// Skill or consumable item definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDef {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub range: u32,
    #[serde(default)]
    pub aoe_type: AoeType,
    #[serde(default)]
    pub aoe_radius: u32,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default = "default_multiplier")]
    pub damage_multiplier: f64,
    #[serde(default = "default_true")]
    pub requires_target: bool,
    /// Ignored for items
    #[serde(default)]
    pub mana_cost: i32,
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
}

impl AbilityDef {
    pub fn has_revive(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, EffectSpec::Revive { .. }))
    }

    /// Only the caster can be chosen
    pub fn targets_self_only(&self) -> bool {
        !matches!(self.aoe_type, AoeType::AllAllies | AoeType::AllEnemies)
            && (self.range == 0 || !self.requires_target)
    }
}

/// Crowd-control category of a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// No actions at all (stun, fear, freeze)
    Incapacitate,
    /// No skills; moving and basic attacks still allowed
    Silence,
}

/// Status effect definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusDef {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    /// Fractional modifiers, e.g. `atk = 0.25` for +25%
    #[serde(default)]
    pub stat_modifiers: BTreeMap<StatKind, f64>,
    /// Percent of max HP lost at turn start
    #[serde(default)]
    pub dot_percent: f64,
    /// Percent of max HP restored at turn start
    #[serde(default)]
    pub regen_percent: f64,
    #[serde(default)]
    pub control: Option<ControlKind>,
    #[serde(default)]
    pub harmful: bool,
}

/// Equipment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Helmet,
    Accessory,
}

/// Equipment definition; bonuses are flat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentDef {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub slot: EquipSlot,
    #[serde(default)]
    pub bonuses: StatBlock,
}

/// On-disk layout of the data file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GameDataFile {
    classes: BTreeMap<String, ClassDef>,
    skills: BTreeMap<String, AbilityDef>,
    items: BTreeMap<String, AbilityDef>,
    equipment: BTreeMap<String, EquipmentDef>,
    statuses: BTreeMap<String, StatusDef>,
}

/// All lookup tables a combat needs
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub classes: AHashMap<String, ClassDef>,
    pub skills: AHashMap<String, AbilityDef>,
    pub items: AHashMap<String, AbilityDef>,
    pub equipment: AHashMap<String, EquipmentDef>,
    pub statuses: AHashMap<String, StatusDef>,
}

impl GameData {
    /// Tables bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_DATA)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: GameDataFile = toml::from_str(content)?;

        let data = Self {
            classes: keyed(file.classes, |def, id| def.id = id),
            skills: keyed(file.skills, |def, id| def.id = id),
            items: keyed(file.items, |def, id| def.id = id),
            equipment: keyed(file.equipment, |def, id| def.id = id),
            statuses: keyed(file.statuses, |def, id| def.id = id),
        };
        data.validate()?;
        Ok(data)
    }

    /// Status references inside abilities must resolve
    fn validate(&self) -> Result<()> {
        for ability in self.skills.values().chain(self.items.values()) {
            for effect in &ability.effects {
                if let EffectSpec::ApplyStatus { status, .. } = effect {
                    if !self.statuses.contains_key(status) {
                        return Err(TacticsError::InvalidConfig(format!(
                            "{} applies unknown status {}",
                            ability.id, status
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn class(&self, id: &str) -> Result<&ClassDef> {
        self.classes
            .get(id)
            .ok_or_else(|| TacticsError::InvalidClassData(id.to_string()))
    }

    pub fn skill(&self, id: &str) -> Option<&AbilityDef> {
        self.skills.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&AbilityDef> {
        self.items.get(id)
    }

    pub fn status(&self, id: &str) -> Option<&StatusDef> {
        self.statuses.get(id)
    }

    pub fn equipment(&self, id: &str) -> Option<&EquipmentDef> {
        self.equipment.get(id)
    }

    /// Does this ability help its targets rather than hurt them?
    ///
    /// Healing damage type, or any heal/revive/cleanse/mana effect, or a
    /// non-harmful status.
    pub fn is_support(&self, ability: &AbilityDef) -> bool {
        if ability.damage_type == DamageType::Healing {
            return true;
        }
        if ability.damage_type.is_damage() {
            return false;
        }
        ability.effects.iter().any(|effect| match effect {
            EffectSpec::Heal { .. }
            | EffectSpec::Revive { .. }
            | EffectSpec::RestoreMana { .. }
            | EffectSpec::Cleanse => true,
            EffectSpec::ApplyStatus { status, .. } => self
                .status(status)
                .map(|def| !def.harmful)
                .unwrap_or(false),
        })
    }
}

fn keyed<T>(table: BTreeMap<String, T>, set_id: impl Fn(&mut T, String)) -> AHashMap<String, T> {
    table
        .into_iter()
        .map(|(id, mut def)| {
            set_id(&mut def, id.clone());
            (id, def)
        })
        .collect()
}

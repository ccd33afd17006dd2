//! Battle system - turn-based tactical combat on an 8x8 grid
//!
//! Two sides, one board, one participant at a time. Everything random
//! (terrain, enemy picks, evasion and crit rolls, status chances) flows
//! through the RNG handed to the engine, so a seed replays a whole battle.
//!
//! Layering, leaf-first:
//! - grid / terrain / data: board geometry, terrain table, game tables
//! - roster: roster entries and stage number -> participants
//! - movement / targeting / damage / status / turn_order: pure rules
//! - ai: decisions for AI-controlled participants
//! - engine: the turn state machine

pub mod ai;
pub mod constants;
pub mod damage;
pub mod data;
pub mod engine;
pub mod events;
pub mod grid;
pub mod movement;
pub mod participant;
pub mod roster;
pub mod state;
pub mod stats;
pub mod status;
pub mod targeting;
pub mod terrain;
pub mod turn_order;

// Re-exports for convenient access
pub use ai::{AiAction, AiContext, CombatAi, NearestTargetAi};
pub use constants::*;
pub use damage::{damage, damage_components, DamageRoll};
pub use data::{
    AbilityDef, AoeType, Archetype, ClassDef, ControlKind, DamageType, EffectSpec, EquipSlot,
    EquipmentDef, GameData, StatusDef,
};
pub use engine::{ActionOutcome, BattleSetup, CombatEngine, RejectReason};
pub use events::{CombatEvent, CombatEventKind, CombatEventLog};
pub use grid::GridCoord;
pub use movement::{path_cost, path_to, reachable};
pub use participant::{ActiveStatus, Participant};
pub use roster::{build_allies, build_enemies, class_stats, deploy, deployment_cells, RosterEntry};
pub use state::{CombatResult, CombatState, Occupancy, TurnPhase};
pub use stats::{StatBlock, StatKind, Stats};
pub use status::{
    action_gate, apply_status, cleanse, effective_stats, modifier_sum, process_turn_start,
    ActionGate, StatusTick,
};
pub use targeting::{
    affected_cells, affected_participants, attack_range, attack_targets, selection_options,
    TargetSelection,
};
pub use terrain::{TerrainGrid, TerrainKind};
pub use turn_order::{compute_order, TurnOrder};

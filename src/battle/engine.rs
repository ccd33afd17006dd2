//! Combat engine: turn state machine over the participant arena
//!
//! Each turn runs `AwaitingMove -> AwaitingAction -> TurnComplete`. Status
//! effects are processed when a participant's turn starts; terminal state is
//! re-evaluated after every HP change, not only at turn boundaries.
//!
//! Player input that breaks the rules is rejected and leaves the state
//! untouched. Combat itself never returns an error.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::battle::ai::{AiAction, AiContext, CombatAi, NearestTargetAi};
use crate::battle::constants::ROLL_SCALE;
use crate::battle::damage::{damage, DamageRoll};
use crate::battle::data::{AbilityDef, DamageType, EffectSpec, GameData};
use crate::battle::events::{CombatEvent, CombatEventKind, CombatEventLog};
use crate::battle::grid::GridCoord;
use crate::battle::movement::{path_cost, path_to, reachable};
use crate::battle::roster::{build_allies, build_enemies, deploy, RosterEntry};
use crate::battle::state::{CombatResult, CombatState, TurnPhase};
use crate::battle::stats::Stats;
use crate::battle::status::{action_gate, apply_status, cleanse, effective_stats, process_turn_start, ActionGate};
use crate::battle::targeting::{affected_participants, attack_targets, TargetSelection};
use crate::battle::terrain::TerrainGrid;
use crate::battle::turn_order::TurnOrder;
use crate::core::config::CombatConfig;
use crate::core::error::Result;
use crate::core::types::{Controller, ParticipantId, Team, Turn};

/// Everything the caller hands over to start a combat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleSetup {
    pub roster: Vec<RosterEntry>,
    pub stage: u32,
    /// Side A's consumables: item id -> count
    pub consumables: BTreeMap<String, u32>,
    /// Let the AI policy control side A as well
    pub auto_allies: bool,
}

/// Why an action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("combat is already resolved")]
    CombatOver,
    #[error("not this participant's turn")]
    NotYourTurn,
    #[error("participant is AI-controlled")]
    NotPlayerControlled,
    #[error("already moved this turn")]
    AlreadyMoved,
    #[error("already acted this turn")]
    AlreadyActed,
    #[error("skills are blocked by silence")]
    Silenced,
    #[error("cell is not a legal destination")]
    InvalidCell,
    #[error("target is not legal for this action")]
    InvalidTarget,
    #[error("skill is not equipped")]
    SkillNotEquipped,
    #[error("not enough mana")]
    NotEnoughMana,
    #[error("item is not in the bag")]
    ItemUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Applied,
    Rejected(RejectReason),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

type ActionResult = std::result::Result<(), RejectReason>;

impl From<ActionResult> for ActionOutcome {
    fn from(result: ActionResult) -> Self {
        match result {
            Ok(()) => ActionOutcome::Applied,
            Err(reason) => ActionOutcome::Rejected(reason),
        }
    }
}

pub struct CombatEngine<R: Rng = ChaCha8Rng> {
    state: CombatState,
    data: GameData,
    config: CombatConfig,
    rng: R,
    events: CombatEventLog,
    ai: Box<dyn CombatAi>,
    /// Control gate of the current actor, fixed at turn start
    turn_gate: ActionGate,
}

impl<R: Rng> CombatEngine<R> {
    /// Build both sides, generate terrain, deploy and start the first turn.
    ///
    /// Fails on invalid configuration, unknown classes or oversized rosters.
    pub fn new(setup: BattleSetup, data: GameData, config: CombatConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let terrain = TerrainGrid::generate(&mut rng, config.terrain_cluster_chance);

        let mut next_id = 0;
        let mut participants = build_allies(&setup.roster, &data, &mut next_id)?;
        participants.extend(build_enemies(
            setup.stage,
            &data,
            &config.encounter,
            &mut rng,
            &mut next_id,
        )?);

        deploy(&mut participants, Team::SideA, &terrain)?;
        deploy(&mut participants, Team::SideB, &terrain)?;

        if setup.auto_allies {
            for participant in participants.iter_mut() {
                participant.controller = Controller::Ai;
            }
        }

        let turn_order = TurnOrder::new(&participants, &data);
        let mut state = CombatState::new(participants, terrain, turn_order);
        state.consumables = setup.consumables;

        info!(
            stage = setup.stage,
            boss = config.encounter.is_boss_stage(setup.stage),
            "Combat created"
        );

        Ok(Self::from_state(state, data, config, rng))
    }

    /// Run an already assembled state; the current turn starts immediately
    pub fn from_state(state: CombatState, data: GameData, config: CombatConfig, rng: R) -> Self {
        let mut engine = Self {
            state,
            data,
            config,
            rng,
            events: CombatEventLog::new(),
            ai: Box::new(NearestTargetAi),
            turn_gate: ActionGate::Free,
        };

        let allies = engine.state.participants.iter().filter(|p| p.team == Team::SideA).count();
        let enemies = engine.state.participants.len() - allies;
        info!(allies, enemies, "Combat started");
        engine.log(CombatEventKind::BattleStarted { allies, enemies });

        engine.begin_turn();
        engine
    }

    /// Swap the policy used for AI-controlled participants
    pub fn with_ai(mut self, ai: Box<dyn CombatAi>) -> Self {
        self.ai = ai;
        self
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    pub fn turn(&self) -> Turn {
        self.state.turn()
    }

    pub fn is_over(&self) -> bool {
        self.state.game_over
    }

    pub fn current_actor(&self) -> Option<ParticipantId> {
        self.state.current_actor()
    }

    pub fn result(&self) -> Option<CombatResult> {
        self.state.result()
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    /// Destinations the participant could move to right now
    pub fn reachable_cells(&self, actor: ParticipantId) -> BTreeSet<GridCoord> {
        reachable(&self.state, actor, self.config.movement_budget)
    }

    /// Opponents the participant could attack right now
    pub fn attack_targets(&self, actor: ParticipantId) -> Vec<ParticipantId> {
        attack_targets(&self.state, actor, &self.config)
    }

    // ------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------

    pub fn move_to(&mut self, actor: ParticipantId, cell: GridCoord) -> ActionOutcome {
        self.ensure_player(actor)
            .and_then(|()| self.perform_move(actor, cell))
            .into()
    }

    pub fn attack(&mut self, actor: ParticipantId, target: ParticipantId) -> ActionOutcome {
        self.ensure_player(actor)
            .and_then(|()| self.perform_attack(actor, target))
            .into()
    }

    pub fn use_skill(&mut self, actor: ParticipantId, skill_id: &str, selection: TargetSelection) -> ActionOutcome {
        self.ensure_player(actor)
            .and_then(|()| self.perform_skill(actor, skill_id, selection))
            .into()
    }

    pub fn use_item(&mut self, actor: ParticipantId, item_id: &str, selection: TargetSelection) -> ActionOutcome {
        self.ensure_player(actor)
            .and_then(|()| self.perform_item(actor, item_id, selection))
            .into()
    }

    pub fn wait(&mut self, actor: ParticipantId) -> ActionOutcome {
        self.ensure_player(actor)
            .and_then(|()| self.perform_wait(actor))
            .into()
    }

    // ------------------------------------------------------------------
    // AI driving
    // ------------------------------------------------------------------

    /// Play the current participant's whole turn if it is AI-controlled.
    /// Returns false when it is a player's turn or the combat is over.
    pub fn step_ai(&mut self) -> bool {
        match self.state.current_actor() {
            Some(actor) if self.state.get(actor).is_some_and(|p| p.is_ai()) => {
                self.drive_actor(actor);
                true
            }
            _ => false,
        }
    }

    /// Play AI turns until a player must act or the combat ends
    pub fn run_until_player_input(&mut self) -> Option<ParticipantId> {
        while self.step_ai() {}
        self.state.current_actor()
    }

    /// Play every remaining turn with the AI policy, player side included
    pub fn run_to_completion(&mut self) -> CombatResult {
        loop {
            if let Some(result) = self.state.result() {
                return result;
            }
            match self.state.current_actor() {
                Some(actor) => self.drive_actor(actor),
                None => self.finish(false),
            }
        }
    }

    fn drive_actor(&mut self, actor: ParticipantId) {
        debug!(actor = ?actor, policy = self.ai.name(), "AI turn");
        let destination = {
            let context = AiContext {
                state: &self.state,
                data: &self.data,
                config: &self.config,
            };
            self.ai.plan_move(&context, actor)
        };

        let moved = destination.is_some_and(|cell| self.perform_move(actor, cell).is_ok());
        if !moved {
            if let Some(participant) = self.state.get_mut(actor) {
                participant.has_moved = true;
            }
            self.state.phase = TurnPhase::AwaitingAction;
        }

        let action = {
            let context = AiContext {
                state: &self.state,
                data: &self.data,
                config: &self.config,
            };
            self.ai.plan_action(&context, actor)
        };

        let applied = match action {
            AiAction::Attack(target) => self.perform_attack(actor, target).is_ok(),
            AiAction::Wait => false,
        };
        if !applied && self.perform_wait(actor).is_err() {
            warn!(actor = ?actor, "AI turn could not be closed");
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    fn ensure_turn(&self, actor: ParticipantId) -> ActionResult {
        if self.state.game_over {
            return Err(RejectReason::CombatOver);
        }
        if self.state.current_actor() != Some(actor) {
            return Err(RejectReason::NotYourTurn);
        }
        match self.state.get(actor) {
            Some(participant) if participant.has_acted => Err(RejectReason::AlreadyActed),
            Some(_) => Ok(()),
            None => Err(RejectReason::NotYourTurn),
        }
    }

    fn ensure_player(&self, actor: ParticipantId) -> ActionResult {
        self.ensure_turn(actor)?;
        match self.state.get(actor) {
            Some(participant) if participant.is_ai() => Err(RejectReason::NotPlayerControlled),
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Action resolution
    // ------------------------------------------------------------------

    fn perform_move(&mut self, actor: ParticipantId, cell: GridCoord) -> ActionResult {
        self.ensure_turn(actor)?;
        let participant = self.state.get(actor).ok_or(RejectReason::NotYourTurn)?;
        if participant.has_moved {
            return Err(RejectReason::AlreadyMoved);
        }
        let from = participant.position.ok_or(RejectReason::InvalidCell)?;

        let path = path_to(&self.state, actor, cell, self.config.movement_budget).ok_or(RejectReason::InvalidCell)?;
        let cost = path_cost(&self.state, &path);
        let terrain = self.state.terrain.get(cell);

        if let Some(participant) = self.state.get_mut(actor) {
            participant.place(cell, terrain);
            participant.has_moved = true;
            debug!(actor = %participant.name, ?from, to = ?cell, cost, ?terrain, "Moved");
        }
        self.state.phase = TurnPhase::AwaitingAction;
        self.log(CombatEventKind::Moved {
            actor,
            from,
            to: cell,
            cost,
        });
        Ok(())
    }

    fn perform_attack(&mut self, actor: ParticipantId, target: ParticipantId) -> ActionResult {
        self.ensure_turn(actor)?;
        if !attack_targets(&self.state, actor, &self.config).contains(&target) {
            return Err(RejectReason::InvalidTarget);
        }

        let is_physical = self
            .state
            .get(actor)
            .is_some_and(|p| p.attack_type != DamageType::Magical);
        let (Some(attacker), Some(defender)) = (self.effective(actor), self.effective(target)) else {
            return Err(RejectReason::InvalidTarget);
        };

        let roll = damage(&attacker, &defender, is_physical, 1.0, &mut self.rng, &self.config);
        debug!(attacker = ?actor, defender = ?target, amount = roll.amount, missed = roll.missed, critical = roll.critical, "Basic attack");

        self.deal_damage(actor, target, roll);
        self.end_turn(actor);
        Ok(())
    }

    fn perform_skill(&mut self, actor: ParticipantId, skill_id: &str, selection: TargetSelection) -> ActionResult {
        self.ensure_turn(actor)?;
        let caster = self.state.get(actor).ok_or(RejectReason::NotYourTurn)?;
        if !caster.has_equipped(skill_id) {
            return Err(RejectReason::SkillNotEquipped);
        }
        if !self.turn_gate.can_use_skills() || !action_gate(caster, &self.data).can_use_skills() {
            return Err(RejectReason::Silenced);
        }
        let points = caster.skill_points(skill_id);
        let mana = caster.current_stats.mana;

        let Some(skill) = self.data.skill(skill_id).cloned() else {
            warn!(skill = %skill_id, "Skill definition missing, action consumed with no effect");
            self.end_turn(actor);
            return Ok(());
        };
        if mana < skill.mana_cost {
            return Err(RejectReason::NotEnoughMana);
        }
        let targets =
            affected_participants(&self.state, actor, &skill, selection, &self.data).ok_or(RejectReason::InvalidTarget)?;

        if let Some(caster) = self.state.get_mut(actor) {
            caster.current_stats.mana -= skill.mana_cost.max(0);
        }
        debug!(caster = ?actor, skill = %skill.id, targets = targets.len(), points, "Skill used");
        self.log(CombatEventKind::SkillUsed {
            caster: actor,
            skill: skill.id.clone(),
        });

        let scale = 1.0 + self.config.skill_point_bonus * f64::from(points - 1);
        self.resolve_ability(actor, &skill, &targets, scale);
        self.end_turn(actor);
        Ok(())
    }

    fn perform_item(&mut self, actor: ParticipantId, item_id: &str, selection: TargetSelection) -> ActionResult {
        self.ensure_turn(actor)?;
        let team = self.state.get(actor).map(|p| p.team).ok_or(RejectReason::NotYourTurn)?;
        // Only side A carries a bag
        if team != Team::SideA || self.state.consumables.get(item_id).copied().unwrap_or(0) == 0 {
            return Err(RejectReason::ItemUnavailable);
        }

        let Some(item) = self.data.item(item_id).cloned() else {
            warn!(item = %item_id, "Item definition missing, action consumed with no effect");
            self.end_turn(actor);
            return Ok(());
        };
        let targets =
            affected_participants(&self.state, actor, &item, selection, &self.data).ok_or(RejectReason::InvalidTarget)?;

        if let Some(count) = self.state.consumables.get_mut(item_id) {
            *count -= 1;
        }
        debug!(user = ?actor, item = %item.id, targets = targets.len(), "Item used");
        self.log(CombatEventKind::ItemUsed {
            user: actor,
            item: item.id.clone(),
        });

        self.resolve_ability(actor, &item, &targets, 1.0);
        self.end_turn(actor);
        Ok(())
    }

    fn perform_wait(&mut self, actor: ParticipantId) -> ActionResult {
        self.ensure_turn(actor)?;
        self.log(CombatEventKind::Waited { actor });
        self.end_turn(actor);
        Ok(())
    }

    /// Apply a skill or item to every affected participant in order.
    /// Stops as soon as the combat resolves.
    fn resolve_ability(&mut self, caster: ParticipantId, ability: &AbilityDef, targets: &[ParticipantId], scale: f64) {
        let Some(caster_stats) = self.effective(caster) else {
            return;
        };

        for &target in targets {
            if self.state.game_over {
                break;
            }
            let Some(alive) = self.state.get(target).map(|p| p.is_alive()) else {
                continue;
            };

            if alive {
                match ability.damage_type {
                    DamageType::Physical | DamageType::Magical => {
                        let Some(defender) = self.effective(target) else {
                            continue;
                        };
                        let is_physical = ability.damage_type == DamageType::Physical;
                        let roll = damage(
                            &caster_stats,
                            &defender,
                            is_physical,
                            ability.damage_multiplier * scale,
                            &mut self.rng,
                            &self.config,
                        );
                        self.deal_damage(caster, target, roll);
                        // On-hit effects need a hit
                        if roll.missed {
                            continue;
                        }
                    }
                    DamageType::Healing => {
                        let amount = (f64::from(caster_stats.mag) * ability.damage_multiplier).floor() as i32;
                        self.restore_hp(target, amount);
                    }
                    DamageType::Utility => {}
                }
            }

            for effect in &ability.effects {
                if self.state.game_over {
                    break;
                }
                self.apply_effect(caster, target, effect);
            }
        }
    }

    fn apply_effect(&mut self, caster: ParticipantId, target: ParticipantId, effect: &EffectSpec) {
        let alive = self.state.get(target).is_some_and(|p| p.is_alive());

        match effect {
            EffectSpec::ApplyStatus {
                status,
                duration,
                chance,
                magnitude,
            } => {
                if !alive {
                    return;
                }
                if *chance < ROLL_SCALE as u32 && self.rng.gen_range(0..ROLL_SCALE as u32) >= *chance {
                    debug!(target = ?target, status = %status, "Status resisted");
                    return;
                }
                if let Some(participant) = self.state.get_mut(target) {
                    apply_status(participant, status, *duration, *magnitude);
                }
                self.log(CombatEventKind::StatusApplied {
                    target,
                    status: status.clone(),
                    duration: *duration,
                });
            }
            EffectSpec::Heal { percent } => {
                if alive {
                    let max_hp = self.state.get(target).map_or(0, |p| p.current_stats.max_hp);
                    self.restore_hp(target, (f64::from(max_hp) * percent).floor() as i32);
                }
            }
            EffectSpec::RestoreMana { amount } => {
                if !alive {
                    return;
                }
                let restored = self.state.get_mut(target).map_or(0, |p| p.restore_mana(*amount));
                if restored > 0 {
                    self.log(CombatEventKind::ManaRestored {
                        target,
                        amount: restored,
                    });
                }
            }
            EffectSpec::Revive { percent } => {
                if !alive {
                    self.revive(caster, target, *percent);
                }
            }
            EffectSpec::Cleanse => {
                if !alive {
                    return;
                }
                let removed = match self.state.get_mut(target) {
                    Some(participant) => cleanse(participant, &self.data),
                    None => 0,
                };
                if removed > 0 {
                    self.log(CombatEventKind::Cleansed { target, removed });
                }
            }
        }
    }

    /// Bring a defeated participant back onto the free cell nearest the caster
    fn revive(&mut self, caster: ParticipantId, target: ParticipantId, percent: f64) {
        let Some(anchor) = self.state.get(caster).and_then(|p| p.position) else {
            return;
        };
        let Some(cell) = GridCoord::all_cells()
            .filter(|cell| self.state.is_free(*cell))
            .min_by_key(|cell| (anchor.distance(cell), *cell))
        else {
            warn!(target = ?target, "No free cell to revive onto");
            return;
        };
        let terrain = self.state.terrain.get(cell);

        let Some(participant) = self.state.get_mut(target) else {
            return;
        };
        let max_hp = participant.current_stats.max_hp;
        let hp = ((f64::from(max_hp) * percent).floor() as i32).clamp(1, max_hp.max(1));
        participant.current_stats.hp = hp;
        participant.status_effects.clear();
        participant.place(cell, terrain);
        // Back next round
        participant.has_moved = true;
        participant.has_acted = true;

        debug!(target = %participant.name, ?cell, hp, "Revived");
        self.log(CombatEventKind::Revived { target, cell, hp });
    }

    fn restore_hp(&mut self, target: ParticipantId, amount: i32) {
        let healed = self.state.get_mut(target).map_or(0, |p| p.heal(amount));
        if healed > 0 {
            self.log(CombatEventKind::Healed { target, amount: healed });
        }
    }

    fn deal_damage(&mut self, source: ParticipantId, target: ParticipantId, roll: DamageRoll) {
        if roll.missed {
            self.log(CombatEventKind::Missed { source, target });
            return;
        }

        self.log(CombatEventKind::Hit {
            source,
            target,
            damage: roll.amount,
            critical: roll.critical,
        });

        let defeated = self.state.get_mut(target).is_some_and(|p| p.take_damage(roll.amount));
        if defeated {
            self.defeat(target);
        }
        self.check_end();
    }

    fn defeat(&mut self, target: ParticipantId) {
        if let Some(participant) = self.state.get_mut(target) {
            participant.remove_from_board();
            participant.status_effects.clear();
            debug!(target = %participant.name, "Defeated");
        }
        self.log(CombatEventKind::Defeated { target });
    }

    // ------------------------------------------------------------------
    // Turn flow
    // ------------------------------------------------------------------

    /// Start the current participant's turn, skipping turns that are lost
    /// to defeat, damage over time or incapacitation.
    fn begin_turn(&mut self) {
        loop {
            if self.check_end() {
                return;
            }
            if self.state.turn() > self.config.max_turns {
                warn!(turn = self.state.turn(), max_turns = self.config.max_turns, "Turn limit reached");
                self.finish(false);
                return;
            }
            let Some(actor) = self.state.turn_order.current() else {
                self.finish(false);
                return;
            };

            let eligible = self.state.get(actor).is_some_and(|p| p.is_alive() && !p.has_acted);
            if eligible {
                self.log(CombatEventKind::TurnStarted { actor });
                self.state.phase = TurnPhase::AwaitingMove;
                if !self.process_statuses(actor) {
                    return;
                }
                self.mark_done(actor);
            }

            if !self.advance() {
                return;
            }
        }
    }

    /// Turn-start status processing. Returns true if the turn is lost.
    fn process_statuses(&mut self, actor: ParticipantId) -> bool {
        let Some(participant) = self.state.get_mut(actor) else {
            return true;
        };
        let tick = process_turn_start(participant, &self.data);
        let alive = participant.is_alive();
        let gate = tick.gate;
        self.turn_gate = gate;

        if tick.damage > 0 || tick.healed > 0 {
            debug!(actor = ?actor, damage = tick.damage, healed = tick.healed, "Status tick");
            self.log(CombatEventKind::StatusTick {
                target: actor,
                damage: tick.damage,
                healed: tick.healed,
            });
        }
        for status in tick.expired {
            self.log(CombatEventKind::StatusExpired { target: actor, status });
        }

        if !alive {
            self.defeat(actor);
            self.check_end();
            return true;
        }

        if gate == ActionGate::Incapacitated {
            debug!(actor = ?actor, "Incapacitated, turn passes");
            self.log(CombatEventKind::Incapacitated { actor });
            return true;
        }

        false
    }

    fn mark_done(&mut self, actor: ParticipantId) {
        if let Some(participant) = self.state.get_mut(actor) {
            participant.has_moved = true;
            participant.has_acted = true;
        }
        if !self.state.game_over {
            self.state.phase = TurnPhase::TurnComplete;
        }
    }

    fn end_turn(&mut self, actor: ParticipantId) {
        self.mark_done(actor);
        if !self.state.game_over && self.advance() {
            self.begin_turn();
        }
    }

    /// Move the turn pointer. Returns false if the combat ended instead.
    fn advance(&mut self) -> bool {
        let state = &mut self.state;
        if state.turn_order.advance(&mut state.participants, &self.data).is_some() {
            return true;
        }
        if !self.check_end() {
            self.finish(false);
        }
        false
    }

    /// Evaluate terminal state; true once the combat is resolved
    fn check_end(&mut self) -> bool {
        if self.state.game_over {
            return true;
        }
        match self.state.check_battle_end() {
            Some(victory) => {
                self.announce_end(victory);
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, victory: bool) {
        if self.state.game_over {
            return;
        }
        self.state.resolve(victory);
        self.announce_end(victory);
    }

    fn announce_end(&mut self, victory: bool) {
        info!(
            victory,
            turns = self.state.turn(),
            survivors = self.state.living_count(Team::SideA),
            "Combat resolved"
        );
        self.log(CombatEventKind::BattleEnded { victory });
    }

    fn effective(&self, id: ParticipantId) -> Option<Stats> {
        self.state.get(id).map(|p| effective_stats(p, &self.data))
    }

    fn log(&mut self, kind: CombatEventKind) {
        let turn = self.state.turn();
        self.events.push(turn, kind);
    }
}

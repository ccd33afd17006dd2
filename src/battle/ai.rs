//! AI decision-making for AI-controlled participants
//!
//! Architecture: the `CombatAi` trait is the seam for swappable policies;
//! `AiContext` bundles the read-only view a policy decides from. The engine
//! executes whatever the policy returns through the same validated actions a
//! player uses, so a policy can never bypass movement or targeting rules.

use crate::battle::data::GameData;
use crate::battle::grid::GridCoord;
use crate::battle::movement::reachable;
use crate::battle::state::CombatState;
use crate::battle::targeting::attack_targets;
use crate::core::config::CombatConfig;
use crate::core::types::ParticipantId;

/// Read-only view handed to a policy
pub struct AiContext<'a> {
    pub state: &'a CombatState,
    pub data: &'a GameData,
    pub config: &'a CombatConfig,
}

/// What a policy wants to do in the action phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Attack(ParticipantId),
    Wait,
}

/// Trait for combat AI implementations
pub trait CombatAi {
    /// Destination for the move phase, or `None` to stay put
    fn plan_move(&mut self, context: &AiContext, actor: ParticipantId) -> Option<GridCoord>;

    /// Choice for the action phase, after any move has been applied
    fn plan_action(&mut self, context: &AiContext, actor: ParticipantId) -> AiAction;

    fn name(&self) -> &str;
}

/// Walk toward the nearest opponent and hit whatever is in range
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestTargetAi;

impl NearestTargetAi {
    /// Closest living opponent; ties go to the lowest id
    pub fn nearest_opponent(state: &CombatState, actor: ParticipantId) -> Option<ParticipantId> {
        let source = state.get(actor)?;
        let origin = source.position?;
        state
            .living(source.team.opponent())
            .filter_map(|p| p.position.map(|cell| (origin.distance(&cell), p.id)))
            .min()
            .map(|(_, id)| id)
    }
}

impl CombatAi for NearestTargetAi {
    fn plan_move(&mut self, context: &AiContext, actor: ParticipantId) -> Option<GridCoord> {
        let target = Self::nearest_opponent(context.state, actor)?;
        let goal = context.state.get(target)?.position?;

        // BTreeSet iterates row-major, so min_by_key keeps the first cell on ties
        reachable(context.state, actor, context.config.movement_budget)
            .into_iter()
            .min_by_key(|cell| cell.distance(&goal))
    }

    fn plan_action(&mut self, context: &AiContext, actor: ParticipantId) -> AiAction {
        match attack_targets(context.state, actor, context.config).first() {
            Some(&target) => AiAction::Attack(target),
            None => AiAction::Wait,
        }
    }

    fn name(&self) -> &str {
        "nearest_target"
    }
}

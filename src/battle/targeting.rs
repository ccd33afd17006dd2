//! Target resolution for basic attacks, skills and items
//!
//! Two steps for abilities: list what the caster may select, then expand a
//! selection into the participants it actually touches. Both steps share the
//! same role filter: offensive abilities touch opponents, support abilities
//! touch the caster's own side.

use serde::{Deserialize, Serialize};

use crate::battle::data::{AbilityDef, AoeType, Archetype, GameData};
use crate::battle::grid::GridCoord;
use crate::battle::participant::Participant;
use crate::battle::state::CombatState;
use crate::core::config::CombatConfig;
use crate::core::types::ParticipantId;

/// What the caster points an ability at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSelection {
    /// Self-only and all-allies/all-enemies abilities need no choice
    Automatic,
    Participant(ParticipantId),
    Cell(GridCoord),
}

/// Basic attack reach from the class archetype
pub fn attack_range(participant: &Participant, config: &CombatConfig) -> u32 {
    match participant.archetype {
        Archetype::Melee => config.melee_attack_range,
        Archetype::Ranged => config.ranged_attack_range,
    }
}

/// Living opponents within basic attack range, in arena order
pub fn attack_targets(
    state: &CombatState,
    attacker: ParticipantId,
    config: &CombatConfig,
) -> Vec<ParticipantId> {
    let Some(source) = state.get(attacker) else {
        return Vec::new();
    };
    let Some(origin) = source.position else {
        return Vec::new();
    };
    let range = attack_range(source, config);

    state
        .living(source.team.opponent())
        .filter(|p| p.position.is_some_and(|cell| origin.distance(&cell) <= range))
        .map(|p| p.id)
        .collect()
}

/// Does the role filter accept this participant for this caster?
fn role_accepts(caster: &Participant, candidate: &Participant, support: bool) -> bool {
    if support {
        candidate.team == caster.team
    } else {
        candidate.team != caster.team
    }
}

/// Every selection the caster may legally make with this ability
pub fn selection_options(
    state: &CombatState,
    caster: ParticipantId,
    ability: &AbilityDef,
    data: &GameData,
) -> Vec<TargetSelection> {
    let Some(source) = state.get(caster) else {
        return Vec::new();
    };

    if matches!(ability.aoe_type, AoeType::AllAllies | AoeType::AllEnemies) || ability.targets_self_only() {
        return vec![TargetSelection::Automatic];
    }

    let Some(origin) = source.position else {
        return Vec::new();
    };

    match ability.aoe_type {
        AoeType::Line => GridCoord::all_cells()
            .filter(|cell| {
                *cell != origin && origin.is_aligned_with(cell) && origin.distance(cell) <= ability.range
            })
            .map(TargetSelection::Cell)
            .collect(),
        AoeType::Radius => GridCoord::all_cells()
            .filter(|cell| origin.distance(cell) <= ability.range)
            .map(TargetSelection::Cell)
            .collect(),
        _ => {
            let support = data.is_support(ability);
            state
                .participants
                .iter()
                .filter(|p| p.is_alive() && role_accepts(source, p, support))
                .filter(|p| p.position.is_some_and(|cell| origin.distance(&cell) <= ability.range))
                .map(|p| TargetSelection::Participant(p.id))
                .collect()
        }
    }
}

/// Cells an area ability covers for a given anchor cell
pub fn affected_cells(origin: GridCoord, ability: &AbilityDef, anchor: GridCoord) -> Vec<GridCoord> {
    match ability.aoe_type {
        AoeType::Line => origin.segment_to(&anchor),
        AoeType::Radius => anchor.cells_in_radius(ability.aoe_radius),
        _ => vec![anchor],
    }
}

/// Participants a selection touches, or `None` if the selection is illegal
pub fn affected_participants(
    state: &CombatState,
    caster: ParticipantId,
    ability: &AbilityDef,
    selection: TargetSelection,
    data: &GameData,
) -> Option<Vec<ParticipantId>> {
    if !selection_options(state, caster, ability, data).contains(&selection) {
        return None;
    }
    let source = state.get(caster)?;
    let support = data.is_support(ability);

    let affected = match (ability.aoe_type, selection) {
        (AoeType::AllAllies, _) => {
            let include_defeated = ability.has_revive();
            state
                .participants
                .iter()
                .filter(|p| p.team == source.team && (include_defeated || p.is_alive()))
                .map(|p| p.id)
                .collect()
        }
        (AoeType::AllEnemies, _) => state.living(source.team.opponent()).map(|p| p.id).collect(),
        (_, TargetSelection::Automatic) => vec![caster],
        (_, TargetSelection::Participant(target)) => vec![target],
        (_, TargetSelection::Cell(anchor)) => {
            let origin = source.position?;
            affected_cells(origin, ability, anchor)
                .into_iter()
                .filter_map(|cell| state.occupant_at(cell))
                .filter_map(|id| state.get(id))
                .filter(|p| role_accepts(source, p, support))
                .map(|p| p.id)
                .collect()
        }
    };

    Some(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::stats::Stats;
    use crate::battle::terrain::{TerrainGrid, TerrainKind};
    use crate::battle::turn_order::TurnOrder;
    use crate::core::types::Team;

    fn unit(id: u32, team: Team, archetype: Archetype, cell: GridCoord) -> Participant {
        let mut p = Participant::new(ParticipantId(id), format!("U{id}"), team, "warrior").with_stats(Stats {
            hp: 10,
            max_hp: 10,
            ..Stats::default()
        });
        p.archetype = archetype;
        p.place(cell, TerrainKind::Grassland);
        p
    }

    fn state_with(participants: Vec<Participant>) -> CombatState {
        let order = TurnOrder::new(&participants, &GameData::default());
        CombatState::new(participants, TerrainGrid::default(), order)
    }

    fn data() -> GameData {
        GameData::builtin().unwrap()
    }

    #[test]
    fn test_melee_reaches_adjacent_only() {
        let config = CombatConfig::default();
        let state = state_with(vec![
            unit(0, Team::SideA, Archetype::Melee, GridCoord::new(4, 4)),
            unit(1, Team::SideB, Archetype::Melee, GridCoord::new(3, 4)),
            unit(2, Team::SideB, Archetype::Melee, GridCoord::new(2, 4)),
            unit(3, Team::SideA, Archetype::Melee, GridCoord::new(4, 5)),
        ]);
        assert_eq!(attack_targets(&state, ParticipantId(0), &config), vec![ParticipantId(1)]);
    }

    #[test]
    fn test_ranged_reaches_three() {
        let config = CombatConfig::default();
        let state = state_with(vec![
            unit(0, Team::SideA, Archetype::Ranged, GridCoord::new(4, 4)),
            unit(1, Team::SideB, Archetype::Melee, GridCoord::new(2, 3)),
            unit(2, Team::SideB, Archetype::Melee, GridCoord::new(0, 4)),
        ]);
        assert_eq!(attack_targets(&state, ParticipantId(0), &config), vec![ParticipantId(1)]);
    }

    #[test]
    fn test_defeated_not_attackable() {
        let config = CombatConfig::default();
        let mut state = state_with(vec![
            unit(0, Team::SideA, Archetype::Melee, GridCoord::new(4, 4)),
            unit(1, Team::SideB, Archetype::Melee, GridCoord::new(3, 4)),
        ]);
        state.participants[1].current_stats.hp = 0;
        assert!(attack_targets(&state, ParticipantId(0), &config).is_empty());
    }

    #[test]
    fn test_damage_skill_selects_opponents_only() {
        let data = data();
        let state = state_with(vec![
            unit(0, Team::SideA, Archetype::Ranged, GridCoord::new(4, 4)),
            unit(1, Team::SideB, Archetype::Melee, GridCoord::new(3, 4)),
            unit(2, Team::SideA, Archetype::Melee, GridCoord::new(4, 5)),
        ]);
        let hex = data.skill("hex").unwrap();
        let options = selection_options(&state, ParticipantId(0), hex, &data);
        assert_eq!(options, vec![TargetSelection::Participant(ParticipantId(1))]);
    }

    #[test]
    fn test_heal_selects_allies_and_self() {
        let data = data();
        let state = state_with(vec![
            unit(0, Team::SideA, Archetype::Melee, GridCoord::new(4, 4)),
            unit(1, Team::SideB, Archetype::Melee, GridCoord::new(3, 4)),
            unit(2, Team::SideA, Archetype::Melee, GridCoord::new(4, 5)),
        ]);
        let heal = data.skill("heal").unwrap();
        let options = selection_options(&state, ParticipantId(0), heal, &data);
        assert_eq!(
            options,
            vec![
                TargetSelection::Participant(ParticipantId(0)),
                TargetSelection::Participant(ParticipantId(2)),
            ]
        );
    }

    #[test]
    fn test_self_only_skill() {
        let data = data();
        let state = state_with(vec![unit(0, Team::SideA, Archetype::Melee, GridCoord::new(4, 4))]);
        let guard = data.skill("guard").unwrap();
        assert_eq!(
            affected_participants(&state, ParticipantId(0), guard, TargetSelection::Automatic, &data),
            Some(vec![ParticipantId(0)])
        );
        assert_eq!(
            affected_participants(
                &state,
                ParticipantId(0),
                guard,
                TargetSelection::Participant(ParticipantId(0)),
                &data
            ),
            None
        );
    }

    #[test]
    fn test_all_enemies_ignores_range() {
        let data = data();
        let state = state_with(vec![
            unit(0, Team::SideA, Archetype::Ranged, GridCoord::new(7, 0)),
            unit(1, Team::SideB, Archetype::Melee, GridCoord::new(0, 7)),
            unit(2, Team::SideB, Archetype::Melee, GridCoord::new(0, 6)),
        ]);
        let volley = data.skill("volley").unwrap();
        let hit =
            affected_participants(&state, ParticipantId(0), volley, TargetSelection::Automatic, &data).unwrap();
        assert_eq!(hit, vec![ParticipantId(1), ParticipantId(2)]);
    }

    #[test]
    fn test_all_allies_includes_defeated_only_for_revive() {
        let data = data();
        let mut state = state_with(vec![
            unit(0, Team::SideA, Archetype::Melee, GridCoord::new(7, 0)),
            unit(1, Team::SideA, Archetype::Melee, GridCoord::new(7, 1)),
            unit(2, Team::SideB, Archetype::Melee, GridCoord::new(0, 0)),
        ]);
        state.participants[1].current_stats.hp = 0;
        state.participants[1].remove_from_board();

        let war_cry = data.skill("war_cry").unwrap();
        let buffed =
            affected_participants(&state, ParticipantId(0), war_cry, TargetSelection::Automatic, &data).unwrap();
        assert_eq!(buffed, vec![ParticipantId(0)]);

        let resurrection = data.skill("resurrection").unwrap();
        let revived =
            affected_participants(&state, ParticipantId(0), resurrection, TargetSelection::Automatic, &data)
                .unwrap();
        assert_eq!(revived, vec![ParticipantId(0), ParticipantId(1)]);
    }

    #[test]
    fn test_line_hits_opponents_on_segment() {
        let data = data();
        let state = state_with(vec![
            unit(0, Team::SideA, Archetype::Ranged, GridCoord::new(6, 3)),
            unit(1, Team::SideA, Archetype::Melee, GridCoord::new(5, 3)),
            unit(2, Team::SideB, Archetype::Melee, GridCoord::new(4, 3)),
            unit(3, Team::SideB, Archetype::Melee, GridCoord::new(2, 3)),
            unit(4, Team::SideB, Archetype::Melee, GridCoord::new(3, 4)),
        ]);
        let lance = data.skill("ice_lance").unwrap();
        let hit = affected_participants(
            &state,
            ParticipantId(0),
            lance,
            TargetSelection::Cell(GridCoord::new(3, 3)),
            &data,
        )
        .unwrap();
        // Ally on the line is spared, enemy past the anchor is not reached
        assert_eq!(hit, vec![ParticipantId(2)]);
    }

    #[test]
    fn test_line_requires_alignment() {
        let data = data();
        let state = state_with(vec![unit(0, Team::SideA, Archetype::Ranged, GridCoord::new(6, 3))]);
        let lance = data.skill("ice_lance").unwrap();
        let options = selection_options(&state, ParticipantId(0), lance, &data);
        assert!(!options.contains(&TargetSelection::Cell(GridCoord::new(5, 4))));
        assert!(options.contains(&TargetSelection::Cell(GridCoord::new(2, 3))));
        assert!(!options.contains(&TargetSelection::Cell(GridCoord::new(1, 3))));
    }

    #[test]
    fn test_radius_footprint() {
        let data = data();
        let state = state_with(vec![
            unit(0, Team::SideA, Archetype::Ranged, GridCoord::new(6, 3)),
            unit(1, Team::SideB, Archetype::Melee, GridCoord::new(4, 3)),
            unit(2, Team::SideB, Archetype::Melee, GridCoord::new(4, 4)),
            unit(3, Team::SideB, Archetype::Melee, GridCoord::new(3, 4)),
        ]);
        let fireball = data.skill("fireball").unwrap();
        let hit = affected_participants(
            &state,
            ParticipantId(0),
            fireball,
            TargetSelection::Cell(GridCoord::new(4, 3)),
            &data,
        )
        .unwrap();
        assert_eq!(hit.len(), 2);
        assert!(hit.contains(&ParticipantId(1)));
        assert!(hit.contains(&ParticipantId(2)));
    }

    #[test]
    fn test_out_of_range_anchor_rejected() {
        let data = data();
        let state = state_with(vec![unit(0, Team::SideA, Archetype::Ranged, GridCoord::new(7, 0))]);
        let fireball = data.skill("fireball").unwrap();
        assert!(affected_participants(
            &state,
            ParticipantId(0),
            fireball,
            TargetSelection::Cell(GridCoord::new(0, 7)),
            &data
        )
        .is_none());
    }
}

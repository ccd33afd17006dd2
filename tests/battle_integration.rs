//! Battle system integration tests

use grid_tactics::battle::*;
use grid_tactics::core::config::CombatConfig;
use grid_tactics::core::error::TacticsError;
use grid_tactics::core::types::{ParticipantId, Team};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn party() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("p1", "Aria", "warrior", 3)
            .with_equipment(EquipSlot::Weapon, "iron_sword")
            .with_skill("power_strike", 2),
        RosterEntry::new("p2", "Cyra", "archer", 3).with_skill("poison_arrow", 1),
        RosterEntry::new("p3", "Dane", "cleric", 3).with_skill("heal", 1),
    ]
}

fn new_engine(stage: u32, seed: u64, auto_allies: bool) -> CombatEngine<ChaCha8Rng> {
    let setup = BattleSetup {
        roster: party(),
        stage,
        auto_allies,
        ..BattleSetup::default()
    };
    CombatEngine::new(
        setup,
        GameData::builtin().unwrap(),
        CombatConfig::default(),
        ChaCha8Rng::seed_from_u64(seed),
    )
    .unwrap()
}

fn fighter(id: u32, team: Team, class: &str, cell: GridCoord, hp: i32) -> Participant {
    let mut p = Participant::new(ParticipantId(id), format!("{class} {id}"), team, class).with_stats(Stats {
        hp,
        max_hp: hp,
        mana: 60,
        max_mana: 60,
        atk: 20,
        mag: 20,
        def: 0,
        res: 0,
        spd: 10,
        eva: 0,
        crit: 0,
    });
    p.place(cell, TerrainKind::Grassland);
    p
}

fn engine_from(participants: Vec<Participant>) -> CombatEngine<ChaCha8Rng> {
    let data = GameData::builtin().unwrap();
    let order = TurnOrder::new(&participants, &data);
    let state = CombatState::new(participants, TerrainGrid::default(), order);
    CombatEngine::from_state(state, data, CombatConfig::default(), ChaCha8Rng::seed_from_u64(1))
}

#[test]
fn test_auto_battle_runs_to_resolution() {
    let mut engine = new_engine(2, 42, true);
    let result = engine.run_to_completion();

    assert!(engine.is_over());
    assert_eq!(engine.result(), Some(result));
    assert!(result.turns_elapsed >= 1);
    assert!(result.turns_elapsed <= engine.config().max_turns + 1);

    let events = engine.drain_events();
    assert!(matches!(
        events.last().map(|e| &e.kind),
        Some(CombatEventKind::BattleEnded { .. })
    ));
}

#[test]
fn test_same_seed_replays_identically() {
    let run = |seed| {
        let mut engine = new_engine(5, seed, true);
        let result = engine.run_to_completion();
        (result, engine.drain_events())
    };
    let (first_result, first_events) = run(1234);
    let (second_result, second_events) = run(1234);
    assert_eq!(first_result, second_result);
    assert_eq!(first_events, second_events);
}

#[test]
fn test_boss_stage_has_single_boss() {
    let engine = new_engine(10, 9, true);
    let enemies: Vec<_> = engine.state().living(Team::SideB).collect();
    assert_eq!(enemies.len(), 1);
    assert!(enemies[0].is_boss);
    assert_eq!(enemies[0].class_id, "dragon");
}

#[test]
fn test_unknown_class_fails_construction() {
    let setup = BattleSetup {
        roster: vec![RosterEntry::new("x", "Nyx", "necromancer", 1)],
        stage: 1,
        ..BattleSetup::default()
    };
    let result = CombatEngine::new(
        setup,
        GameData::builtin().unwrap(),
        CombatConfig::default(),
        ChaCha8Rng::seed_from_u64(1),
    );
    assert!(matches!(result, Err(TacticsError::InvalidClassData(_))));
}

#[test]
fn test_oversized_roster_fails_construction() {
    let roster = (0..20)
        .map(|i| RosterEntry::new(format!("r{i}"), format!("Unit {i}"), "warrior", 1))
        .collect();
    let setup = BattleSetup {
        roster,
        stage: 1,
        ..BattleSetup::default()
    };
    let result = CombatEngine::new(
        setup,
        GameData::builtin().unwrap(),
        CombatConfig::default(),
        ChaCha8Rng::seed_from_u64(1),
    );
    assert!(matches!(
        result,
        Err(TacticsError::RosterTooLarge { team: Team::SideA, count: 20, .. })
    ));
}

#[test]
fn test_player_driven_battle() {
    let mut engine = new_engine(1, 77, false);

    // Player side: walk toward the enemy, hit when possible, otherwise wait
    for _ in 0..2000 {
        let Some(actor) = engine.run_until_player_input() else {
            break;
        };

        let before = engine.state().get(actor).unwrap().position;
        if let Some(cell) = engine.reachable_cells(actor).into_iter().min_by_key(|c| c.row) {
            assert!(engine.move_to(actor, cell).is_applied());
            assert_ne!(engine.state().get(actor).unwrap().position, before);
        }

        let outcome = match engine.attack_targets(actor).first() {
            Some(&target) => engine.attack(actor, target),
            None => engine.wait(actor),
        };
        assert!(outcome.is_applied());
    }

    assert!(engine.is_over());
}

#[test]
fn test_defeated_never_occupy_cells() {
    let mut engine = new_engine(4, 5, true);
    while !engine.is_over() {
        assert!(engine.step_ai());
        for p in &engine.state().participants {
            assert_eq!(p.is_on_board(), p.is_alive(), "{} breaks board invariant", p.name);
        }
    }
}

#[test]
fn test_side_b_wiped_same_update_victory() {
    let mut warrior = fighter(0, Team::SideA, "warrior", GridCoord::new(4, 4), 100);
    warrior.current_stats.spd = 20;
    warrior.base_stats.spd = 20;
    let mut engine = engine_from(vec![
        warrior,
        fighter(1, Team::SideB, "goblin", GridCoord::new(3, 4), 10),
    ]);
    assert_eq!(engine.current_actor(), Some(ParticipantId(0)));

    assert!(engine.attack(ParticipantId(0), ParticipantId(1)).is_applied());
    assert!(engine.is_over());
    assert!(engine.result().unwrap().victory);
    assert!(engine.current_actor().is_none());
    assert_eq!(engine.phase(), TurnPhase::Resolved { victory: true });
}

#[test]
fn test_side_a_wiped_same_update_defeat() {
    let mut goblin = fighter(1, Team::SideB, "goblin", GridCoord::new(3, 4), 100);
    goblin.current_stats.spd = 20;
    goblin.base_stats.spd = 20;
    let mut engine = engine_from(vec![
        fighter(0, Team::SideA, "warrior", GridCoord::new(4, 4), 10),
        goblin,
    ]);

    assert!(engine.step_ai());
    assert!(engine.is_over());
    assert!(!engine.result().unwrap().victory);
    assert_eq!(engine.phase(), TurnPhase::Resolved { victory: false });
}

#[test]
fn test_fireball_hits_radius() {
    let mut mage = fighter(0, Team::SideA, "mage", GridCoord::new(6, 3), 100);
    mage.archetype = Archetype::Ranged;
    mage.current_stats.spd = 50;
    mage.base_stats.spd = 50;
    mage.equipped_skills.push("fireball".into());
    let mut engine = engine_from(vec![
        mage,
        fighter(1, Team::SideB, "goblin", GridCoord::new(4, 3), 500),
        fighter(2, Team::SideB, "goblin", GridCoord::new(4, 4), 500),
        fighter(3, Team::SideB, "goblin", GridCoord::new(2, 3), 500),
        fighter(4, Team::SideA, "warrior", GridCoord::new(5, 3), 100),
    ]);
    assert_eq!(engine.current_actor(), Some(ParticipantId(0)));

    let outcome = engine.use_skill(ParticipantId(0), "fireball", TargetSelection::Cell(GridCoord::new(4, 3)));
    assert!(outcome.is_applied());

    let hp = |id| engine.state().get(ParticipantId(id)).unwrap().current_stats.hp;
    assert!(hp(1) < 500);
    assert!(hp(2) < 500);
    assert_eq!(hp(3), 500);
    // Allies inside the footprint are spared
    assert_eq!(hp(4), 100);
}

#[test]
fn test_resurrection_brings_back_fallen_ally() {
    let mut cleric = fighter(0, Team::SideA, "cleric", GridCoord::new(6, 3), 100);
    cleric.current_stats.spd = 50;
    cleric.base_stats.spd = 50;
    cleric.equipped_skills.push("resurrection".into());
    let mut fallen = fighter(1, Team::SideA, "warrior", GridCoord::new(6, 4), 80);
    fallen.current_stats.hp = 0;
    fallen.remove_from_board();

    let mut engine = engine_from(vec![
        cleric,
        fallen,
        fighter(2, Team::SideB, "goblin", GridCoord::new(0, 0), 50),
    ]);

    assert!(engine
        .use_skill(ParticipantId(0), "resurrection", TargetSelection::Automatic)
        .is_applied());

    let revived = engine.state().get(ParticipantId(1)).unwrap();
    assert_eq!(revived.current_stats.hp, 40);
    let cell = revived.position.unwrap();
    assert_eq!(cell.distance(&GridCoord::new(6, 3)), 1);
    assert!(engine
        .drain_events()
        .iter()
        .any(|e| matches!(e.kind, CombatEventKind::Revived { target: ParticipantId(1), .. })));
}

#[test]
fn test_custom_config_and_data_from_toml() {
    let config = CombatConfig::from_toml_str(
        r#"
        movement_budget = 5
        max_turns = 50

        [encounter]
        boss_interval = 0
        enemy_classes = ["goblin"]
        "#,
    )
    .unwrap();
    assert_eq!(config.movement_budget, 5);
    assert_eq!(config.defense_factor, 1.5);

    let data = GameData::from_toml_str(
        r#"
        [classes.goblin]
        name = "Goblin"
        base = { hp = 30, atk = 8, def = 2, spd = 12 }

        [classes.warrior]
        name = "Warrior"
        base = { hp = 100, atk = 20, def = 10, spd = 10 }
        "#,
    )
    .unwrap();

    let setup = BattleSetup {
        roster: vec![RosterEntry::new("p1", "Aria", "warrior", 1)],
        stage: 10,
        auto_allies: true,
        ..BattleSetup::default()
    };
    let mut engine = CombatEngine::new(setup, data, config, ChaCha8Rng::seed_from_u64(3)).unwrap();

    // Bosses disabled: stage 10 draws regular goblins
    assert!(engine.state().living(Team::SideB).all(|p| p.class_id == "goblin" && !p.is_boss));
    let result = engine.run_to_completion();
    assert!(result.turns_elapsed <= 51);
}

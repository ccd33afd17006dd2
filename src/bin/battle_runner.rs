//! Headless Battle Runner
//!
//! Runs an auto-battle from a seed and prints the result as JSON or text.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use grid_tactics::battle::{
    BattleSetup, CombatEngine, CombatEvent, CombatEventKind, EquipSlot, GameData, RosterEntry,
};
use grid_tactics::core::config::CombatConfig;
use grid_tactics::core::error::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Battle Runner - auto-battles for balancing and regression checks
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run an AI vs AI battle on the 8x8 grid and print the outcome")]
struct Args {
    /// Stage number (drives enemy count, level and boss stages)
    #[arg(long, default_value_t = 1)]
    stage: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Roster file (TOML list of `[[members]]`); a default party is used otherwise
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Game data file; the bundled tables are used otherwise
    #[arg(long)]
    data: Option<PathBuf>,

    /// Combat config file; defaults are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every combat event
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    seed: u64,
    stage: u32,
    victory: bool,
    turns_elapsed: u32,
    surviving_ally_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<CombatEvent>,
}

#[derive(serde::Deserialize)]
struct RosterFile {
    members: Vec<RosterEntry>,
}

fn default_party() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("p1", "Aria", "warrior", 3)
            .with_equipment(EquipSlot::Weapon, "iron_sword")
            .with_skill("power_strike", 2),
        RosterEntry::new("p2", "Bram", "knight", 3)
            .with_equipment(EquipSlot::Armor, "plate_armor")
            .with_skill("shield_bash", 1),
        RosterEntry::new("p3", "Cyra", "archer", 3)
            .with_equipment(EquipSlot::Weapon, "long_bow")
            .with_skill("poison_arrow", 1),
        RosterEntry::new("p4", "Dane", "cleric", 3)
            .with_equipment(EquipSlot::Weapon, "oak_staff")
            .with_skill("heal", 1),
    ]
}

fn run(args: &Args, seed: u64) -> Result<RunReport> {
    let data = match &args.data {
        Some(path) => GameData::load(path)?,
        None => GameData::builtin()?,
    };
    let config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    let roster = match &args.roster {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<RosterFile>(&content)?.members
        }
        None => default_party(),
    };

    let setup = BattleSetup {
        roster,
        stage: args.stage,
        auto_allies: true,
        ..BattleSetup::default()
    };

    let mut engine = CombatEngine::new(setup, data, config, ChaCha8Rng::seed_from_u64(seed))?;
    let result = engine.run_to_completion();
    let events = if args.verbose { engine.drain_events() } else { Vec::new() };

    Ok(RunReport {
        seed,
        stage: args.stage,
        victory: result.victory,
        turns_elapsed: result.turns_elapsed,
        surviving_ally_count: result.surviving_ally_count,
        events,
    })
}

fn print_text(report: &RunReport) {
    for event in &report.events {
        match &event.kind {
            CombatEventKind::TurnStarted { actor } => println!("[turn {}] participant {} acts", event.turn, actor.0),
            kind => println!("  {:?}", kind),
        }
    }
    println!("=== Battle Finished ===");
    println!("Seed: {}  Stage: {}", report.seed, report.stage);
    println!("Outcome: {}", if report.victory { "victory" } else { "defeat" });
    println!("Turns: {}", report.turns_elapsed);
    println!("Survivors: {}", report.surviving_ally_count);
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "grid_tactics=debug" } else { "grid_tactics=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);

    let report = match run(&args, seed) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.format.as_str() {
        "text" => print_text(&report),
        _ => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

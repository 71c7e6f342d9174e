#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that climbs a Samurai Tower with the built-in autopilot.

mod autopilot;
mod config;
mod narration;

use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use samurai_tower_core::TowerDefinition;
use samurai_tower_system_campaign::{Game, Profile, Tower};
use samurai_tower_system_level::Level;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::{autopilot::Autopilot, config::CliConfig};

/// Towers shipped with the binary, selectable by name with `--tower`.
const BUNDLED_TOWERS: [(&str, &str); 2] = [
    ("beginner", include_str!("../towers/beginner.json")),
    ("intermediate", include_str!("../towers/intermediate.json")),
];

/// Tower climbed when `--tower` is not given.
const DEFAULT_TOWER: &str = "beginner";

#[derive(Debug, Parser)]
#[command(
    name = "samurai-tower",
    about = "Climb a Samurai Tower with the built-in autopilot"
)]
struct Cli {
    /// TOML configuration file; defaults to `samurai-tower.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Bundled tower name or path to a tower definition in JSON; defaults to
    /// the bundled beginner tower.
    #[arg(long)]
    tower: Option<PathBuf>,
    /// Overrides the configured tick cap per level.
    #[arg(long)]
    max_turns: Option<u32>,
    /// Skips drawing the floor.
    #[arg(long)]
    no_floor: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Climbs the tower from the first level until a level is not passed,
    /// or practises a single level.
    Play {
        /// Level to practise, with every earlier level's abilities unlocked.
        #[arg(long)]
        level: Option<u32>,
    },
    /// Replays the whole tower with every ability and grades each level.
    Epic,
    /// Prints a level's description and starting floor.
    Show {
        /// Level to show.
        #[arg(long)]
        level: u32,
    },
}

/// Entry point for the Samurai Tower command-line interface.
fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()) {
        error!(error = %err, "run failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(max_turns) = cli.max_turns {
        config.max_turns = max_turns;
    }
    if cli.no_floor {
        config.print_floor = false;
    }
    let tower = load_tower(cli.tower.as_deref())?;

    match cli.command {
        Command::Play { level } => match level {
            Some(number) => practise(tower, &config, number),
            None => climb(tower, &config),
        },
        Command::Epic => epic(tower, &config),
        Command::Show { level } => show(&tower, level),
    }
}

/// Contents of the bundled tower called `name`.
fn bundled_tower(name: &str) -> Option<&'static str> {
    BUNDLED_TOWERS
        .iter()
        .find(|(bundled, _)| *bundled == name)
        .map(|(_, contents)| *contents)
}

/// Loads a bundled tower by name, otherwise reads `path` as a JSON file.
fn load_tower(path: Option<&Path>) -> Result<Tower> {
    let Some(path) = path else {
        let contents = bundled_tower(DEFAULT_TOWER).context("default tower is not bundled")?;
        return parse_tower(contents);
    };
    if let Some(contents) = path.to_str().and_then(bundled_tower) {
        return parse_tower(contents);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tower at {}", path.display()))?;
    parse_tower(&contents).with_context(|| format!("invalid tower in {}", path.display()))
}

fn parse_tower(contents: &str) -> Result<Tower> {
    let definition: TowerDefinition =
        serde_json::from_str(contents).context("failed to parse tower definition json")?;
    if definition.levels.is_empty() {
        bail!("tower `{}` has no levels", definition.name);
    }
    Ok(Tower::from(definition))
}

fn new_game(tower: Tower, config: &CliConfig) -> Game {
    let profile = Profile::new(config.player_name.as_str(), tower.name());
    Game::new(tower, profile).with_max_turns(config.max_turns)
}

fn climb(tower: Tower, config: &CliConfig) -> Result<()> {
    let mut game = new_game(tower, config);
    game.start()?;
    loop {
        let number = game.profile().level_number();
        let mut level = game.play_level(&mut Autopilot::default())?;
        report(number, &mut level, config)?;
        if !level.is_passed() {
            let name = &config.player_name;
            println!("{name} did not make it past level {number}.");
            break;
        }
        if !game.advance_level() {
            println!(
                "{} climbed the {} tower with {} points.",
                config.player_name,
                game.tower().name(),
                game.profile().score()
            );
            break;
        }
    }
    Ok(())
}

fn practise(tower: Tower, config: &CliConfig, number: u32) -> Result<()> {
    if !tower.has_level(number) {
        bail!("no level {number} in the {} tower", tower.name());
    }
    let mut game = new_game(tower, config);
    unlock_levels_before(&mut game, number);
    game.profile_mut().set_level_number(number);

    let mut level = game.play_level(&mut Autopilot::default())?;
    report(number, &mut level, config)
}

fn epic(tower: Tower, config: &CliConfig) -> Result<()> {
    let mut game = new_game(tower, config);
    let top = game.tower().len();
    unlock_levels_before(&mut game, top.saturating_add(1));
    game.profile_mut().set_level_number(top);

    let report = game.play_epic(&mut Autopilot::default())?;
    for (number, result) in &report.results {
        let outcome = if result.passed {
            "passed"
        } else {
            "not passed"
        };
        println!("Level {number}: {outcome} ({} points)", result.total_score);
    }
    match report.final_report() {
        Some(summary) if report.completed => print!("\n{summary}"),
        _ => println!(
            "\nThe epic run ended early with {} points.",
            report.total_score
        ),
    }
    Ok(())
}

fn show(tower: &Tower, number: u32) -> Result<()> {
    let definition = tower
        .level(number)
        .with_context(|| format!("no level {number} in the {} tower", tower.name()))?
        .clone();
    println!("Level {number}");
    println!("{}", definition.description);
    println!("Tip: {}", definition.tip);
    let level = Level::setup(definition, &[])?;
    print!("{}", level.floor().render());
    Ok(())
}

/// Grants the abilities every level below `number` unlocks.
fn unlock_levels_before(game: &mut Game, number: u32) {
    let unlocked: Vec<_> = (1..number)
        .filter_map(|earlier| game.tower().level(earlier))
        .flat_map(|level| level.samurai.abilities.iter().copied())
        .collect();
    game.profile_mut().add_abilities(&unlocked);
}

fn report(number: u32, level: &mut Level, config: &CliConfig) -> Result<()> {
    println!("Level {number}");
    println!("{}", level.definition().description);
    let log = level.drain_log();
    for entry in &log {
        println!("  {}", narration::narrate(level.floor(), entry));
    }
    if config.print_floor {
        print!("{}", level.floor().render());
    }
    let result =
        serde_json::to_string_pretty(&level.result()).context("failed to serialise level result")?;
    println!("{result}");
    Ok(())
}

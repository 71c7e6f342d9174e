use samurai_tower_core::{AbilityName, LevelDefinition, LogEvent};
use samurai_tower_system_level::Level;
use samurai_tower_world::{Player, PlayerError, Turn};

const FIRST_LEVEL: &str = r#"{
    "description": "You see before yourself a long hallway with stairs at the end.",
    "tip": "Call walk! to move forward.",
    "time_bonus": 15,
    "ace_score": 10,
    "size": { "width": 8, "height": 1 },
    "stairs": { "x": 7, "y": 0 },
    "samurai": { "x": 0, "y": 0, "facing": "east", "abilities": ["walk!"] }
}"#;

const SECOND_LEVEL: &str = r#"{
    "description": "It is too dark to see anything, but you smell sludge nearby.",
    "tip": "Use feel to see if something is in front of you.",
    "time_bonus": 20,
    "ace_score": 26,
    "size": { "width": 8, "height": 1 },
    "stairs": { "x": 7, "y": 0 },
    "samurai": { "x": 0, "y": 0, "facing": "east", "abilities": ["feel", "attack!"] },
    "units": [{ "kind": "sludge", "x": 4, "y": 0, "facing": "west" }]
}"#;

/// Walks forward, attacking whatever blocks the way.
struct Hallway;

impl Player for Hallway {
    fn play_turn(&mut self, turn: &mut Turn<'_>) -> Result<(), PlayerError> {
        if turn.has_sense("feel") {
            let ahead = turn.do_sense("feel", &[])?;
            if ahead.space().is_some_and(|space| space.is_enemy()) {
                turn.do_action("attack!", &[])?;
                return Ok(());
            }
        }
        turn.do_action("walk!", &[])?;
        Ok(())
    }
}

fn parse(json: &str) -> LevelDefinition {
    serde_json::from_str(json).expect("level definition parses")
}

#[test]
fn first_level_aces_by_walking() {
    let mut level = Level::setup(parse(FIRST_LEVEL), &[]).expect("setup");

    let result = level.play(&mut Hallway, 1000).expect("played");

    assert!(result.passed);
    assert_eq!(result.turns, 7);
    assert_eq!(result.warrior_score, 0);
    assert_eq!(result.time_bonus, 8);
    assert_eq!(result.clear_bonus, 2);
    assert_eq!(result.total_score, 10);
    assert_eq!(result.grade_letter, Some('S'));
}

#[test]
fn second_level_aces_by_fighting_through() {
    let mut level = Level::setup(parse(SECOND_LEVEL), &[AbilityName::Walk]).expect("setup");

    let result = level.play(&mut Hallway, 1000).expect("played");

    assert!(result.passed);
    assert_eq!(result.turns, 10);
    assert_eq!(result.warrior_score, 12);
    assert_eq!(result.time_bonus, 10);
    assert_eq!(result.clear_bonus, 4);
    assert_eq!(result.total_score, 26);
    assert_eq!(level.samurai().expect("samurai").health(), 14);
}

#[test]
fn log_narrates_the_fight() {
    let mut level = Level::setup(parse(SECOND_LEVEL), &[AbilityName::Walk]).expect("setup");
    let _ = level.play(&mut Hallway, 1000).expect("played");

    let log = level.drain_log();
    let deaths = log
        .iter()
        .filter(|entry| entry.event == LogEvent::Died)
        .count();
    assert_eq!(deaths, 1);
    assert!(log
        .iter()
        .any(|entry| entry.event == LogEvent::EarnedPoints { points: 12 }));
    assert!(level.drain_log().is_empty());
}

#[test]
fn render_tracks_the_samurai() {
    let mut level = Level::setup(parse(FIRST_LEVEL), &[]).expect("setup");
    assert_eq!(level.floor().render(), " --------\n|@      >|\n --------\n");

    let _ = level.step(&mut Hallway).expect("tick");
    let _ = level.step(&mut Hallway).expect("tick");

    assert_eq!(level.floor().render(), " --------\n|  @    >|\n --------\n");
}

#[test]
fn turn_cap_stops_an_unfinished_run() {
    let mut level = Level::setup(parse(FIRST_LEVEL), &[]).expect("setup");

    let result = level.play(&mut Hallway, 3).expect("played");

    assert!(!result.passed);
    assert!(!result.failed);
    assert_eq!(result.turns, 3);
    assert_eq!(result.total_score, 0);
}

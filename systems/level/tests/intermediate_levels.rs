use samurai_tower_core::{AbilityName, LevelDefinition, LogEvent, RelativeDirection};
use samurai_tower_system_level::Level;
use samurai_tower_world::{Player, PlayerError, Space, Turn};

const TICKING_LEVEL: &str = r#"{
    "description": "What is that ticking? Some captives have a timed bomb at their feet!",
    "tip": "Hurry and rescue the captives that are ticking first, they will soon go off.",
    "time_bonus": 50,
    "ace_score": 108,
    "size": { "width": 6, "height": 2 },
    "stairs": { "x": 5, "y": 0 },
    "samurai": { "x": 0, "y": 1, "facing": "east", "abilities": [] },
    "units": [
        { "kind": "sludge", "x": 1, "y": 0, "facing": "west" },
        { "kind": "sludge", "x": 3, "y": 1, "facing": "west" },
        { "kind": "captive", "x": 0, "y": 0, "facing": "west" },
        {
            "kind": "captive",
            "x": 4,
            "y": 1,
            "facing": "west",
            "abilities": ["explode!"],
            "ability_config": { "explode!": { "time": 7 } }
        }
    ]
}"#;

/// Abilities the first five intermediate levels unlock.
const UNLOCKED: [AbilityName; 10] = [
    AbilityName::Walk,
    AbilityName::Feel,
    AbilityName::DirectionOfStairs,
    AbilityName::Attack,
    AbilityName::Health,
    AbilityName::Rest,
    AbilityName::Rescue,
    AbilityName::Bind,
    AbilityName::Listen,
    AbilityName::DirectionOf,
];

const SCAN: [RelativeDirection; 4] = [
    RelativeDirection::Forward,
    RelativeDirection::Left,
    RelativeDirection::Right,
    RelativeDirection::Backward,
];

/// Heads for ticking captives first, then clears whatever else it hears,
/// rests and takes the stairs.
struct BombSquad;

impl Player for BombSquad {
    fn play_turn(&mut self, turn: &mut Turn<'_>) -> Result<(), PlayerError> {
        let health = turn.do_sense("health", &[])?.health().unwrap_or_default();
        let heard = turn.do_sense("listen", &[])?.spaces();
        for direction in SCAN {
            let space = feel(turn, direction)?;
            if space.is_captive() && space.is_ticking() {
                return act(turn, "rescue!", direction);
            }
        }

        let ticking = heard
            .iter()
            .find(|space| space.is_captive() && space.is_ticking());
        if let Some(ticking) = ticking {
            let direction = direction_of(turn, *ticking)?;
            if feel(turn, direction)?.is_enemy() {
                return act(turn, "attack!", direction);
            }
            return act(turn, "walk!", direction);
        }

        for direction in SCAN {
            let space = feel(turn, direction)?;
            if space.is_enemy() {
                return act(turn, "attack!", direction);
            }
            if space.is_captive() {
                return act(turn, "rescue!", direction);
            }
        }
        if let Some(unit) = heard.first() {
            let direction = direction_of(turn, *unit)?;
            return act(turn, "walk!", direction);
        }
        if health < 15 {
            turn.do_action("rest!", &[])?;
            return Ok(());
        }
        let stairs = turn.do_sense("direction_of_stairs", &[])?.direction();
        act(turn, "walk!", stairs.unwrap_or(RelativeDirection::Forward))
    }
}

/// Never does anything.
struct Idle;

impl Player for Idle {
    fn play_turn(&mut self, _turn: &mut Turn<'_>) -> Result<(), PlayerError> {
        Ok(())
    }
}

fn feel<'f>(turn: &Turn<'f>, direction: RelativeDirection) -> Result<Space<'f>, PlayerError> {
    let sensed = turn.do_sense("feel", &[direction.into()])?;
    sensed
        .space()
        .ok_or_else(|| PlayerError::Failed("feel returned no space".to_owned()))
}

fn direction_of(turn: &Turn<'_>, space: Space<'_>) -> Result<RelativeDirection, PlayerError> {
    let sensed = turn.do_sense("direction_of", &[space.into()])?;
    sensed
        .direction()
        .ok_or_else(|| PlayerError::Failed("direction_of returned no direction".to_owned()))
}

fn act(turn: &mut Turn<'_>, key: &str, direction: RelativeDirection) -> Result<(), PlayerError> {
    turn.do_action(key, &[direction.into()])?;
    Ok(())
}

fn parse(json: &str) -> LevelDefinition {
    serde_json::from_str(json).expect("level definition parses")
}

#[test]
fn ticking_captive_is_rescued_before_it_explodes() {
    let mut level = Level::setup(parse(TICKING_LEVEL), &UNLOCKED).expect("setup");

    let result = level.play(&mut BombSquad, 1000).expect("played");

    assert!(result.passed);
    assert_eq!(result.turns, 23);
    assert_eq!(result.warrior_score, 64);
    assert_eq!(result.time_bonus, 27);
    assert_eq!(result.clear_bonus, 18);
    assert_eq!(result.total_score, 109);
    assert_eq!(result.grade_letter, Some('S'));
    assert_eq!(level.samurai().expect("samurai").health(), 16);
}

#[test]
fn log_records_both_rescues_and_no_explosion() {
    let mut level = Level::setup(parse(TICKING_LEVEL), &UNLOCKED).expect("setup");
    let _ = level.play(&mut BombSquad, 1000).expect("played");

    let log = level.drain_log();
    let count = |key: &str| log.iter().filter(|entry| entry.event.key() == key).count();
    assert_eq!(count("rescue"), 2);
    assert_eq!(count("death"), 2);
    assert_eq!(count("explode"), 0);
    assert_eq!(count("attack_miss"), 1);
    assert!(log
        .iter()
        .any(|entry| entry.event == LogEvent::Ticking { remaining: 1 }));
}

#[test]
fn unattended_bomb_takes_the_samurai_with_it() {
    let mut level = Level::setup(parse(TICKING_LEVEL), &UNLOCKED).expect("setup");

    let result = level.play(&mut Idle, 1000).expect("played");

    assert!(result.failed);
    assert!(!result.passed);
    assert_eq!(result.turns, 7);
    assert_eq!(result.total_score, 0);
    let log = level.drain_log();
    assert!(log.iter().any(|entry| entry.event == LogEvent::Exploded));
}

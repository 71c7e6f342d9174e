//! Heuristic player used when no learner code is attached.

use samurai_tower_core::RelativeDirection;
use samurai_tower_world::{Player, PlayerError, Space, Turn};

const SCAN: [RelativeDirection; 4] = [
    RelativeDirection::Forward,
    RelativeDirection::Left,
    RelativeDirection::Right,
    RelativeDirection::Backward,
];

/// Health below which the autopilot rests when nothing is hurting it.
const REST_BELOW: i32 = 15;

/// Plays with whatever abilities the samurai has unlocked.
///
/// Priorities, highest first: rescue adjacent captives, fight adjacent
/// enemies, shoot enemies in sight, rest when safe and hurt, walk toward
/// heard captives and enemies, explore behind once, then head for the stairs.
/// Ticking captives are approached before anything else that can be heard.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    last_health: Option<i32>,
    checked_behind: bool,
}

impl Player for Autopilot {
    fn play_turn(&mut self, turn: &mut Turn<'_>) -> Result<(), PlayerError> {
        let health = if turn.has_sense("health") {
            turn.do_sense("health", &[])?.health()
        } else {
            None
        };
        let taking_damage = matches!(
            (health, self.last_health),
            (Some(now), Some(before)) if now < before
        );
        self.last_health = health;

        if turn.has_sense("feel") {
            for direction in SCAN {
                let space = feel(turn, direction)?;
                if space.is_captive() && turn.has_action("rescue!") {
                    return act(turn, "rescue!", direction);
                }
                if space.is_enemy() && turn.has_action("attack!") {
                    if direction == RelativeDirection::Backward && turn.has_action("pivot!") {
                        self.checked_behind = true;
                        return act(turn, "pivot!", direction);
                    }
                    return act(turn, "attack!", direction);
                }
            }
        }

        if turn.has_sense("look") && turn.has_action("shoot!") {
            let sight = turn.do_sense("look", &[])?;
            for space in sight.spaces() {
                if space.is_enemy() {
                    return act(turn, "shoot!", RelativeDirection::Forward);
                }
                if !space.is_empty() {
                    break;
                }
            }
        }

        if let Some(health) = health {
            if health < REST_BELOW && !taking_damage && turn.has_action("rest!") {
                turn.do_action("rest!", &[])?;
                return Ok(());
            }
        }

        if turn.has_sense("listen") && turn.has_sense("direction_of") {
            if let Some(target) = heard_target(turn)? {
                let sensed = turn.do_sense("direction_of", &[target.into()])?;
                if let Some(direction) = sensed.direction() {
                    return act(turn, "walk!", direction);
                }
            }
        }

        if turn.has_sense("feel") {
            if !self.checked_behind {
                let behind = feel(turn, RelativeDirection::Backward)?;
                if behind.is_empty() {
                    return act(turn, "walk!", RelativeDirection::Backward);
                }
                self.checked_behind = true;
            }
            if feel(turn, RelativeDirection::Forward)?.is_wall() && turn.has_action("pivot!") {
                return act(turn, "pivot!", RelativeDirection::Backward);
            }
        }

        if turn.has_sense("direction_of_stairs") {
            if let Some(direction) = turn.do_sense("direction_of_stairs", &[])?.direction() {
                return act(turn, "walk!", direction);
            }
        }
        act(turn, "walk!", RelativeDirection::Forward)
    }

    fn play_ally_turn(&mut self, turn: &mut Turn<'_>) -> Result<(), PlayerError> {
        if !turn.has_sense("feel") || !turn.has_action("attack!") {
            return Ok(());
        }
        for direction in SCAN {
            if feel(turn, direction)?.is_enemy() {
                return act(turn, "attack!", direction);
            }
        }
        Ok(())
    }
}

fn feel<'f>(turn: &Turn<'f>, direction: RelativeDirection) -> Result<Space<'f>, PlayerError> {
    let sensed = turn.do_sense("feel", &[direction.into()])?;
    sensed
        .space()
        .ok_or_else(|| PlayerError::Failed("feel returned no space".to_owned()))
}

/// Heard unit worth walking to, ticking captives first.
fn heard_target<'f>(turn: &Turn<'f>) -> Result<Option<Space<'f>>, PlayerError> {
    let heard = turn.do_sense("listen", &[])?.spaces();
    let ticking = heard
        .iter()
        .find(|space| space.is_captive() && space.is_ticking());
    let other = heard
        .iter()
        .find(|space| space.is_captive() || space.is_enemy());
    Ok(ticking.or(other).copied())
}

fn act(turn: &mut Turn<'_>, key: &str, direction: RelativeDirection) -> Result<(), PlayerError> {
    if turn.has_action(key) {
        turn.do_action(key, &[direction.into()])?;
    }
    Ok(())
}

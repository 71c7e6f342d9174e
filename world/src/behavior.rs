//! Built-in decision logic for enemies and captives.

use samurai_tower_core::{RelativeDirection, UnitKind};

use crate::turn::{Turn, TurnError};

const MELEE_SCAN: [RelativeDirection; 4] = [
    RelativeDirection::Forward,
    RelativeDirection::Left,
    RelativeDirection::Right,
    RelativeDirection::Backward,
];

const RANGED_SCAN: [RelativeDirection; 3] = [
    RelativeDirection::Forward,
    RelativeDirection::Left,
    RelativeDirection::Right,
];

/// Plays the turn of a unit not driven by a [`crate::Player`].
pub(crate) fn play(kind: UnitKind, turn: &mut Turn<'_>) -> Result<(), TurnError> {
    match kind {
        UnitKind::Sludge | UnitKind::ThickSludge => melee(turn),
        UnitKind::Archer | UnitKind::Wizard => ranged(turn),
        UnitKind::Samurai | UnitKind::Captive | UnitKind::Golem => Ok(()),
    }
}

/// Attacks the first adjacent player-team unit.
fn melee(turn: &mut Turn<'_>) -> Result<(), TurnError> {
    if !turn.has_action("attack!") || !turn.has_sense("feel") {
        return Ok(());
    }
    for direction in MELEE_SCAN {
        let feel = turn.do_sense("feel", &[direction.into()])?;
        if feel.space().is_some_and(|space| space.is_player()) {
            return turn.do_action("attack!", &[direction.into()]);
        }
    }
    Ok(())
}

/// Shoots the first player-team unit in line of sight. Any occupant or wall
/// blocks the line.
fn ranged(turn: &mut Turn<'_>) -> Result<(), TurnError> {
    if !turn.has_action("shoot!") || !turn.has_sense("look") {
        return Ok(());
    }
    for direction in RANGED_SCAN {
        let look = turn.do_sense("look", &[direction.into()])?;
        for space in look.spaces() {
            if space.is_player() {
                return turn.do_action("shoot!", &[direction.into()]);
            }
            if !space.is_empty() {
                break;
            }
        }
    }
    Ok(())
}

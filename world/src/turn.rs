//! Per-unit, per-tick transaction between decision logic and abilities.

use std::str::FromStr;

use samurai_tower_core::{AbilityName, UnitId};
use thiserror::Error;

use crate::{
    abilities::{AbilityError, Argument, Target},
    senses::{self, Sensed},
    unit::Unit,
    Floor,
};

/// Action chosen during the prepare phase, executed during the perform phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedAction {
    /// Ability to execute.
    pub name: AbilityName,
    /// Validated argument.
    pub target: Target,
}

/// Errors raised while a unit plays its turn.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TurnError {
    /// An action was already staged this turn.
    #[error("only one action can be performed per turn; `{0}` is already staged")]
    ActionAlreadyTaken(AbilityName),
    /// The unit does not carry an action under that key.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The unit does not carry a sense under that key.
    #[error("unknown sense `{0}`")]
    UnknownSense(String),
    /// Argument validation or evaluation failed.
    #[error(transparent)]
    Ability(#[from] AbilityError),
    /// No unit is registered under the identifier.
    #[error("unit {} is not registered on the floor", .0.get())]
    MissingUnit(UnitId),
}

/// Errors surfaced by decision logic.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PlayerError {
    /// The decision logic misused its turn.
    #[error(transparent)]
    Turn(#[from] TurnError),
    /// The decision logic failed on its own.
    #[error("player failed: {0}")]
    Failed(String),
}

/// Decision logic for the player-controlled units.
pub trait Player {
    /// Decides the samurai's turn.
    fn play_turn(&mut self, turn: &mut Turn<'_>) -> Result<(), PlayerError>;

    /// Decides the turn of an ally formed by the samurai. Allies idle by
    /// default.
    fn play_ally_turn(&mut self, turn: &mut Turn<'_>) -> Result<(), PlayerError> {
        let _ = turn;
        Ok(())
    }
}

/// Abilities a unit may use this tick and the single action it staged.
///
/// Senses are answered immediately against the floor as it stood when the
/// tick began. The action is only recorded; the level executes it once every
/// unit has decided.
#[derive(Debug)]
pub struct Turn<'f> {
    floor: &'f Floor,
    unit: &'f Unit,
    actions: Vec<AbilityName>,
    senses: Vec<AbilityName>,
    action: Option<StagedAction>,
}

impl<'f> Turn<'f> {
    /// Opens a turn for the unit registered under `id`.
    pub fn new(floor: &'f Floor, id: UnitId) -> Result<Self, TurnError> {
        let unit = floor.unit(id).ok_or(TurnError::MissingUnit(id))?;
        let (actions, senses) = unit.ability_names().partition(|name| name.is_action());
        Ok(Self {
            floor,
            unit,
            actions,
            senses,
            action: None,
        })
    }

    /// Unit playing the turn.
    #[must_use]
    pub const fn unit(&self) -> &'f Unit {
        self.unit
    }

    /// Stages the action registered under `key`.
    pub fn do_action(&mut self, key: &str, args: &[Argument]) -> Result<(), TurnError> {
        if let Some(staged) = &self.action {
            return Err(TurnError::ActionAlreadyTaken(staged.name));
        }
        let name =
            lookup(&self.actions, key).ok_or_else(|| TurnError::UnknownAction(key.to_owned()))?;
        let target = Target::resolve(name, args)?;
        self.action = Some(StagedAction { name, target });
        Ok(())
    }

    /// Evaluates the sense registered under `key`.
    pub fn do_sense(&self, key: &str, args: &[Argument]) -> Result<Sensed<'f>, TurnError> {
        let name =
            lookup(&self.senses, key).ok_or_else(|| TurnError::UnknownSense(key.to_owned()))?;
        let target = Target::resolve(name, args)?;
        Ok(senses::sense(self.floor, self.unit, name, target)?)
    }

    /// Reports whether the unit carries the action registered under `key`.
    #[must_use]
    pub fn has_action(&self, key: &str) -> bool {
        lookup(&self.actions, key).is_some()
    }

    /// Reports whether the unit carries the sense registered under `key`.
    #[must_use]
    pub fn has_sense(&self, key: &str) -> bool {
        lookup(&self.senses, key).is_some()
    }

    /// Action staged so far.
    #[must_use]
    pub const fn action(&self) -> Option<&StagedAction> {
        self.action.as_ref()
    }

    /// Closes the turn and yields the staged action.
    #[must_use]
    pub fn into_action(self) -> Option<StagedAction> {
        self.action
    }
}

fn lookup(available: &[AbilityName], key: &str) -> Option<AbilityName> {
    AbilityName::from_str(key)
        .ok()
        .filter(|name| available.contains(name))
}

#[cfg(test)]
mod tests {
    use samurai_tower_core::{AbsoluteDirection, Coord, RelativeDirection, UnitKind};

    use super::*;

    fn floor() -> (Floor, UnitId) {
        let mut floor = Floor::new(4, 1, Coord::new(3, 0));
        let mut samurai = Unit::new(UnitKind::Samurai);
        for name in [AbilityName::Walk, AbilityName::Attack, AbilityName::Feel] {
            samurai.add_ability(name);
        }
        let id = floor
            .add(samurai, Coord::new(0, 0), AbsoluteDirection::East)
            .expect("samurai placed");
        (floor, id)
    }

    #[test]
    fn second_action_is_rejected_regardless_of_name() {
        let (floor, id) = floor();
        let mut turn = Turn::new(&floor, id).expect("turn");

        turn.do_action("walk!", &[]).expect("first action");
        assert_eq!(
            turn.do_action("attack!", &[]),
            Err(TurnError::ActionAlreadyTaken(AbilityName::Walk))
        );
        assert_eq!(
            turn.do_action("walk!", &[]),
            Err(TurnError::ActionAlreadyTaken(AbilityName::Walk))
        );
        assert_eq!(
            turn.into_action(),
            Some(StagedAction {
                name: AbilityName::Walk,
                target: Target::Direction(RelativeDirection::Forward),
            })
        );
    }

    #[test]
    fn senses_are_unlimited_and_do_not_stage() {
        let (floor, id) = floor();
        let turn = Turn::new(&floor, id).expect("turn");

        for _ in 0..3 {
            let sensed = turn.do_sense("feel", &[]).expect("feel");
            assert!(sensed.space().is_some_and(|space| space.is_empty()));
        }
        assert!(turn.action().is_none());
    }

    #[test]
    fn unknown_or_uncarried_abilities_are_rejected() {
        let (floor, id) = floor();
        let mut turn = Turn::new(&floor, id).expect("turn");

        assert_eq!(
            turn.do_action("rest!", &[]),
            Err(TurnError::UnknownAction("rest!".to_owned()))
        );
        assert_eq!(
            turn.do_action("fly!", &[]),
            Err(TurnError::UnknownAction("fly!".to_owned()))
        );
        assert_eq!(
            turn.do_sense("walk!", &[]).err(),
            Some(TurnError::UnknownSense("walk!".to_owned()))
        );
        assert!(turn.has_action("attack!"));
        assert!(!turn.has_sense("attack!"));
        assert!(turn.has_sense("feel"));
    }

    #[test]
    fn invalid_arguments_do_not_stage() {
        let (floor, id) = floor();
        let mut turn = Turn::new(&floor, id).expect("turn");

        let result = turn.do_action("walk!", &[Coord::new(1, 0).into()]);
        assert!(matches!(result, Err(TurnError::Ability(AbilityError::InvalidArgument { .. }))));
        assert!(turn.action().is_none());
        turn.do_action("walk!", &[RelativeDirection::Backward.into()])
            .expect("valid direction");
    }
}

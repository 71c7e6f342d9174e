//! Read-only queries a unit may make any number of times per turn.

use samurai_tower_core::{AbilityName, RelativeDirection};

use crate::{
    abilities::{AbilityError, Target},
    space::Space,
    unit::Unit,
    Floor,
};

/// Answer returned by a sense.
#[derive(Clone, Debug, PartialEq)]
pub enum Sensed<'f> {
    /// A single cell, from `feel`.
    Space(Space<'f>),
    /// Several cells, from `look` and `listen`.
    Spaces(Vec<Space<'f>>),
    /// A direction relative to the sensing unit.
    Direction(RelativeDirection),
    /// A Manhattan distance.
    Distance(u32),
    /// Current health of the sensing unit.
    Health(i32),
}

impl<'f> Sensed<'f> {
    /// The sensed cell, if the sense returned exactly one.
    #[must_use]
    pub fn space(&self) -> Option<Space<'f>> {
        match self {
            Self::Space(space) => Some(*space),
            _ => None,
        }
    }

    /// The sensed cells; a single cell is returned as a one-element list.
    #[must_use]
    pub fn spaces(&self) -> Vec<Space<'f>> {
        match self {
            Self::Space(space) => vec![*space],
            Self::Spaces(spaces) => spaces.clone(),
            _ => Vec::new(),
        }
    }

    /// The sensed direction.
    #[must_use]
    pub const fn direction(&self) -> Option<RelativeDirection> {
        match self {
            Self::Direction(direction) => Some(*direction),
            _ => None,
        }
    }

    /// The sensed distance.
    #[must_use]
    pub const fn distance(&self) -> Option<u32> {
        match self {
            Self::Distance(distance) => Some(*distance),
            _ => None,
        }
    }

    /// The sensed health.
    #[must_use]
    pub const fn health(&self) -> Option<i32> {
        match self {
            Self::Health(health) => Some(*health),
            _ => None,
        }
    }
}

/// Evaluates sense `name` for `actor` against the current floor.
pub fn sense<'f>(
    floor: &'f Floor,
    actor: &Unit,
    name: AbilityName,
    target: Target,
) -> Result<Sensed<'f>, AbilityError> {
    let position = actor
        .position()
        .ok_or(AbilityError::NotOnFloor(actor.id()))?;
    let sensed = match name {
        AbilityName::Feel => {
            let (forward, right) = target.direction(name)?.offset(1, 0);
            Sensed::Space(position.relative_space(floor, forward, right))
        }
        AbilityName::Look => {
            let direction = target.direction(name)?;
            let range = i32::try_from(floor.tuning().look_range).unwrap_or(i32::MAX);
            Sensed::Spaces(
                (1..=range)
                    .map(|distance| {
                        let (forward, right) = direction.offset(distance, 0);
                        position.relative_space(floor, forward, right)
                    })
                    .collect(),
            )
        }
        AbilityName::Listen => Sensed::Spaces(
            floor
                .units()
                .filter(|unit| unit.id() != actor.id())
                .filter_map(Unit::position)
                .map(|other| floor.space(other.coord()))
                .collect(),
        ),
        AbilityName::DirectionOf => {
            Sensed::Direction(position.relative_direction_of(target.location(name)?))
        }
        AbilityName::DistanceOf => Sensed::Distance(position.distance_of(target.location(name)?)),
        AbilityName::DirectionOfStairs => {
            Sensed::Direction(position.relative_direction_of_stairs(floor))
        }
        AbilityName::Health => Sensed::Health(actor.health()),
        other => return Err(AbilityError::WrongKind(other)),
    };
    Ok(sensed)
}

//! Absolute and relative direction algebra.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compass directions measured against the floor grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsoluteDirection {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl AbsoluteDirection {
    /// All absolute directions in clockwise order starting at north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Position of the direction within [`AbsoluteDirection::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Resolves an index modulo four into a direction.
    #[must_use]
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// Rotates the direction by `steps` quarter turns clockwise.
    #[must_use]
    pub const fn rotate(self, steps: i64) -> Self {
        Self::from_index(self.index() as i64 + steps)
    }

    /// Unit-vector offset `(dx, dy)` travelled by one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Lowercase key used in level definitions and log parameters.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for AbsoluteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AbsoluteDirection {
    type Err = DirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.key() == value)
            .ok_or_else(|| DirectionError::UnknownAbsolute(value.to_owned()))
    }
}

/// Directions expressed against a unit's own facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeDirection {
    /// The way the unit faces.
    Forward,
    /// A quarter turn clockwise from forward.
    Right,
    /// Behind the unit.
    Backward,
    /// A quarter turn counter-clockwise from forward.
    Left,
}

impl RelativeDirection {
    /// All relative directions in clockwise order starting at forward.
    pub const ALL: [Self; 4] = [Self::Forward, Self::Right, Self::Backward, Self::Left];

    /// Number of clockwise quarter turns separating this direction from forward.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Right => 1,
            Self::Backward => 2,
            Self::Left => 3,
        }
    }

    /// Resolves an index modulo four into a relative direction.
    #[must_use]
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// Lowercase key used by player scripts and log parameters.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Right => "right",
            Self::Backward => "backward",
            Self::Left => "left",
        }
    }

    /// Maps a `(forward, right)` distance pair into the unit's own axes for
    /// this direction, yielding the translated `(forward, right)` offset.
    #[must_use]
    pub const fn offset(self, forward: i32, right: i32) -> (i32, i32) {
        match self {
            Self::Forward => (forward, -right),
            Self::Backward => (-forward, right),
            Self::Right => (right, forward),
            Self::Left => (-right, -forward),
        }
    }
}

impl fmt::Display for RelativeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RelativeDirection {
    type Err = DirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.key() == value)
            .ok_or_else(|| DirectionError::Unknown(value.to_owned()))
    }
}

/// Converts a relative direction into an absolute one for the given facing.
#[must_use]
pub const fn relative_to_absolute(
    facing: AbsoluteDirection,
    direction: RelativeDirection,
) -> AbsoluteDirection {
    facing.rotate(direction.index() as i64)
}

/// Converts an absolute direction into the relative direction seen from `facing`.
#[must_use]
pub const fn absolute_to_relative(
    facing: AbsoluteDirection,
    direction: AbsoluteDirection,
) -> RelativeDirection {
    RelativeDirection::from_index(direction.index() as i64 - facing.index() as i64)
}

/// Errors raised when a direction value cannot be interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DirectionError {
    /// A relative direction key was not recognised.
    #[error("unknown direction `{0}`; should be forward, backward, left or right")]
    Unknown(String),
    /// An absolute direction key was not recognised.
    #[error("unknown facing `{0}`; should be north, east, south or west")]
    UnknownAbsolute(String),
}

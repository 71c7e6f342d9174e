//! Location and facing of a unit standing on a floor.

use samurai_tower_core::{absolute_to_relative, AbsoluteDirection, Coord, RelativeDirection};

use crate::{space::Space, Floor};

/// Cell and facing owned by a living unit.
///
/// The floor is not stored; callers pass it in whenever a query needs to
/// resolve a cell into a [`Space`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    coord: Coord,
    facing: AbsoluteDirection,
}

impl Position {
    /// Creates a position at `coord` facing `facing`.
    #[must_use]
    pub const fn new(coord: Coord, facing: AbsoluteDirection) -> Self {
        Self { coord, facing }
    }

    /// Cell currently occupied.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Absolute direction the unit faces.
    #[must_use]
    pub const fn facing(&self) -> AbsoluteDirection {
        self.facing
    }

    /// Resolves an offset along the unit's own axes into an absolute cell.
    ///
    /// `forward` counts cells along the facing, `right` counts cells a
    /// quarter turn clockwise from it. Negative values go the other way.
    #[must_use]
    pub fn translate_offset(&self, forward: i32, right: i32) -> Coord {
        let (forward_x, forward_y) = self.facing.offset();
        let (right_x, right_y) = self.facing.rotate(1).offset();
        self.coord.offset(
            forward_x * forward + right_x * right,
            forward_y * forward + right_y * right,
        )
    }

    /// Moves along the unit's own axes. Bounds and occupancy are the
    /// caller's responsibility.
    pub fn move_by(&mut self, forward: i32, right: i32) {
        self.coord = self.translate_offset(forward, right);
    }

    /// Turns the unit by `steps` quarter turns clockwise.
    pub fn rotate(&mut self, steps: i64) {
        self.facing = self.facing.rotate(steps);
    }

    /// Space found `forward` cells ahead and `right` cells to the right.
    #[must_use]
    pub fn relative_space<'f>(&self, floor: &'f Floor, forward: i32, right: i32) -> Space<'f> {
        floor.space(self.translate_offset(forward, right))
    }

    /// Manhattan distance to `target`.
    #[must_use]
    pub fn distance_of(&self, target: Coord) -> u32 {
        self.coord.manhattan_distance(target)
    }

    /// Absolute direction of the dominant axis toward `target`.
    ///
    /// Ties, including the unit's own cell, resolve along the vertical axis.
    #[must_use]
    pub fn direction_of(&self, target: Coord) -> AbsoluteDirection {
        let dx = target.x() - self.coord.x();
        let dy = target.y() - self.coord.y();
        if dx.abs() > dy.abs() {
            if dx > 0 {
                AbsoluteDirection::East
            } else {
                AbsoluteDirection::West
            }
        } else if dy > 0 {
            AbsoluteDirection::South
        } else {
            AbsoluteDirection::North
        }
    }

    /// Direction toward `target` expressed against the unit's facing.
    #[must_use]
    pub fn relative_direction_of(&self, target: Coord) -> RelativeDirection {
        absolute_to_relative(self.facing, self.direction_of(target))
    }

    /// Direction toward the floor's stairs expressed against the unit's facing.
    #[must_use]
    pub fn relative_direction_of_stairs(&self, floor: &Floor) -> RelativeDirection {
        self.relative_direction_of(floor.stairs())
    }
}

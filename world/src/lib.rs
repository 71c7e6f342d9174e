#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative floor state for Samurai Tower.
//!
//! The [`Floor`] owns every unit in a registry indexed by [`UnitId`]. Units
//! decide against a shared borrow of the floor through a [`Turn`] and only
//! afterwards mutate it through the ability handlers in [`abilities`].

use samurai_tower_core::{AbilityTuning, AbsoluteDirection, Coord, UnitId, UnitKind};
use thiserror::Error;
use tracing::warn;

pub mod abilities;
mod behavior;
pub mod position;
pub mod senses;
pub mod space;
pub mod turn;
pub mod unit;

pub use abilities::{Ability, AbilityError, Argument, Target};
pub use position::Position;
pub use senses::Sensed;
pub use space::Space;
pub use turn::{Player, PlayerError, StagedAction, Turn, TurnError};
pub use unit::{perform_turn, prepare_turn, Unit};

/// Errors raised when placing units on a floor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FloorError {
    /// The coordinate lies outside the floor.
    #[error("cell {0} lies outside the floor")]
    OutOfBounds(Coord),
    /// A living unit already stands in the cell.
    #[error("cell {0} is already occupied")]
    Occupied(Coord),
}

/// Rectangular grid holding the stairs and every unit of a level.
#[derive(Clone, Debug)]
pub struct Floor {
    width: u32,
    height: u32,
    stairs: Coord,
    tuning: AbilityTuning,
    units: Vec<Unit>,
}

impl Floor {
    /// Creates an empty floor with default ability tuning.
    #[must_use]
    pub fn new(width: u32, height: u32, stairs: Coord) -> Self {
        Self {
            width,
            height,
            stairs,
            tuning: AbilityTuning::default(),
            units: Vec::new(),
        }
    }

    /// Replaces the ability numbers used by handlers on this floor.
    #[must_use]
    pub fn with_tuning(mut self, tuning: AbilityTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Ability numbers in effect on this floor.
    #[must_use]
    pub const fn tuning(&self) -> &AbilityTuning {
        &self.tuning
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Location of the stairs.
    #[must_use]
    pub const fn stairs(&self) -> Coord {
        self.stairs
    }

    /// Registers `unit` and places it at `coord` facing `facing`.
    pub fn add(
        &mut self,
        mut unit: Unit,
        coord: Coord,
        facing: AbsoluteDirection,
    ) -> Result<UnitId, FloorError> {
        if self.is_out_of_bounds(coord) {
            warn!(unit = unit.name(), %coord, "rejected placement outside the floor");
            return Err(FloorError::OutOfBounds(coord));
        }
        if self.unit_at(coord).is_some() {
            warn!(unit = unit.name(), %coord, "rejected placement on an occupied cell");
            return Err(FloorError::Occupied(coord));
        }
        let index = u32::try_from(self.units.len()).unwrap_or(u32::MAX);
        let id = UnitId::new(index);
        unit.assign_id(id);
        unit.place(Position::new(coord, facing));
        self.units.push(unit);
        Ok(id)
    }

    /// Takes a unit off the floor. The registry keeps the entry so its
    /// identifier stays valid.
    pub fn remove(&mut self, id: UnitId) {
        if let Some(unit) = self.unit_mut(id) {
            unit.clear_position();
        }
    }

    /// Living units in registration order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(|unit| unit.is_alive())
    }

    /// Snapshot of living unit identifiers, safe to hold while mutating.
    #[must_use]
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units().map(Unit::id).collect()
    }

    /// Living units other than the samurai.
    pub fn other_units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units().filter(|unit| unit.kind() != UnitKind::Samurai)
    }

    /// Registry entry for `id`, alive or not.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.get() as usize)
    }

    /// Mutable registry entry for `id`, alive or not.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.get() as usize)
    }

    /// Living unit standing at `coord`.
    #[must_use]
    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        self.units().find(|unit| {
            unit.position()
                .is_some_and(|position| position.coord() == coord)
        })
    }

    /// The samurai, while alive.
    #[must_use]
    pub fn samurai(&self) -> Option<&Unit> {
        self.units().find(|unit| unit.kind() == UnitKind::Samurai)
    }

    /// Read-only view of the cell at `coord`.
    #[must_use]
    pub fn space(&self, coord: Coord) -> Space<'_> {
        Space::new(self, coord)
    }

    /// Read-only view of the stairs cell.
    #[must_use]
    pub fn stairs_space(&self) -> Space<'_> {
        self.space(self.stairs)
    }

    /// Reports whether `coord` lies outside the floor.
    #[must_use]
    pub fn is_out_of_bounds(&self, coord: Coord) -> bool {
        coord.x() < 0
            || coord.y() < 0
            || i64::from(coord.x()) >= i64::from(self.width)
            || i64::from(coord.y()) >= i64::from(self.height)
    }

    /// Draws the floor as text, one line per row inside a border.
    #[must_use]
    pub fn render(&self) -> String {
        let border = format!(" {}\n", "-".repeat(self.width as usize));
        let mut out = String::with_capacity(border.len() * (self.height as usize + 2));
        out.push_str(&border);
        for y in 0..self.height as i32 {
            out.push('|');
            for x in 0..self.width as i32 {
                out.push(self.glyph_at(Coord::new(x, y)));
            }
            out.push_str("|\n");
        }
        out.push_str(&border);
        out
    }

    fn glyph_at(&self, coord: Coord) -> char {
        match self.unit_at(coord) {
            Some(unit) => unit.character(),
            None if coord == self.stairs => '>',
            None => ' ',
        }
    }
}

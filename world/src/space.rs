//! Read-only projection of a single floor cell.

use std::fmt;

use samurai_tower_core::{AbilityName, Coord, UnitKind};

use crate::{unit::Unit, Floor};

/// Terrain and occupant of one cell, recomputed from the floor on every query.
#[derive(Clone, Copy)]
pub struct Space<'f> {
    floor: &'f Floor,
    location: Coord,
}

impl<'f> Space<'f> {
    /// Captures the cell at `location` on `floor`.
    #[must_use]
    pub fn new(floor: &'f Floor, location: Coord) -> Self {
        Self { floor, location }
    }

    /// Absolute coordinate of the cell.
    #[must_use]
    pub const fn location(&self) -> Coord {
        self.location
    }

    /// Living unit standing in the cell, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&'f Unit> {
        self.floor.unit_at(self.location)
    }

    /// The cell lies outside the floor.
    #[must_use]
    pub fn is_wall(&self) -> bool {
        self.floor.is_out_of_bounds(self.location)
    }

    /// The cell lies on the floor and nobody stands in it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unit().is_none() && !self.is_wall()
    }

    /// The cell holds the stairs. A unit may stand there at the same time.
    #[must_use]
    pub fn is_stairs(&self) -> bool {
        self.floor.stairs() == self.location
    }

    /// The occupant is the samurai.
    #[must_use]
    pub fn is_samurai(&self) -> bool {
        self.kind() == Some(UnitKind::Samurai)
    }

    /// The occupant is a golem formed by the samurai.
    #[must_use]
    pub fn is_golem(&self) -> bool {
        self.kind() == Some(UnitKind::Golem)
    }

    /// The occupant fights on the samurai's side.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind().is_some_and(UnitKind::is_player_team)
    }

    /// The occupant is hostile: neither on the samurai's side nor bound.
    #[must_use]
    pub fn is_enemy(&self) -> bool {
        self.unit()
            .is_some_and(|unit| !unit.kind().is_player_team() && !unit.is_bound())
    }

    /// The occupant is bound and can be rescued.
    #[must_use]
    pub fn is_captive(&self) -> bool {
        self.unit().is_some_and(Unit::is_bound)
    }

    /// The occupant carries a self-detonating explosive.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.unit()
            .is_some_and(|unit| unit.has_ability(AbilityName::Explode))
    }

    fn kind(&self) -> Option<UnitKind> {
        self.unit().map(Unit::kind)
    }
}

impl fmt::Display for Space<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(unit) = self.unit() {
            f.write_str(unit.name())
        } else if self.is_wall() {
            f.write_str("wall")
        } else {
            f.write_str("nothing")
        }
    }
}

impl fmt::Debug for Space<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("location", &self.location)
            .field("contents", &self.to_string())
            .finish()
    }
}

impl PartialEq for Space<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.floor, other.floor) && self.location == other.location
    }
}

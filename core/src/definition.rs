//! Serializable level and tower content.
//!
//! Definitions are authored as JSON and deserialised by adapters; the engine
//! only consumes the typed records below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AbilityName, AbilityTuning, AbsoluteDirection, Coord, UnitKind};

/// Width and height of a floor measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

/// Everything required to set up one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Flavour text shown before the level starts.
    #[serde(default)]
    pub description: String,
    /// Hint shown to the learner.
    #[serde(default)]
    pub tip: String,
    /// Bonus points available at the start; one is lost every turn.
    #[serde(default)]
    pub time_bonus: u32,
    /// Score a perfect run reaches; grades are measured against it.
    #[serde(default)]
    pub ace_score: Option<u32>,
    /// Floor dimensions.
    pub size: Size,
    /// Stairs location.
    pub stairs: Coord,
    /// Spawn of the player-controlled unit.
    pub samurai: SamuraiDefinition,
    /// Every other unit placed on the floor.
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
    /// Ability numbers for this level.
    #[serde(default)]
    pub tuning: AbilityTuning,
}

/// Spawn point and unlocked abilities of the samurai.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamuraiDefinition {
    /// Spawn column.
    pub x: i32,
    /// Spawn row.
    pub y: i32,
    /// Initial facing.
    pub facing: AbsoluteDirection,
    /// Abilities unlocked by this level.
    #[serde(default)]
    pub abilities: Vec<AbilityName>,
}

impl SamuraiDefinition {
    /// Spawn cell of the samurai.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Placement of a non-player unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Kind of unit to create.
    pub kind: UnitKind,
    /// Spawn column.
    pub x: i32,
    /// Spawn row.
    pub y: i32,
    /// Initial facing.
    pub facing: AbsoluteDirection,
    /// Abilities granted on top of the kind's innate set.
    #[serde(default)]
    pub abilities: Vec<AbilityName>,
    /// Field overrides applied to constructed ability instances.
    #[serde(default)]
    pub ability_config: BTreeMap<AbilityName, AbilityConfig>,
    /// Overrides the kind's maximum health.
    #[serde(default)]
    pub max_health: Option<i32>,
    /// Overrides the kind's attack power.
    #[serde(default)]
    pub attack_power: Option<i32>,
    /// Overrides the kind's shoot power.
    #[serde(default)]
    pub shoot_power: Option<i32>,
}

impl UnitDefinition {
    /// Creates a placement with the kind's defaults and no overrides.
    #[must_use]
    pub fn new(kind: UnitKind, x: i32, y: i32, facing: AbsoluteDirection) -> Self {
        Self {
            kind,
            x,
            y,
            facing,
            abilities: Vec::new(),
            ability_config: BTreeMap::new(),
            max_health: None,
            attack_power: None,
            shoot_power: None,
        }
    }

    /// Spawn cell of the unit.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Key-value overrides for one ability instance, e.g. `{"time": 7}`.
pub type AbilityConfig = BTreeMap<String, ConfigValue>;

/// Scalar value applied onto an ability field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean field value.
    Bool(bool),
    /// Integral field value.
    Int(i64),
    /// Textual field value.
    Text(String),
}

/// Named, ordered sequence of levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerDefinition {
    /// Tower name, e.g. `beginner`.
    pub name: String,
    /// Levels in play order; level numbers start at one.
    pub levels: Vec<LevelDefinition>,
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Samurai Tower engine.
//!
//! This crate defines the vocabulary that connects the authoritative floor,
//! the level run-loop, and adapters. The world mutates units through
//! abilities named by [`AbilityName`], narrates what happened through
//! [`LogEntry`] values, and reads authored numbers from [`UnitKind`] and
//! [`AbilityTuning`]. Level content arrives as [`definition`] records.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod definition;
pub mod direction;

pub use definition::{
    AbilityConfig, ConfigValue, LevelDefinition, SamuraiDefinition, Size, TowerDefinition,
    UnitDefinition,
};
pub use direction::{
    absolute_to_relative, relative_to_absolute, AbsoluteDirection, DirectionError,
    RelativeDirection,
};

/// Unique identifier assigned to a unit when it is registered on a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single floor cell. Coordinates outside the floor are walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Every kind of unit that can stand on a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// The player-controlled unit.
    Samurai,
    /// Weak melee enemy.
    Sludge,
    /// Sturdier melee enemy.
    ThickSludge,
    /// Ranged enemy with a short bow.
    Archer,
    /// Fragile ranged enemy with a deadly wand.
    Wizard,
    /// Bound unit waiting to be rescued.
    Captive,
    /// Ally formed by the samurai.
    Golem,
}

impl UnitKind {
    /// Stable key used as the unit's display name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Samurai => "samurai",
            Self::Sludge => "sludge",
            Self::ThickSludge => "thick_sludge",
            Self::Archer => "archer",
            Self::Wizard => "wizard",
            Self::Captive => "captive",
            Self::Golem => "golem",
        }
    }

    /// Character drawn for the unit in the textual floor rendering.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Samurai => '@',
            Self::Sludge => 's',
            Self::ThickSludge => 'S',
            Self::Archer => 'a',
            Self::Wizard => 'w',
            Self::Captive => 'C',
            Self::Golem => 'G',
        }
    }

    /// Authored health and power values for the kind.
    ///
    /// Golems receive their health from the forming unit, so their base
    /// health is zero.
    #[must_use]
    pub const fn base_stats(self) -> UnitStats {
        match self {
            Self::Samurai => UnitStats::new(20, 5, 3),
            Self::Sludge => UnitStats::new(12, 3, 0),
            Self::ThickSludge => UnitStats::new(24, 3, 0),
            Self::Archer => UnitStats::new(7, 3, 3),
            Self::Wizard => UnitStats::new(3, 0, 11),
            Self::Captive => UnitStats::new(1, 0, 0),
            Self::Golem => UnitStats::new(0, 3, 0),
        }
    }

    /// Abilities every unit of this kind is born with.
    #[must_use]
    pub const fn innate_abilities(self) -> &'static [AbilityName] {
        match self {
            Self::Sludge | Self::ThickSludge => &[AbilityName::Attack, AbilityName::Feel],
            Self::Archer | Self::Wizard => &[AbilityName::Shoot, AbilityName::Look],
            Self::Samurai | Self::Captive | Self::Golem => &[],
        }
    }

    /// Reports whether the unit starts the level bound.
    #[must_use]
    pub const fn starts_bound(self) -> bool {
        matches!(self, Self::Captive)
    }

    /// Reports whether the unit fights on the samurai's side.
    #[must_use]
    pub const fn is_player_team(self) -> bool {
        matches!(self, Self::Samurai | Self::Golem)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Health and power values describing a unit's combat strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Health the unit starts with and can rest back up to.
    pub max_health: i32,
    /// Damage dealt by melee attacks.
    pub attack_power: i32,
    /// Damage dealt by ranged shots.
    pub shoot_power: i32,
}

impl UnitStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(max_health: i32, attack_power: i32, shoot_power: i32) -> Self {
        Self {
            max_health,
            attack_power,
            shoot_power,
        }
    }
}

/// Stable names of every ability a unit may carry.
///
/// Names whose key ends in `!` are actions; at most one action may be taken
/// per turn. All other names are senses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbilityName {
    /// `walk!`: step one cell.
    Walk,
    /// `attack!`: melee strike on an adjacent unit.
    Attack,
    /// `feel`: inspect an adjacent space.
    Feel,
    /// `rest!`: recover a fraction of maximum health.
    Rest,
    /// `rescue!`: free a bound unit.
    Rescue,
    /// `shoot!`: ranged strike along a line.
    Shoot,
    /// `pivot!`: turn to face another direction.
    Pivot,
    /// `bind!`: restrain an adjacent unit.
    Bind,
    /// `detonate!`: throw a bomb with splash damage.
    Detonate,
    /// `explode!`: self-destruct, damaging every unit.
    Explode,
    /// `look`: inspect a line of spaces.
    Look,
    /// `listen`: locate every other unit.
    Listen,
    /// `direction_of`: direction toward a space.
    DirectionOf,
    /// `direction_of_stairs`: direction toward the stairs.
    DirectionOfStairs,
    /// `distance_of`: Manhattan distance to a space.
    DistanceOf,
    /// `form!`: split health into a new golem.
    Form,
    /// `health`: current health.
    Health,
}

impl AbilityName {
    /// Every ability name in registry order.
    pub const ALL: [Self; 17] = [
        Self::Walk,
        Self::Attack,
        Self::Feel,
        Self::Rest,
        Self::Rescue,
        Self::Shoot,
        Self::Pivot,
        Self::Bind,
        Self::Detonate,
        Self::Explode,
        Self::Look,
        Self::Listen,
        Self::DirectionOf,
        Self::DirectionOfStairs,
        Self::DistanceOf,
        Self::Form,
        Self::Health,
    ];

    /// Stable string key used by player scripts and level definitions.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Walk => "walk!",
            Self::Attack => "attack!",
            Self::Feel => "feel",
            Self::Rest => "rest!",
            Self::Rescue => "rescue!",
            Self::Shoot => "shoot!",
            Self::Pivot => "pivot!",
            Self::Bind => "bind!",
            Self::Detonate => "detonate!",
            Self::Explode => "explode!",
            Self::Look => "look",
            Self::Listen => "listen",
            Self::DirectionOf => "direction_of",
            Self::DirectionOfStairs => "direction_of_stairs",
            Self::DistanceOf => "distance_of",
            Self::Form => "form!",
            Self::Health => "health",
        }
    }

    /// Reports whether the ability consumes the unit's single action.
    #[must_use]
    pub fn is_action(self) -> bool {
        self.key().ends_with('!')
    }
}

impl fmt::Display for AbilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AbilityName {
    type Err = UnknownAbility;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.key() == value)
            .ok_or_else(|| UnknownAbility(value.to_owned()))
    }
}

impl Serialize for AbilityName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for AbilityName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

/// Raised when an ability key does not name a known ability.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown ability `{0}`")]
pub struct UnknownAbility(pub String);

/// Authored numbers that drive ability effects.
///
/// Every field defaults to the value used by the bundled towers;
/// level definitions may override individual fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    /// Fraction of maximum health restored by `rest!`, rounded to nearest.
    pub rest_fraction: f64,
    /// Points awarded for rescuing a captive.
    pub rescue_points: u32,
    /// Number of cells scanned by `shoot!`.
    pub shoot_range: u32,
    /// Number of cells returned by `look`.
    pub look_range: u32,
    /// Damage dealt by `detonate!` to the cell directly in front.
    pub detonate_damage: i32,
    /// Damage dealt by `detonate!` to the surrounding splash cells.
    pub detonate_splash_damage: i32,
    /// Damage dealt by `explode!` to every unit on the floor.
    pub explode_damage: i32,
    /// Abilities granted to a golem created by `form!`.
    pub golem_abilities: Vec<AbilityName>,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            rest_fraction: 0.1,
            rescue_points: 20,
            shoot_range: 3,
            look_range: 3,
            detonate_damage: 8,
            detonate_splash_damage: 4,
            explode_damage: 100,
            golem_abilities: vec![AbilityName::Walk, AbilityName::Feel, AbilityName::Attack],
        }
    }
}

/// Narrative events emitted by abilities and units.
///
/// The engine never renders display strings; adapters translate the
/// [`LogEvent::key`] and [`LogEvent::params`] pair into text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    /// The unit stepped one cell.
    Walked {
        /// Direction of travel.
        direction: RelativeDirection,
    },
    /// The unit tried to step into a wall or occupied cell.
    Bumped {
        /// Direction of the attempted step.
        direction: RelativeDirection,
        /// Name of the obstacle (`wall` or a unit key).
        obstacle: String,
    },
    /// The unit struck another unit in melee.
    Attacked {
        /// Direction of the strike.
        direction: RelativeDirection,
        /// Name of the unit hit.
        target: String,
    },
    /// The unit struck at an empty space.
    AttackedNothing {
        /// Direction of the strike.
        direction: RelativeDirection,
    },
    /// The unit shot another unit.
    Shot {
        /// Direction of the shot.
        direction: RelativeDirection,
        /// Name of the unit hit.
        target: String,
    },
    /// The unit's shot hit nothing.
    ShotNothing {
        /// Direction of the shot.
        direction: RelativeDirection,
    },
    /// The unit took damage.
    Damaged {
        /// Damage received.
        amount: i32,
        /// Health remaining afterwards.
        health: i32,
    },
    /// The unit died and left the floor.
    Died,
    /// The unit earned points.
    EarnedPoints {
        /// Points earned.
        points: u32,
    },
    /// The unit rested and recovered health.
    Rested {
        /// Health recovered.
        amount: i32,
        /// Health after resting.
        health: i32,
    },
    /// The unit rested at full health.
    AlreadyFit,
    /// The unit freed and rescued a captive.
    Rescued {
        /// Direction of the captive.
        direction: RelativeDirection,
        /// Name of the rescued unit.
        target: String,
    },
    /// The unit unbound a non-captive unit without rescuing it.
    Unbound {
        /// Direction of the released unit.
        direction: RelativeDirection,
        /// Name of the released unit.
        target: String,
    },
    /// The unit tried to rescue something that was not bound.
    RescuedNothing {
        /// Direction of the attempt.
        direction: RelativeDirection,
    },
    /// The unit's bonds were released.
    Released,
    /// The unit bound another unit.
    Bound {
        /// Direction of the bound unit.
        direction: RelativeDirection,
        /// Name of the bound unit.
        target: String,
    },
    /// The unit tried to bind an empty space.
    BoundNothing {
        /// Direction of the attempt.
        direction: RelativeDirection,
    },
    /// The unit turned.
    Pivoted {
        /// Relative direction turned toward.
        direction: RelativeDirection,
    },
    /// The unit threw a bomb.
    Detonated {
        /// Direction of the throw.
        direction: RelativeDirection,
    },
    /// A ticking unit was caught by a bomb and set off.
    CaughtInBlast,
    /// The unit exploded, damaging every unit on the floor.
    Exploded,
    /// The unit's explosive counted down.
    Ticking {
        /// Turns left before the explosion.
        remaining: u32,
    },
    /// The unit formed a golem.
    Formed {
        /// Direction the golem appeared in.
        direction: RelativeDirection,
        /// Health transferred to the golem.
        health: i32,
    },
    /// The unit could not form a golem because the space was blocked.
    FormBlocked {
        /// Direction of the attempt.
        direction: RelativeDirection,
    },
    /// The samurai ended a turn without acting.
    Idle,
}

/// Parameter value attached to a narrative event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LogValue {
    /// Integral parameter.
    Int(i64),
    /// Textual parameter.
    Text(String),
}

impl LogEvent {
    /// Stable message key for localisation lookups.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Walked { .. } => "walk",
            Self::Bumped { .. } => "bump",
            Self::Attacked { .. } => "attack",
            Self::AttackedNothing { .. } => "attack_miss",
            Self::Shot { .. } => "shoot",
            Self::ShotNothing { .. } => "shoot_miss",
            Self::Damaged { .. } => "damage",
            Self::Died => "death",
            Self::EarnedPoints { .. } => "earn_points",
            Self::Rested { .. } => "rest",
            Self::AlreadyFit => "rest_full",
            Self::Rescued { .. } => "rescue",
            Self::Unbound { .. } => "unbind",
            Self::RescuedNothing { .. } => "rescue_miss",
            Self::Released => "release",
            Self::Bound { .. } => "bind",
            Self::BoundNothing { .. } => "bind_miss",
            Self::Pivoted { .. } => "pivot",
            Self::Detonated { .. } => "detonate",
            Self::CaughtInBlast => "chain_explosion",
            Self::Exploded => "explode",
            Self::Ticking { .. } => "ticking",
            Self::Formed { .. } => "form",
            Self::FormBlocked { .. } => "form_blocked",
            Self::Idle => "idle",
        }
    }

    /// Named parameters substituted into the localised message.
    #[must_use]
    pub fn params(&self) -> BTreeMap<&'static str, LogValue> {
        let mut params = BTreeMap::new();
        let mut put = |name: &'static str, value: LogValue| {
            let _ = params.insert(name, value);
        };
        match self {
            Self::Walked { direction }
            | Self::AttackedNothing { direction }
            | Self::ShotNothing { direction }
            | Self::RescuedNothing { direction }
            | Self::BoundNothing { direction }
            | Self::Pivoted { direction }
            | Self::Detonated { direction }
            | Self::FormBlocked { direction } => {
                put("direction", text(direction.key()));
            }
            Self::Bumped {
                direction,
                obstacle,
            } => {
                put("direction", text(direction.key()));
                put("target", text(obstacle));
            }
            Self::Attacked { direction, target }
            | Self::Shot { direction, target }
            | Self::Rescued { direction, target }
            | Self::Unbound { direction, target }
            | Self::Bound { direction, target } => {
                put("direction", text(direction.key()));
                put("target", text(target));
            }
            Self::Damaged { amount, health } | Self::Rested { amount, health } => {
                put("amount", LogValue::Int(i64::from(*amount)));
                put("health", LogValue::Int(i64::from(*health)));
            }
            Self::EarnedPoints { points } => put("points", LogValue::Int(i64::from(*points))),
            Self::Ticking { remaining } => put("remaining", LogValue::Int(i64::from(*remaining))),
            Self::Formed { direction, health } => {
                put("direction", text(direction.key()));
                put("health", LogValue::Int(i64::from(*health)));
            }
            Self::Died
            | Self::AlreadyFit
            | Self::Released
            | Self::CaughtInBlast
            | Self::Exploded
            | Self::Idle => {}
        }
        params
    }
}

fn text(value: &str) -> LogValue {
    LogValue::Text(value.to_owned())
}

/// Narrative record attributed to the unit that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "LogRecord")]
pub struct LogEntry {
    /// Unit the event concerns, if any.
    pub unit: Option<UnitId>,
    /// What happened.
    pub event: LogEvent,
}

impl LogEntry {
    /// Creates a log entry attributed to the provided unit.
    #[must_use]
    pub const fn new(unit: UnitId, event: LogEvent) -> Self {
        Self {
            unit: Some(unit),
            event,
        }
    }
}

/// Flattened `{key, params, unit}` shape emitted when a [`LogEntry`] is serialised.
#[derive(Clone, Debug, Serialize)]
pub struct LogRecord {
    /// Message key.
    pub key: &'static str,
    /// Message parameters.
    pub params: BTreeMap<&'static str, LogValue>,
    /// Unit the event concerns, if any.
    pub unit: Option<UnitId>,
}

impl From<LogEntry> for LogRecord {
    fn from(entry: LogEntry) -> Self {
        Self {
            key: entry.event.key(),
            params: entry.event.params(),
            unit: entry.unit,
        }
    }
}

//! Ability registry and the handlers behind every action.
//!
//! Abilities are looked up by their stable key (see [`AbilityName`]). Keys
//! ending in `!` are actions and are executed here during the perform phase;
//! senses are evaluated immediately by [`crate::senses`]. Handlers are
//! stateless apart from the `explode!` countdown, which lives on the ability
//! instance carried by its unit.

use samurai_tower_core::{
    AbilityName, ConfigValue, Coord, DirectionError, LogEntry, LogEvent, RelativeDirection,
    UnitId, UnitKind, UnknownAbility,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    position::Position, space::Space, turn::StagedAction, unit::Unit, Floor, FloorError,
};

/// Offsets hit by `detonate!`, as `(forward, right, splash)` relative to the
/// throw direction. The first cell takes full damage, the rest take splash.
const DETONATION_PATTERN: [(i32, i32, bool); 5] = [
    (1, 0, false),
    (1, 1, true),
    (1, -1, true),
    (2, 0, true),
    (0, 0, true),
];

/// Ability instance carried by a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ability {
    /// Handler without per-instance state.
    Stateless(AbilityName),
    /// `explode!`, optionally counting down to an automatic explosion.
    Explode {
        /// Turns left before the explosion triggers on its own.
        time: Option<u32>,
    },
}

impl Ability {
    /// Constructs the ability registered under `name`.
    #[must_use]
    pub const fn for_name(name: AbilityName) -> Self {
        match name {
            AbilityName::Explode => Self::Explode { time: None },
            other => Self::Stateless(other),
        }
    }

    /// Registry key of the ability.
    #[must_use]
    pub const fn name(&self) -> AbilityName {
        match self {
            Self::Stateless(name) => *name,
            Self::Explode { .. } => AbilityName::Explode,
        }
    }

    /// Reports whether the ability has work to do at the start of every
    /// perform phase.
    #[must_use]
    pub const fn passes_turn(&self) -> bool {
        matches!(self, Self::Explode { time: Some(_) })
    }

    /// Applies a single field override from level content.
    pub fn configure(&mut self, field: &str, value: &ConfigValue) -> Result<(), AbilityError> {
        let name = self.name();
        match (self, field) {
            (Self::Explode { time }, "time") => {
                let ConfigValue::Int(turns) = value else {
                    return Err(AbilityError::InvalidField {
                        ability: name,
                        field: field.to_owned(),
                    });
                };
                let turns = u32::try_from(*turns).map_err(|_| AbilityError::InvalidField {
                    ability: name,
                    field: field.to_owned(),
                })?;
                *time = Some(turns);
                Ok(())
            }
            _ => Err(AbilityError::UnknownField {
                ability: name,
                field: field.to_owned(),
            }),
        }
    }
}

/// Argument passed to an ability by decision logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Argument {
    /// Direction relative to the acting unit.
    Direction(RelativeDirection),
    /// Absolute cell, usually taken from a sensed space.
    Location(Coord),
}

impl Argument {
    /// Parses a direction key such as `"forward"`, failing on unknown keys.
    pub fn direction(key: &str) -> Result<Self, DirectionError> {
        key.parse().map(Self::Direction)
    }
}

impl From<RelativeDirection> for Argument {
    fn from(direction: RelativeDirection) -> Self {
        Self::Direction(direction)
    }
}

impl From<Coord> for Argument {
    fn from(location: Coord) -> Self {
        Self::Location(location)
    }
}

impl From<Space<'_>> for Argument {
    fn from(space: Space<'_>) -> Self {
        Self::Location(space.location())
    }
}

/// Validated argument of an ability call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// The ability takes no argument.
    None,
    /// A relative direction, defaulted when omitted.
    Direction(RelativeDirection),
    /// An absolute cell.
    Location(Coord),
}

impl Target {
    /// Checks `args` against the signature of `name` and fills defaults.
    ///
    /// Directional abilities default to forward, except `pivot!` which
    /// defaults to backward.
    pub fn resolve(name: AbilityName, args: &[Argument]) -> Result<Self, AbilityError> {
        let invalid = |reason: &'static str| AbilityError::InvalidArgument {
            ability: name,
            reason,
        };
        match signature(name) {
            Signature::Nothing => match args {
                [] => Ok(Self::None),
                _ => Err(invalid("takes no arguments")),
            },
            Signature::Direction(default) => match args {
                [] => Ok(Self::Direction(default)),
                [Argument::Direction(direction)] => Ok(Self::Direction(*direction)),
                [Argument::Location(_)] => Err(invalid("expects a direction, not a location")),
                _ => Err(invalid("takes at most one direction")),
            },
            Signature::Location => match args {
                [Argument::Location(location)] => Ok(Self::Location(*location)),
                _ => Err(invalid("expects exactly one location")),
            },
        }
    }

    pub(crate) fn direction(self, name: AbilityName) -> Result<RelativeDirection, AbilityError> {
        match self {
            Self::Direction(direction) => Ok(direction),
            _ => Err(AbilityError::InvalidArgument {
                ability: name,
                reason: "expects a direction",
            }),
        }
    }

    pub(crate) fn location(self, name: AbilityName) -> Result<Coord, AbilityError> {
        match self {
            Self::Location(location) => Ok(location),
            _ => Err(AbilityError::InvalidArgument {
                ability: name,
                reason: "expects a location",
            }),
        }
    }
}

enum Signature {
    Nothing,
    Direction(RelativeDirection),
    Location,
}

fn signature(name: AbilityName) -> Signature {
    match name {
        AbilityName::Walk
        | AbilityName::Attack
        | AbilityName::Feel
        | AbilityName::Rescue
        | AbilityName::Shoot
        | AbilityName::Bind
        | AbilityName::Detonate
        | AbilityName::Look
        | AbilityName::Form => Signature::Direction(RelativeDirection::Forward),
        AbilityName::Pivot => Signature::Direction(RelativeDirection::Backward),
        AbilityName::DirectionOf | AbilityName::DistanceOf => Signature::Location,
        AbilityName::Rest
        | AbilityName::Explode
        | AbilityName::Listen
        | AbilityName::DirectionOfStairs
        | AbilityName::Health => Signature::Nothing,
    }
}

/// Errors raised by ability lookup, argument validation, and execution.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AbilityError {
    /// The key does not name a registered ability.
    #[error(transparent)]
    Unknown(#[from] UnknownAbility),
    /// A direction key could not be parsed.
    #[error(transparent)]
    Direction(#[from] DirectionError),
    /// The arguments do not match the ability's signature.
    #[error("`{ability}` {reason}")]
    InvalidArgument {
        /// Ability that rejected the arguments.
        ability: AbilityName,
        /// What was wrong with them.
        reason: &'static str,
    },
    /// A sense was dispatched as an action or vice versa.
    #[error("`{0}` cannot be used that way")]
    WrongKind(AbilityName),
    /// The unit does not carry the ability being configured.
    #[error("unit does not carry `{0}`")]
    NotCarried(AbilityName),
    /// The ability has no field with that name.
    #[error("`{ability}` has no configurable field `{field}`")]
    UnknownField {
        /// Ability being configured.
        ability: AbilityName,
        /// Field that was requested.
        field: String,
    },
    /// The field exists but the value has the wrong shape.
    #[error("invalid value for `{ability}` field `{field}`")]
    InvalidField {
        /// Ability being configured.
        ability: AbilityName,
        /// Field that was requested.
        field: String,
    },
    /// No unit is registered under the identifier.
    #[error("unit {} is not registered on the floor", .0.get())]
    MissingUnit(UnitId),
    /// The unit has no position, so it cannot sense its surroundings.
    #[error("unit {} is no longer on the floor", .0.get())]
    NotOnFloor(UnitId),
    /// Placing a formed unit failed.
    #[error(transparent)]
    Floor(#[from] FloorError),
}

/// Executes a staged action for `actor`.
pub fn perform(
    floor: &mut Floor,
    actor: UnitId,
    action: &StagedAction,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let Some(position) = unit(floor, actor)?.position() else {
        return Ok(());
    };
    let name = action.name;
    debug!(unit = actor.get(), ability = %name, "dispatching action");
    let direction = action.target.direction(name);
    match name {
        AbilityName::Walk => walk(floor, actor, position, direction?, log),
        AbilityName::Attack => attack(floor, actor, position, direction?, log),
        AbilityName::Rest => rest(floor, actor, log),
        AbilityName::Rescue => rescue(floor, actor, position, direction?, log),
        AbilityName::Shoot => shoot(floor, actor, position, direction?, log),
        AbilityName::Pivot => pivot(floor, actor, direction?, log),
        AbilityName::Bind => bind(floor, actor, position, direction?, log),
        AbilityName::Detonate => detonate(floor, actor, direction?, log),
        AbilityName::Explode => explode(floor, actor, log),
        AbilityName::Form => form(floor, actor, position, direction?, log),
        AbilityName::Feel
        | AbilityName::Look
        | AbilityName::Listen
        | AbilityName::DirectionOf
        | AbilityName::DirectionOfStairs
        | AbilityName::DistanceOf
        | AbilityName::Health => Err(AbilityError::WrongKind(name)),
    }
}

/// Runs the start-of-perform hook of one ability carried by `actor`.
///
/// Only a counting-down `explode!` has work to do: it ticks, and explodes
/// once the countdown reaches zero.
pub fn pass_turn(
    floor: &mut Floor,
    actor: UnitId,
    name: AbilityName,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let unit = unit_mut(floor, actor)?;
    if !unit.is_alive() {
        return Ok(());
    }
    let Some(Ability::Explode { time: Some(time) }) = unit.ability_mut(name) else {
        return Ok(());
    };
    let remaining = time.saturating_sub(1);
    *time = remaining;
    log.push(LogEntry::new(actor, LogEvent::Ticking { remaining }));
    if remaining == 0 {
        explode(floor, actor, log)?;
    }
    Ok(())
}

fn unit(floor: &Floor, id: UnitId) -> Result<&Unit, AbilityError> {
    floor.unit(id).ok_or(AbilityError::MissingUnit(id))
}

fn unit_mut(floor: &mut Floor, id: UnitId) -> Result<&mut Unit, AbilityError> {
    floor.unit_mut(id).ok_or(AbilityError::MissingUnit(id))
}

/// Cell `forward` steps along `direction` and `right` steps across it.
fn cell_toward(
    position: Position,
    direction: RelativeDirection,
    forward: i32,
    right: i32,
) -> Coord {
    let (forward, right) = direction.offset(forward, right);
    position.translate_offset(forward, right)
}

/// Damages `receiver`; a kill credits the attacker with the victim's
/// maximum health.
fn damage(
    floor: &mut Floor,
    attacker: UnitId,
    receiver: UnitId,
    amount: i32,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let victim = unit_mut(floor, receiver)?;
    if victim.take_damage(amount, log) {
        let points = u32::try_from(victim.max_health()).unwrap_or(0);
        unit_mut(floor, attacker)?.earn_points(points, log);
    }
    Ok(())
}

fn walk(
    floor: &mut Floor,
    actor: UnitId,
    position: Position,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let target = floor.space(cell_toward(position, direction, 1, 0));
    if !target.is_empty() {
        let event = LogEvent::Bumped {
            direction,
            obstacle: target.to_string(),
        };
        log.push(LogEntry::new(actor, event));
        return Ok(());
    }
    let (forward, right) = direction.offset(1, 0);
    if let Some(position) = unit_mut(floor, actor)?.position_mut() {
        position.move_by(forward, right);
    }
    log.push(LogEntry::new(actor, LogEvent::Walked { direction }));
    Ok(())
}

fn attack(
    floor: &mut Floor,
    actor: UnitId,
    position: Position,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let Some(receiver) = floor.unit_at(cell_toward(position, direction, 1, 0)) else {
        log.push(LogEntry::new(actor, LogEvent::AttackedNothing { direction }));
        return Ok(());
    };
    let (receiver, target) = (receiver.id(), receiver.name().to_owned());
    let power = unit(floor, actor)?.attack_power();
    let power = if direction == RelativeDirection::Backward {
        (power + 1) / 2
    } else {
        power
    };
    log.push(LogEntry::new(actor, LogEvent::Attacked { direction, target }));
    damage(floor, actor, receiver, power, log)
}

fn shoot(
    floor: &mut Floor,
    actor: UnitId,
    position: Position,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let range = i32::try_from(floor.tuning().shoot_range).unwrap_or(i32::MAX);
    let mut receiver = None;
    for distance in 1..=range {
        let space = floor.space(cell_toward(position, direction, distance, 0));
        if space.is_wall() {
            break;
        }
        if let Some(unit) = space.unit() {
            receiver = Some((unit.id(), unit.name().to_owned()));
            break;
        }
    }
    let Some((receiver, target)) = receiver else {
        log.push(LogEntry::new(actor, LogEvent::ShotNothing { direction }));
        return Ok(());
    };
    let power = unit(floor, actor)?.shoot_power();
    log.push(LogEntry::new(actor, LogEvent::Shot { direction, target }));
    damage(floor, actor, receiver, power, log)
}

fn rest(floor: &mut Floor, actor: UnitId, log: &mut Vec<LogEntry>) -> Result<(), AbilityError> {
    let fraction = floor.tuning().rest_fraction;
    let unit = unit_mut(floor, actor)?;
    let missing = unit.max_health() - unit.health();
    if missing <= 0 {
        log.push(LogEntry::new(actor, LogEvent::AlreadyFit));
        return Ok(());
    }
    let amount = ((f64::from(unit.max_health()) * fraction).round() as i32).min(missing);
    unit.heal(amount);
    let health = unit.health();
    log.push(LogEntry::new(actor, LogEvent::Rested { amount, health }));
    Ok(())
}

fn rescue(
    floor: &mut Floor,
    actor: UnitId,
    position: Position,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let receiver = floor
        .unit_at(cell_toward(position, direction, 1, 0))
        .filter(|unit| unit.is_bound())
        .map(|unit| (unit.id(), unit.kind(), unit.name().to_owned()));
    let Some((receiver, kind, target)) = receiver else {
        log.push(LogEntry::new(actor, LogEvent::RescuedNothing { direction }));
        return Ok(());
    };

    if kind == UnitKind::Captive {
        log.push(LogEntry::new(actor, LogEvent::Rescued { direction, target }));
        unit_mut(floor, receiver)?.unbind(log);
        floor.remove(receiver);
        let points = floor.tuning().rescue_points;
        unit_mut(floor, actor)?.earn_points(points, log);
    } else {
        log.push(LogEntry::new(actor, LogEvent::Unbound { direction, target }));
        unit_mut(floor, receiver)?.unbind(log);
    }
    Ok(())
}

fn pivot(
    floor: &mut Floor,
    actor: UnitId,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    if let Some(position) = unit_mut(floor, actor)?.position_mut() {
        position.rotate(direction.index() as i64);
    }
    log.push(LogEntry::new(actor, LogEvent::Pivoted { direction }));
    Ok(())
}

fn bind(
    floor: &mut Floor,
    actor: UnitId,
    position: Position,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let receiver = floor
        .unit_at(cell_toward(position, direction, 1, 0))
        .map(|unit| (unit.id(), unit.name().to_owned()));
    match receiver {
        Some((receiver, target)) => {
            unit_mut(floor, receiver)?.bind();
            log.push(LogEntry::new(actor, LogEvent::Bound { direction, target }));
        }
        None => log.push(LogEntry::new(actor, LogEvent::BoundNothing { direction })),
    }
    Ok(())
}

fn detonate(
    floor: &mut Floor,
    actor: UnitId,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    log.push(LogEntry::new(actor, LogEvent::Detonated { direction }));
    let full = floor.tuning().detonate_damage;
    let splash = floor.tuning().detonate_splash_damage;

    for (forward, right, is_splash) in DETONATION_PATTERN {
        // The thrower may be caught by its own blast or a chain explosion.
        let Some(position) = unit(floor, actor)?.position() else {
            break;
        };
        let cell = cell_toward(position, direction, forward, right);
        let Some(receiver) = floor.unit_at(cell) else {
            continue;
        };
        let (receiver, ticking) = (receiver.id(), receiver.has_ability(AbilityName::Explode));
        if ticking {
            log.push(LogEntry::new(receiver, LogEvent::CaughtInBlast));
            explode(floor, receiver, log)?;
        } else {
            let amount = if is_splash { splash } else { full };
            damage(floor, actor, receiver, amount, log)?;
        }
    }
    Ok(())
}

/// Damages every unit on the floor, including the exploding one.
fn explode(floor: &mut Floor, actor: UnitId, log: &mut Vec<LogEntry>) -> Result<(), AbilityError> {
    if !unit(floor, actor)?.is_alive() {
        return Ok(());
    }
    log.push(LogEntry::new(actor, LogEvent::Exploded));
    let amount = floor.tuning().explode_damage;
    for id in floor.unit_ids() {
        let _ = unit_mut(floor, id)?.take_damage(amount, log);
    }
    Ok(())
}

fn form(
    floor: &mut Floor,
    actor: UnitId,
    position: Position,
    direction: RelativeDirection,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let cell = cell_toward(position, direction, 1, 0);
    if !floor.space(cell).is_empty() {
        log.push(LogEntry::new(actor, LogEvent::FormBlocked { direction }));
        return Ok(());
    }

    let caster = unit_mut(floor, actor)?;
    let health = caster.health().max(0) / 2;
    caster.set_health(caster.health() - health);

    let mut stats = UnitKind::Golem.base_stats();
    stats.max_health = health;
    let mut golem = Unit::new(UnitKind::Golem).with_stats(stats);
    for name in &floor.tuning().golem_abilities {
        golem.add_ability(*name);
    }
    let _ = floor.add(golem, cell, position.facing())?;
    log.push(LogEntry::new(actor, LogEvent::Formed { direction, health }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use samurai_tower_core::{AbilityConfig, AbilityTuning, AbsoluteDirection};

    use super::*;

    const FORWARD: RelativeDirection = RelativeDirection::Forward;
    const BACKWARD: RelativeDirection = RelativeDirection::Backward;

    fn action(name: AbilityName, direction: RelativeDirection) -> StagedAction {
        StagedAction {
            name,
            target: Target::Direction(direction),
        }
    }

    fn corridor(width: u32) -> (Floor, UnitId) {
        let mut floor = Floor::new(width, 1, Coord::new(width as i32 - 1, 0));
        let samurai = Unit::new(UnitKind::Samurai);
        let samurai = floor
            .add(samurai, Coord::new(1, 0), AbsoluteDirection::East)
            .expect("samurai placed");
        (floor, samurai)
    }

    fn place(floor: &mut Floor, kind: UnitKind, x: i32) -> UnitId {
        floor
            .add(Unit::new(kind), Coord::new(x, 0), AbsoluteDirection::West)
            .expect("unit placed")
    }

    fn coord_of(floor: &Floor, id: UnitId) -> Option<Coord> {
        floor
            .unit(id)
            .and_then(Unit::position)
            .map(|position| position.coord())
    }

    fn last_event(log: &[LogEntry]) -> Option<&LogEvent> {
        log.last().map(|entry| &entry.event)
    }

    #[test]
    fn walk_moves_into_empty_space_and_bumps_otherwise() {
        let (mut floor, samurai) = corridor(4);
        let walk = action(AbilityName::Walk, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &walk, &mut log).expect("walk");
        assert_eq!(coord_of(&floor, samurai), Some(Coord::new(2, 0)));

        let _ = place(&mut floor, UnitKind::Sludge, 3);
        perform(&mut floor, samurai, &walk, &mut log).expect("bump");
        assert_eq!(coord_of(&floor, samurai), Some(Coord::new(2, 0)));
        let bumped = LogEvent::Bumped {
            direction: FORWARD,
            obstacle: "sludge".to_owned(),
        };
        assert_eq!(last_event(&log), Some(&bumped));
    }

    #[test]
    fn walking_into_a_wall_bumps_it() {
        let (mut floor, samurai) = corridor(4);
        let retreat = action(AbilityName::Walk, BACKWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &retreat, &mut log).expect("walk");
        perform(&mut floor, samurai, &retreat, &mut log).expect("bump");

        assert_eq!(coord_of(&floor, samurai), Some(Coord::new(0, 0)));
        let bumped = LogEvent::Bumped {
            direction: BACKWARD,
            obstacle: "wall".to_owned(),
        };
        assert_eq!(last_event(&log), Some(&bumped));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn backward_attack_deals_half_power_rounded_up() {
        let (mut floor, samurai) = corridor(4);
        let sludge = place(&mut floor, UnitKind::Sludge, 0);
        let attack = action(AbilityName::Attack, BACKWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &attack, &mut log).expect("attack");

        assert_eq!(floor.unit(sludge).map(Unit::health), Some(12 - 3));
    }

    #[test]
    fn killing_blow_awards_victims_max_health() {
        let (mut floor, samurai) = corridor(4);
        let sludge = place(&mut floor, UnitKind::Sludge, 2);
        let attack = action(AbilityName::Attack, FORWARD);
        let mut log = Vec::new();

        for _ in 0..3 {
            perform(&mut floor, samurai, &attack, &mut log).expect("attack");
        }

        assert!(!floor.unit(sludge).is_some_and(Unit::is_alive));
        assert_eq!(floor.unit(samurai).map(Unit::score), Some(12));
    }

    #[test]
    fn shoot_hits_first_unit_in_range() {
        let (mut floor, samurai) = corridor(6);
        let near = place(&mut floor, UnitKind::Wizard, 3);
        let far = place(&mut floor, UnitKind::Archer, 4);
        let shoot = action(AbilityName::Shoot, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &shoot, &mut log).expect("shoot");

        assert_eq!(floor.unit(near).map(Unit::health), Some(0));
        assert_eq!(floor.unit(far).map(Unit::health), Some(7));
        assert_eq!(floor.unit(samurai).map(Unit::score), Some(3));
    }

    #[test]
    fn shoot_beyond_range_hits_nothing() {
        let (mut floor, samurai) = corridor(8);
        let archer = place(&mut floor, UnitKind::Archer, 5);
        let shoot = action(AbilityName::Shoot, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &shoot, &mut log).expect("shoot");

        assert_eq!(floor.unit(archer).map(Unit::health), Some(7));
        let missed = LogEvent::ShotNothing { direction: FORWARD };
        assert_eq!(last_event(&log), Some(&missed));
    }

    #[test]
    fn rest_heals_a_tenth_and_is_a_no_op_at_full_health() {
        let (mut floor, samurai) = corridor(3);
        let rest = StagedAction {
            name: AbilityName::Rest,
            target: Target::None,
        };
        let mut log = Vec::new();

        perform(&mut floor, samurai, &rest, &mut log).expect("rest");
        assert_eq!(last_event(&log), Some(&LogEvent::AlreadyFit));

        floor.unit_mut(samurai).expect("samurai").set_health(19);
        perform(&mut floor, samurai, &rest, &mut log).expect("rest");
        assert_eq!(floor.unit(samurai).map(Unit::health), Some(20));
        let rested = LogEvent::Rested {
            amount: 1,
            health: 20,
        };
        assert_eq!(last_event(&log), Some(&rested));
    }

    #[test]
    fn rescue_removes_captive_and_awards_points() {
        let (mut floor, samurai) = corridor(4);
        let captive = place(&mut floor, UnitKind::Captive, 2);
        let rescue = action(AbilityName::Rescue, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &rescue, &mut log).expect("rescue");

        assert!(!floor.unit(captive).is_some_and(Unit::is_alive));
        assert!(!floor.unit(captive).is_some_and(Unit::is_bound));
        assert_eq!(floor.unit(samurai).map(Unit::score), Some(20));
        assert_eq!(floor.units().count(), 1);
    }

    #[test]
    fn rescue_of_unbound_unit_is_a_no_op() {
        let (mut floor, samurai) = corridor(4);
        let sludge = place(&mut floor, UnitKind::Sludge, 2);
        let rescue = action(AbilityName::Rescue, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &rescue, &mut log).expect("rescue");

        assert!(floor.unit(sludge).is_some_and(Unit::is_alive));
        assert_eq!(floor.unit(samurai).map(Unit::score), Some(0));
    }

    #[test]
    fn bound_enemy_is_released_but_stays() {
        let (mut floor, samurai) = corridor(4);
        let sludge = place(&mut floor, UnitKind::Sludge, 2);
        let mut log = Vec::new();

        let bind = action(AbilityName::Bind, FORWARD);
        perform(&mut floor, samurai, &bind, &mut log).expect("bind");
        assert!(floor.space(Coord::new(2, 0)).is_captive());

        let rescue = action(AbilityName::Rescue, FORWARD);
        perform(&mut floor, samurai, &rescue, &mut log).expect("rescue");
        assert!(floor.space(Coord::new(2, 0)).is_enemy());
        assert!(floor.unit(sludge).is_some_and(Unit::is_alive));
        assert_eq!(floor.unit(samurai).map(Unit::score), Some(0));
    }

    #[test]
    fn binding_an_empty_cell_binds_nothing() {
        let (mut floor, samurai) = corridor(4);
        let bind = action(AbilityName::Bind, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &bind, &mut log).expect("bind");

        let missed = LogEvent::BoundNothing { direction: FORWARD };
        assert_eq!(last_event(&log), Some(&missed));
        assert_eq!(floor.units().count(), 1);
    }

    #[test]
    fn pivot_defaults_to_turning_around() {
        let (mut floor, samurai) = corridor(3);
        let target = Target::resolve(AbilityName::Pivot, &[]).expect("default direction");
        let pivot = StagedAction {
            name: AbilityName::Pivot,
            target,
        };
        let mut log = Vec::new();

        perform(&mut floor, samurai, &pivot, &mut log).expect("pivot");

        let facing = floor
            .unit(samurai)
            .and_then(Unit::position)
            .map(|position| position.facing());
        assert_eq!(facing, Some(AbsoluteDirection::West));
    }

    #[test]
    fn detonate_splashes_surrounding_cells() {
        let mut floor = Floor::new(5, 3, Coord::new(4, 2));
        let mut spawn = |kind, x, y| {
            floor
                .add(Unit::new(kind), Coord::new(x, y), AbsoluteDirection::East)
                .expect("unit placed")
        };
        let samurai = spawn(UnitKind::Samurai, 0, 1);
        let front = spawn(UnitKind::ThickSludge, 1, 1);
        let beside = spawn(UnitKind::ThickSludge, 1, 2);
        let behind = spawn(UnitKind::ThickSludge, 2, 1);
        let detonate = action(AbilityName::Detonate, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &detonate, &mut log).expect("detonate");

        assert_eq!(floor.unit(front).map(Unit::health), Some(16));
        assert_eq!(floor.unit(beside).map(Unit::health), Some(20));
        assert_eq!(floor.unit(behind).map(Unit::health), Some(20));
        assert_eq!(floor.unit(samurai).map(Unit::health), Some(16));
    }

    #[test]
    fn detonate_chains_into_ticking_units_instead_of_damaging_them() {
        let (mut floor, samurai) = corridor(5);
        let mut first = Unit::new(UnitKind::Captive);
        first.add_ability(AbilityName::Explode);
        let mut second = Unit::new(UnitKind::Captive);
        second.add_ability(AbilityName::Explode);
        let first = floor
            .add(first, Coord::new(2, 0), AbsoluteDirection::West)
            .expect("first");
        let second = floor
            .add(second, Coord::new(3, 0), AbsoluteDirection::West)
            .expect("second");
        let detonate = action(AbilityName::Detonate, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &detonate, &mut log).expect("detonate");

        let explosions: Vec<_> = log
            .iter()
            .filter(|entry| entry.event == LogEvent::Exploded)
            .map(|entry| entry.unit)
            .collect();
        assert_eq!(explosions, vec![Some(first)]);
        let chained: Vec<_> = log
            .iter()
            .filter(|entry| entry.event == LogEvent::CaughtInBlast)
            .map(|entry| entry.unit)
            .collect();
        assert_eq!(chained, vec![Some(first)]);
        let splash_on_ticking = log.iter().any(|entry| {
            entry.unit == Some(second)
                && matches!(entry.event, LogEvent::Damaged { amount, .. } if amount != 100)
        });
        assert!(!splash_on_ticking);
        assert_eq!(floor.units().count(), 0);
    }

    #[test]
    fn countdown_explodes_when_it_reaches_zero() {
        let (mut floor, samurai) = corridor(5);
        let mut bomb = Unit::new(UnitKind::Captive);
        bomb.add_ability(AbilityName::Explode);
        let mut config = AbilityConfig::new();
        let _ = config.insert("time".to_owned(), ConfigValue::Int(2));
        bomb.configure_ability(AbilityName::Explode, &config)
            .expect("configured");
        let bomb = floor
            .add(bomb, Coord::new(4, 0), AbsoluteDirection::West)
            .expect("bomb");
        let mut log = Vec::new();

        pass_turn(&mut floor, bomb, AbilityName::Explode, &mut log).expect("tick");
        assert_eq!(floor.units().count(), 2);
        pass_turn(&mut floor, bomb, AbilityName::Explode, &mut log).expect("tick");

        assert!(!floor.unit(samurai).is_some_and(Unit::is_alive));
        assert_eq!(floor.units().count(), 0);
        assert_eq!(
            log.iter()
                .filter(|entry| matches!(entry.event, LogEvent::Ticking { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn form_splits_health_into_a_golem() {
        let (mut floor, samurai) = corridor(4);
        floor.unit_mut(samurai).expect("samurai").set_health(15);
        let form = action(AbilityName::Form, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &form, &mut log).expect("form");

        assert_eq!(floor.unit(samurai).map(Unit::health), Some(8));
        let golem = floor.unit_at(Coord::new(2, 0)).expect("golem formed");
        assert_eq!(golem.kind(), UnitKind::Golem);
        assert_eq!(golem.health(), 7);
        assert_eq!(golem.max_health(), 7);
        let expected: Vec<_> = AbilityTuning::default().golem_abilities;
        assert_eq!(golem.ability_names().collect::<Vec<_>>(), expected);
        assert!(floor.space(Coord::new(2, 0)).is_player());
    }

    #[test]
    fn form_into_an_occupied_cell_is_blocked() {
        let (mut floor, samurai) = corridor(4);
        let sludge = place(&mut floor, UnitKind::Sludge, 2);
        let form = action(AbilityName::Form, FORWARD);
        let mut log = Vec::new();

        perform(&mut floor, samurai, &form, &mut log).expect("form");

        let blocked = LogEvent::FormBlocked { direction: FORWARD };
        assert_eq!(last_event(&log), Some(&blocked));
        assert_eq!(floor.unit(samurai).map(Unit::health), Some(20));
        assert_eq!(floor.unit_at(Coord::new(2, 0)).map(Unit::id), Some(sludge));
        assert_eq!(floor.units().count(), 2);
    }

    #[test]
    fn arguments_are_validated_against_signature() {
        assert_eq!(
            Target::resolve(AbilityName::Walk, &[]),
            Ok(Target::Direction(FORWARD))
        );
        assert!(Target::resolve(AbilityName::Rest, &[RelativeDirection::Left.into()]).is_err());
        assert!(Target::resolve(AbilityName::DistanceOf, &[]).is_err());
        assert!(Target::resolve(AbilityName::Walk, &[Coord::new(0, 0).into()]).is_err());
        assert_eq!(
            Argument::direction("upward"),
            Err(DirectionError::Unknown("upward".to_owned()))
        );
    }

    #[test]
    fn senses_cannot_be_performed() {
        let (mut floor, samurai) = corridor(3);
        let mut log = Vec::new();
        let feel = action(AbilityName::Feel, FORWARD);
        assert_eq!(
            perform(&mut floor, samurai, &feel, &mut log),
            Err(AbilityError::WrongKind(AbilityName::Feel))
        );
    }
}

//! English rendering of the engine's narrative log.

use samurai_tower_core::{LogEntry, LogEvent};
use samurai_tower_world::{Floor, Unit};

/// Formats `entry` as a sentence naming the unit it concerns.
pub(crate) fn narrate(floor: &Floor, entry: &LogEntry) -> String {
    let subject = entry
        .unit
        .and_then(|id| floor.unit(id))
        .map_or("something", Unit::name);
    format!("{subject} {}", describe(&entry.event))
}

fn describe(event: &LogEvent) -> String {
    match event {
        LogEvent::Walked { direction } => format!("walks {direction}"),
        LogEvent::Bumped {
            direction,
            obstacle,
        } => format!("bumps into {obstacle} walking {direction}"),
        LogEvent::Attacked { direction, target } => {
            format!("attacks {direction} and hits {target}")
        }
        LogEvent::AttackedNothing { direction } => format!("attacks {direction} and hits nothing"),
        LogEvent::Shot { direction, target } => format!("shoots {direction} and hits {target}"),
        LogEvent::ShotNothing { direction } => format!("shoots {direction} and hits nothing"),
        LogEvent::Damaged { amount, health } => {
            format!("takes {amount} damage, {health} health power left")
        }
        LogEvent::Died => "dies".to_owned(),
        LogEvent::EarnedPoints { points } => format!("earns {points} points"),
        LogEvent::Rested { amount, health } => {
            format!("receives {amount} health from resting, up to {health} health")
        }
        LogEvent::AlreadyFit => "is already fit as a fiddle".to_owned(),
        LogEvent::Rescued { direction, target } => {
            format!("unbinds {direction} and rescues {target}")
        }
        LogEvent::Unbound { direction, target } => {
            format!("unbinds {direction} and releases {target}")
        }
        LogEvent::RescuedNothing { direction } => {
            format!("unbinds {direction} and rescues nothing")
        }
        LogEvent::Released => "is released from bonds".to_owned(),
        LogEvent::Bound { direction, target } => {
            format!("binds {direction} and restricts {target}")
        }
        LogEvent::BoundNothing { direction } => format!("binds {direction} and restricts nothing"),
        LogEvent::Pivoted { direction } => format!("pivots {direction}"),
        LogEvent::Detonated { direction } => format!("detonates a bomb {direction}"),
        LogEvent::CaughtInBlast => "is caught in the blast, detonating its explosives".to_owned(),
        LogEvent::Exploded => "explodes, collapsing the ceiling and damaging every unit".to_owned(),
        LogEvent::Ticking { remaining } => format!("is ticking, {remaining} turns left"),
        LogEvent::Formed { direction, health } => {
            format!("forms a golem {direction} and gives it {health} health")
        }
        LogEvent::FormBlocked { direction } => format!("fails to form a golem {direction}"),
        LogEvent::Idle => "does nothing".to_owned(),
    }
}

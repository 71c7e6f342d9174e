//! Unit state and the per-tick prepare/perform lifecycle.

use samurai_tower_core::{
    AbilityConfig, AbilityName, LogEntry, LogEvent, UnitId, UnitKind, UnitStats,
};
use tracing::debug;

use crate::{
    abilities::{self, Ability, AbilityError},
    behavior,
    position::Position,
    turn::{Player, PlayerError, StagedAction, Turn},
    Floor,
};

/// Any entity standing on a floor: the samurai, allies, enemies and captives.
///
/// A unit is alive exactly while it holds a [`Position`]. Death and rescue
/// clear the position; nothing else records them.
#[derive(Clone, Debug)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
    health: i32,
    stats: UnitStats,
    abilities: Vec<Ability>,
    bound: bool,
    position: Option<Position>,
    score: u32,
    staged: Option<StagedAction>,
}

impl Unit {
    /// Creates a unit with the kind's authored stats and innate abilities.
    ///
    /// The identifier is assigned when the unit is added to a floor.
    #[must_use]
    pub fn new(kind: UnitKind) -> Self {
        let stats = kind.base_stats();
        let mut unit = Self {
            id: UnitId::new(0),
            kind,
            health: stats.max_health,
            stats,
            abilities: Vec::new(),
            bound: kind.starts_bound(),
            position: None,
            score: 0,
            staged: None,
        };
        for name in kind.innate_abilities() {
            unit.add_ability(*name);
        }
        unit
    }

    /// Replaces the unit's stats and resets health to the new maximum.
    #[must_use]
    pub fn with_stats(mut self, stats: UnitStats) -> Self {
        self.stats = stats;
        self.health = stats.max_health;
        self
    }

    /// Identifier assigned by the floor.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: UnitId) {
        self.id = id;
    }

    /// Kind of unit.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Display key of the unit.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.key()
    }

    /// Glyph drawn for the unit.
    #[must_use]
    pub const fn character(&self) -> char {
        self.kind.glyph()
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health, also the points awarded for defeating the unit.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.stats.max_health
    }

    /// Melee damage.
    #[must_use]
    pub const fn attack_power(&self) -> i32 {
        self.stats.attack_power
    }

    /// Ranged damage.
    #[must_use]
    pub const fn shoot_power(&self) -> i32 {
        self.stats.shoot_power
    }

    /// Current location and facing; `None` once the unit died or left.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    pub(crate) fn position_mut(&mut self) -> Option<&mut Position> {
        self.position.as_mut()
    }

    pub(crate) fn place(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub(crate) fn clear_position(&mut self) {
        self.position = None;
    }

    /// Reports whether the unit still stands on the floor.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.position.is_some()
    }

    /// Reports whether the unit is bound.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    /// Restrains the unit. Bound units skip their staged actions.
    pub fn bind(&mut self) {
        self.bound = true;
    }

    /// Releases the unit's bonds.
    pub fn unbind(&mut self, log: &mut Vec<LogEntry>) {
        self.bound = false;
        log.push(LogEntry::new(self.id, LogEvent::Released));
    }

    /// Points earned so far. Only the samurai keeps score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Credits points to the samurai; other kinds ignore them.
    pub fn earn_points(&mut self, points: u32, log: &mut Vec<LogEntry>) {
        if self.kind != UnitKind::Samurai {
            return;
        }
        self.score = self.score.saturating_add(points);
        log.push(LogEntry::new(self.id, LogEvent::EarnedPoints { points }));
    }

    /// Applies damage, releasing bonds first. Lethal damage clears the
    /// position in the same call. Returns whether the unit died.
    pub fn take_damage(&mut self, amount: i32, log: &mut Vec<LogEntry>) -> bool {
        if self.bound {
            self.unbind(log);
        }
        self.health -= amount;
        log.push(LogEntry::new(
            self.id,
            LogEvent::Damaged {
                amount,
                health: self.health,
            },
        ));
        if self.health <= 0 && self.position.is_some() {
            self.position = None;
            log.push(LogEntry::new(self.id, LogEvent::Died));
            return true;
        }
        false
    }

    /// Restores health without exceeding the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.stats.max_health);
    }

    pub(crate) fn set_health(&mut self, health: i32) {
        self.health = health;
    }

    /// Grants an ability. Granting an ability twice keeps the first instance.
    pub fn add_ability(&mut self, name: AbilityName) {
        if !self.has_ability(name) {
            self.abilities.push(Ability::for_name(name));
        }
    }

    /// Reports whether the unit carries the ability.
    #[must_use]
    pub fn has_ability(&self, name: AbilityName) -> bool {
        self.abilities.iter().any(|ability| ability.name() == name)
    }

    /// Ability instance carried under `name`.
    #[must_use]
    pub fn ability(&self, name: AbilityName) -> Option<&Ability> {
        self.abilities.iter().find(|ability| ability.name() == name)
    }

    pub(crate) fn ability_mut(&mut self, name: AbilityName) -> Option<&mut Ability> {
        self.abilities
            .iter_mut()
            .find(|ability| ability.name() == name)
    }

    /// Names of carried abilities in the order they were granted.
    pub fn ability_names(&self) -> impl Iterator<Item = AbilityName> + '_ {
        self.abilities.iter().map(Ability::name)
    }

    /// Applies key-value overrides onto a carried ability instance.
    pub fn configure_ability(
        &mut self,
        name: AbilityName,
        config: &AbilityConfig,
    ) -> Result<(), AbilityError> {
        let ability = self
            .ability_mut(name)
            .ok_or(AbilityError::NotCarried(name))?;
        for (field, value) in config {
            ability.configure(field, value)?;
        }
        Ok(())
    }

    /// Records the action decided during the prepare phase.
    pub fn stage(&mut self, action: Option<StagedAction>) {
        self.staged = action;
    }

    /// Action recorded for the current tick, if any.
    #[must_use]
    pub const fn staged(&self) -> Option<&StagedAction> {
        self.staged.as_ref()
    }

    fn take_staged(&mut self) -> Option<StagedAction> {
        self.staged.take()
    }
}

/// Runs the unit's decision logic against an unchanging floor and returns
/// the action it chose, without executing it.
///
/// The samurai is driven by [`Player::play_turn`], golems by
/// [`Player::play_ally_turn`], and every other kind by its built-in behavior.
pub fn prepare_turn(
    floor: &Floor,
    id: UnitId,
    player: &mut dyn Player,
) -> Result<Option<StagedAction>, PlayerError> {
    let mut turn = Turn::new(floor, id)?;
    let kind = turn.unit().kind();
    match kind {
        UnitKind::Samurai => player.play_turn(&mut turn)?,
        UnitKind::Golem => player.play_ally_turn(&mut turn)?,
        kind => behavior::play(kind, &mut turn)?,
    }
    Ok(turn.into_action())
}

/// Runs every ability's pass-turn hook, then the staged action unless the
/// unit is bound. Dead units are skipped.
pub fn perform_turn(
    floor: &mut Floor,
    id: UnitId,
    log: &mut Vec<LogEntry>,
) -> Result<(), AbilityError> {
    let unit = floor.unit_mut(id).ok_or(AbilityError::MissingUnit(id))?;
    if !unit.is_alive() {
        return Ok(());
    }
    let staged = unit.take_staged();
    let passing: Vec<AbilityName> = unit
        .abilities
        .iter()
        .filter(|ability| ability.passes_turn())
        .map(Ability::name)
        .collect();

    for name in passing {
        abilities::pass_turn(floor, id, name, log)?;
    }

    let unit = floor.unit(id).ok_or(AbilityError::MissingUnit(id))?;
    if !unit.is_alive() {
        return Ok(());
    }
    let bound = unit.is_bound();
    let kind = unit.kind();
    match staged {
        Some(action) if !bound => {
            debug!(unit = id.get(), action = %action.name, "performing staged action");
            abilities::perform(floor, id, &action, log)
        }
        Some(_) => Ok(()),
        None => {
            if kind == UnitKind::Samurai {
                log.push(LogEntry::new(id, LogEvent::Idle));
            }
            Ok(())
        }
    }
}

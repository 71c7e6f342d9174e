#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level run-loop: builds a floor from a definition and plays it tick by tick.
//!
//! Each tick runs in two phases. Every living unit first decides against the
//! floor as it stood when the tick began; only then are the staged actions
//! performed in registration order.

use samurai_tower_core::{
    AbilityName, Coord, LevelDefinition, LogEntry, UnitDefinition, UnitId, UnitKind,
};
use samurai_tower_world::{
    perform_turn, prepare_turn, AbilityError, Floor, FloorError, Player, PlayerError, Unit,
};
use thiserror::Error;
use tracing::{debug, info, info_span};

pub mod scoring;

pub use scoring::{grade_letter, LevelResult};

/// Errors raised while setting up or playing a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The stairs lie outside the floor.
    #[error("stairs at {0} lie outside the floor")]
    StairsOutOfBounds(Coord),
    /// A unit could not be placed.
    #[error("failed to place {kind}: {source}")]
    Placement {
        /// Kind of the rejected unit.
        kind: UnitKind,
        /// Why the floor rejected it.
        #[source]
        source: FloorError,
    },
    /// Ability configuration or execution failed.
    #[error(transparent)]
    Ability(#[from] AbilityError),
    /// Decision logic failed; the run is aborted.
    #[error(transparent)]
    Player(#[from] PlayerError),
    /// The samurai's registry entry is missing.
    #[error("the samurai is not registered on the floor")]
    MissingSamurai,
}

/// A level being played.
#[derive(Debug)]
pub struct Level {
    definition: LevelDefinition,
    floor: Floor,
    samurai: UnitId,
    turns: u32,
    time_bonus: u32,
    log: Vec<LogEntry>,
}

impl Level {
    /// Builds the floor described by `definition`.
    ///
    /// The samurai receives `starting_abilities` followed by the abilities
    /// the level unlocks.
    pub fn setup(
        definition: LevelDefinition,
        starting_abilities: &[AbilityName],
    ) -> Result<Self, LevelError> {
        let mut floor = Floor::new(
            definition.size.width,
            definition.size.height,
            definition.stairs,
        )
        .with_tuning(definition.tuning.clone());
        if floor.is_out_of_bounds(definition.stairs) {
            return Err(LevelError::StairsOutOfBounds(definition.stairs));
        }

        let start = &definition.samurai;
        let mut samurai = Unit::new(UnitKind::Samurai);
        for name in starting_abilities.iter().chain(&start.abilities) {
            samurai.add_ability(*name);
        }
        let samurai = floor
            .add(samurai, start.coord(), start.facing)
            .map_err(|source| LevelError::Placement {
                kind: UnitKind::Samurai,
                source,
            })?;

        for placement in &definition.units {
            let unit = build_unit(placement)?;
            let _ = floor
                .add(unit, placement.coord(), placement.facing)
                .map_err(|source| LevelError::Placement {
                    kind: placement.kind,
                    source,
                })?;
        }

        info!(
            width = definition.size.width,
            height = definition.size.height,
            units = definition.units.len(),
            "level set up"
        );
        let time_bonus = definition.time_bonus;
        Ok(Self {
            definition,
            floor,
            samurai,
            turns: 0,
            time_bonus,
            log: Vec::new(),
        })
    }

    /// Plays one tick. Returns whether play may continue afterwards; a level
    /// that is already over returns `false` without doing anything.
    pub fn step(&mut self, player: &mut dyn Player) -> Result<bool, LevelError> {
        if self.is_over() {
            return Ok(false);
        }
        let span = info_span!("tick", turn = self.turns + 1);
        let _entered = span.enter();

        let acting = self.floor.unit_ids();
        let mut decisions = Vec::with_capacity(acting.len());
        for id in &acting {
            decisions.push((*id, prepare_turn(&self.floor, *id, player)?));
        }
        for (id, action) in decisions {
            if let Some(unit) = self.floor.unit_mut(id) {
                unit.stage(action);
            }
        }

        for id in self.floor.unit_ids() {
            perform_turn(&mut self.floor, id, &mut self.log)?;
        }

        self.turns += 1;
        self.time_bonus = self.time_bonus.saturating_sub(1);
        debug!(time_bonus = self.time_bonus, "tick finished");

        if self.is_passed() {
            info!(turns = self.turns, "samurai reached the stairs");
        } else if self.is_failed() {
            info!(turns = self.turns, "samurai died");
        }
        Ok(!self.is_over())
    }

    /// Steps until the level is over or `max_turns` ticks have been played.
    pub fn play(
        &mut self,
        player: &mut dyn Player,
        max_turns: u32,
    ) -> Result<LevelResult, LevelError> {
        while self.turns < max_turns && self.step(player)? {}
        Ok(self.result())
    }

    /// The samurai stands on the stairs.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        let stairs = self.floor.stairs();
        self.floor
            .unit(self.samurai)
            .and_then(Unit::position)
            .is_some_and(|position| position.coord() == stairs)
    }

    /// The samurai is dead.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        !self.floor.unit(self.samurai).is_some_and(Unit::is_alive)
    }

    fn is_over(&self) -> bool {
        self.is_passed() || self.is_failed()
    }

    /// Score and grade as of the current tick.
    #[must_use]
    pub fn result(&self) -> LevelResult {
        let warrior_score = self.floor.unit(self.samurai).map_or(0, Unit::score);
        LevelResult::new(
            self.is_passed(),
            self.is_failed(),
            self.turns,
            warrior_score,
            self.time_bonus,
            self.floor.other_units().next().is_none(),
            self.definition.ace_score,
        )
    }

    /// Removes and returns the narrative log collected so far.
    pub fn drain_log(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.log)
    }

    /// The floor being played.
    #[must_use]
    pub const fn floor(&self) -> &Floor {
        &self.floor
    }

    /// The samurai's registry entry.
    pub fn samurai(&self) -> Result<&Unit, LevelError> {
        self.floor
            .unit(self.samurai)
            .ok_or(LevelError::MissingSamurai)
    }

    /// Definition the level was built from.
    #[must_use]
    pub const fn definition(&self) -> &LevelDefinition {
        &self.definition
    }

    /// Ticks played so far.
    #[must_use]
    pub const fn turns(&self) -> u32 {
        self.turns
    }

    /// Time bonus still available.
    #[must_use]
    pub const fn time_bonus(&self) -> u32 {
        self.time_bonus
    }
}

fn build_unit(placement: &UnitDefinition) -> Result<Unit, LevelError> {
    let mut stats = placement.kind.base_stats();
    if let Some(max_health) = placement.max_health {
        stats.max_health = max_health;
    }
    if let Some(attack_power) = placement.attack_power {
        stats.attack_power = attack_power;
    }
    if let Some(shoot_power) = placement.shoot_power {
        stats.shoot_power = shoot_power;
    }

    let mut unit = Unit::new(placement.kind).with_stats(stats);
    for name in &placement.abilities {
        unit.add_ability(*name);
    }
    for (name, config) in &placement.ability_config {
        unit.configure_ability(*name, config)?;
    }
    Ok(unit)
}

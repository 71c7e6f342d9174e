#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign layer: chains the levels of a tower for one player profile.
//!
//! Passing a level carries its unlocked abilities and score into the
//! [`Profile`]; epic mode replays the whole tower with every ability
//! unlocked and grades each level.

use std::{collections::BTreeMap, fmt::Write as _};

use samurai_tower_system_level::{grade_letter, Level, LevelError, LevelResult};
use samurai_tower_world::Player;
use thiserror::Error;
use tracing::info;

pub mod profile;
pub mod tower;

pub use profile::Profile;
pub use tower::Tower;

/// Turn cap applied when none is configured.
pub const DEFAULT_MAX_TURNS: u32 = 1000;

/// Errors raised while playing a tower.
#[derive(Debug, Error)]
pub enum GameError {
    /// The tower holds no levels.
    #[error("tower `{0}` has no levels")]
    EmptyTower(String),
    /// The profile points at a level the tower does not have.
    #[error("level {0} does not exist in this tower")]
    MissingLevel(u32),
    /// Setting up or playing the level failed.
    #[error("level {number} aborted: {source}")]
    Level {
        /// Level being played.
        number: u32,
        /// Underlying failure.
        #[source]
        source: LevelError,
    },
}

/// Outcome of one epic run.
#[derive(Clone, Debug, PartialEq)]
pub struct EpicReport {
    /// Results of every level played, in order.
    pub results: Vec<(u32, LevelResult)>,
    /// Every level was passed.
    pub completed: bool,
    /// Sum of the passed levels' totals.
    pub total_score: u32,
    /// Grade ratio per level number.
    pub grades: BTreeMap<u32, f64>,
}

impl EpicReport {
    /// Average of the recorded grade ratios.
    #[must_use]
    pub fn average_grade(&self) -> Option<f64> {
        if self.grades.is_empty() {
            return None;
        }
        Some(self.grades.values().sum::<f64>() / self.grades.len() as f64)
    }

    /// Summary listing the average grade and each level's grade, or `None`
    /// when no level was graded.
    #[must_use]
    pub fn final_report(&self) -> Option<String> {
        let average = self.average_grade()?;
        let mut report = format!(
            "Your average grade for this tower is: {}\n\n",
            grade_letter(average)
        );
        for (number, grade) in &self.grades {
            let _ = writeln!(report, "  Level {number}: {}", grade_letter(*grade));
        }
        Some(report)
    }
}

/// A tower played by one profile.
#[derive(Debug)]
pub struct Game {
    tower: Tower,
    profile: Profile,
    max_turns: u32,
}

impl Game {
    /// Couples a tower with a profile.
    #[must_use]
    pub fn new(tower: Tower, profile: Profile) -> Self {
        Self {
            tower,
            profile,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Caps the number of ticks any single level may run.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Tower being played.
    #[must_use]
    pub const fn tower(&self) -> &Tower {
        &self.tower
    }

    /// Profile being advanced.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Mutable access to the profile, e.g. to choose a practice level.
    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    /// Hands the profile back for persistence.
    #[must_use]
    pub fn into_profile(self) -> Profile {
        self.profile
    }

    /// Moves a profile that has not started yet to the first level.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.tower.is_empty() {
            return Err(GameError::EmptyTower(self.tower.name().to_owned()));
        }
        if self.profile.level_number() == 0 {
            self.profile.set_level_number(1);
            info!(tower = self.tower.name(), "tower started");
        }
        Ok(())
    }

    /// Plays the profile's current level and returns the finished level.
    ///
    /// A pass unlocks the level's abilities and adds its total score to the
    /// profile.
    pub fn play_level(&mut self, player: &mut dyn Player) -> Result<Level, GameError> {
        let number = self.profile.level_number();
        let (level, result) = self.run_level(number, player)?;
        if result.passed {
            self.profile
                .add_abilities(&level.definition().samurai.abilities);
            self.profile.add_score(result.total_score);
            info!(
                level = number,
                total_score = result.total_score,
                profile_score = self.profile.score(),
                "level passed"
            );
        } else {
            info!(level = number, failed = result.failed, "level not passed");
        }
        Ok(level)
    }

    /// Moves to the next level if there is one, returning whether it moved.
    pub fn advance_level(&mut self) -> bool {
        let next = self.profile.level_number().saturating_add(1);
        if !self.tower.has_level(next) {
            return false;
        }
        self.profile.set_level_number(next);
        true
    }

    /// Plays every level in order with fresh epic totals, stopping at the
    /// first level that is not passed.
    pub fn play_epic(&mut self, player: &mut dyn Player) -> Result<EpicReport, GameError> {
        if self.tower.is_empty() {
            return Err(GameError::EmptyTower(self.tower.name().to_owned()));
        }
        self.profile.enable_epic_mode();
        self.profile.reset_current_epic();

        let mut results = Vec::new();
        let mut completed = true;
        for number in 1..=self.tower.len() {
            self.profile.set_level_number(number);
            let (level, result) = self.run_level(number, player)?;
            results.push((number, result.clone()));
            if !result.passed {
                info!(level = number, "epic run ended");
                completed = false;
                break;
            }
            self.profile
                .add_abilities(&level.definition().samurai.abilities);
            self.profile.add_current_epic_score(result.total_score);
            if let Some(grade) = result.grade {
                self.profile.record_epic_grade(number, grade);
            }
        }

        if completed {
            self.profile.update_epic_score();
        }
        Ok(EpicReport {
            results,
            completed,
            total_score: self.profile.current_epic_score(),
            grades: self.profile.current_epic_grades().clone(),
        })
    }

    fn run_level(
        &self,
        number: u32,
        player: &mut dyn Player,
    ) -> Result<(Level, LevelResult), GameError> {
        let definition = self
            .tower
            .level(number)
            .ok_or(GameError::MissingLevel(number))?
            .clone();
        info!(level = number, "playing level");
        let wrap = |source| GameError::Level { number, source };
        let mut level = Level::setup(definition, self.profile.abilities()).map_err(wrap)?;
        let result = level.play(player, self.max_turns).map_err(wrap)?;
        Ok((level, result))
    }
}

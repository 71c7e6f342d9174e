//! Persisted progression of a player through a tower.

use std::collections::BTreeMap;

use samurai_tower_core::AbilityName;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Progression carried between levels and sessions.
///
/// Epic mode replays the whole tower in one go. While it is active the
/// normal-mode level pointer is parked in `last_level_number`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    player_name: String,
    tower_name: String,
    #[serde(default)]
    abilities: Vec<AbilityName>,
    #[serde(default)]
    score: u32,
    #[serde(default)]
    level_number: u32,
    #[serde(default)]
    epic: bool,
    #[serde(default)]
    epic_score: u32,
    #[serde(default)]
    current_epic_score: u32,
    #[serde(default)]
    current_epic_grades: BTreeMap<u32, f64>,
    #[serde(default)]
    average_grade: Option<f64>,
    #[serde(default)]
    last_level_number: Option<u32>,
}

impl Profile {
    /// Creates a fresh profile that has not started the tower.
    #[must_use]
    pub fn new(player_name: impl Into<String>, tower_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            tower_name: tower_name.into(),
            abilities: Vec::new(),
            score: 0,
            level_number: 0,
            epic: false,
            epic_score: 0,
            current_epic_score: 0,
            current_epic_grades: BTreeMap::new(),
            average_grade: None,
            last_level_number: None,
        }
    }

    /// Player name.
    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Tower the profile climbs.
    #[must_use]
    pub fn tower_name(&self) -> &str {
        &self.tower_name
    }

    /// Abilities unlocked so far, in unlock order.
    #[must_use]
    pub fn abilities(&self) -> &[AbilityName] {
        &self.abilities
    }

    /// Unlocks abilities, ignoring ones already held.
    pub fn add_abilities(&mut self, names: &[AbilityName]) {
        for name in names {
            if !self.abilities.contains(name) {
                self.abilities.push(*name);
            }
        }
    }

    /// Accumulated score from normal-mode levels.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Adds points to the accumulated score.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Current level, counting from one; zero before the tower is started.
    #[must_use]
    pub const fn level_number(&self) -> u32 {
        self.level_number
    }

    /// Moves the level pointer.
    pub fn set_level_number(&mut self, level_number: u32) {
        self.level_number = level_number;
    }

    /// Reports whether epic mode is active.
    #[must_use]
    pub const fn is_epic(&self) -> bool {
        self.epic
    }

    /// Switches to epic mode, parking the normal-mode level pointer.
    pub fn enable_epic_mode(&mut self) {
        self.epic = true;
        if self.last_level_number.is_none() {
            self.last_level_number = Some(self.level_number);
        }
        info!(player = %self.player_name, "epic mode enabled");
    }

    /// Leaves epic mode, restoring the parked level pointer and clearing
    /// epic progress.
    pub fn enable_normal_mode(&mut self) {
        self.epic = false;
        self.epic_score = 0;
        self.current_epic_score = 0;
        self.current_epic_grades.clear();
        self.average_grade = None;
        if let Some(level_number) = self.last_level_number.take() {
            self.level_number = level_number;
        }
        info!(player = %self.player_name, "normal mode restored");
    }

    /// Best epic score recorded.
    #[must_use]
    pub const fn epic_score(&self) -> u32 {
        self.epic_score
    }

    /// Score of the epic run in progress.
    #[must_use]
    pub const fn current_epic_score(&self) -> u32 {
        self.current_epic_score
    }

    /// Grades of the epic run in progress, keyed by level number.
    #[must_use]
    pub const fn current_epic_grades(&self) -> &BTreeMap<u32, f64> {
        &self.current_epic_grades
    }

    /// Average grade of the best epic run.
    #[must_use]
    pub const fn average_grade(&self) -> Option<f64> {
        self.average_grade
    }

    /// Level pointer parked while epic mode is active.
    #[must_use]
    pub const fn last_level_number(&self) -> Option<u32> {
        self.last_level_number
    }

    /// Clears the scratch totals before a new epic run.
    pub fn reset_current_epic(&mut self) {
        self.current_epic_score = 0;
        self.current_epic_grades.clear();
    }

    /// Adds a passed level's total to the epic run in progress.
    pub fn add_current_epic_score(&mut self, points: u32) {
        self.current_epic_score = self.current_epic_score.saturating_add(points);
    }

    /// Records the grade ratio earned on `level_number` during the epic run.
    pub fn record_epic_grade(&mut self, level_number: u32, grade: f64) {
        let _ = self.current_epic_grades.insert(level_number, grade);
    }

    /// Keeps the epic run in progress if it beat the best one, recomputing
    /// the average grade.
    pub fn update_epic_score(&mut self) {
        if self.current_epic_score > self.epic_score {
            self.epic_score = self.current_epic_score;
            self.average_grade = self.calculate_average_grade();
            info!(
                player = %self.player_name,
                epic_score = self.epic_score,
                "new best epic score"
            );
        }
    }

    /// Mean of the grades recorded during the epic run in progress.
    #[must_use]
    pub fn calculate_average_grade(&self) -> Option<f64> {
        if self.current_epic_grades.is_empty() {
            return None;
        }
        let sum: f64 = self.current_epic_grades.values().sum();
        Some(sum / self.current_epic_grades.len() as f64)
    }
}

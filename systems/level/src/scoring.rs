//! Level outcome, score components, and grading.

use serde::Serialize;

/// Grade thresholds, best first. Ratios below the last threshold earn `F`.
const GRADE_THRESHOLDS: [(f64, char); 5] =
    [(1.0, 'S'), (0.9, 'A'), (0.8, 'B'), (0.7, 'C'), (0.6, 'D')];

/// Share of the base and time scores awarded for clearing every other unit.
const CLEAR_BONUS_FRACTION: f64 = 0.2;

/// Converts a score ratio against the ace score into a letter grade.
#[must_use]
pub fn grade_letter(ratio: f64) -> char {
    GRADE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map_or('F', |(_, letter)| *letter)
}

/// Bonus for leaving no other unit on the floor.
#[must_use]
pub fn clear_bonus(warrior_score: u32, time_bonus: u32) -> u32 {
    let base = f64::from(warrior_score) + f64::from(time_bonus);
    (base * CLEAR_BONUS_FRACTION).round() as u32
}

/// Outcome of a level run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelResult {
    /// The samurai reached the stairs.
    pub passed: bool,
    /// The samurai died.
    pub failed: bool,
    /// Ticks played.
    pub turns: u32,
    /// Points earned by the samurai during play.
    pub warrior_score: u32,
    /// Time bonus left when the level was passed.
    pub time_bonus: u32,
    /// Bonus for clearing the floor.
    pub clear_bonus: u32,
    /// Sum of every component.
    pub total_score: u32,
    /// Total score divided by the ace score.
    pub grade: Option<f64>,
    /// Letter for [`LevelResult::grade`].
    pub grade_letter: Option<char>,
}

impl LevelResult {
    /// Assembles a result. Bonuses only count once the level is passed.
    #[must_use]
    pub fn new(
        passed: bool,
        failed: bool,
        turns: u32,
        warrior_score: u32,
        time_bonus: u32,
        cleared: bool,
        ace_score: Option<u32>,
    ) -> Self {
        let time_bonus = if passed { time_bonus } else { 0 };
        let clear_bonus = if passed && cleared {
            clear_bonus(warrior_score, time_bonus)
        } else {
            0
        };
        let total_score = warrior_score + time_bonus + clear_bonus;
        let grade = ace_score
            .filter(|ace| *ace > 0)
            .map(|ace| f64::from(total_score) / f64::from(ace));
        Self {
            passed,
            failed,
            turns,
            warrior_score,
            time_bonus,
            clear_bonus,
            total_score,
            grade,
            grade_letter: grade.map(grade_letter),
        }
    }
}

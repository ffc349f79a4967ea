//! Score calculator.
//!
//! ```text
//! score  = matches * 100
//!        + remaining_seconds * 10          (timed games)
//!        - wasted_attempts * 5
//! score *= difficulty multiplier           (1, 1.5, 2, 3)
//! score += 500                             (perfect play)
//! score  = max(0, round(score))
//! ```
//!
//! `moves` here counts flip attempts (two flips each). An attempt is wasted
//! when it did not produce a match, so perfect play is `moves == matches`.

use crate::core::{Difficulty, Seconds};

/// Points per matched pair.
pub const MATCH_POINTS: u32 = 100;

/// Points per second left on the clock.
pub const TIME_BONUS_PER_SECOND: u32 = 10;

/// Points lost per wasted attempt.
pub const MOVE_PENALTY: u32 = 5;

/// Bonus for never missing.
pub const PERFECT_BONUS: u32 = 500;

/// Score multiplier per difficulty.
#[must_use]
pub const fn difficulty_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 1.5,
        Difficulty::Hard => 2.0,
        Difficulty::Expert => 3.0,
    }
}

/// Flat bonus added to earned points per difficulty.
#[must_use]
pub const fn difficulty_bonus(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 25,
        Difficulty::Hard => 50,
        Difficulty::Expert => 100,
    }
}

/// Points for the seconds remaining under `time_limit`.
#[must_use]
pub fn time_bonus(time_elapsed: Seconds, time_limit: Option<Seconds>) -> u32 {
    time_limit
        .map(|limit| limit.saturating_sub(time_elapsed).saturating_mul(TIME_BONUS_PER_SECOND))
        .unwrap_or(0)
}

/// Compute a session score. Never negative.
///
/// With no matches nothing is earned: neither the time bonus nor the
/// perfect-play bonus applies.
///
/// ```
/// use memory_match::core::Difficulty;
/// use memory_match::scoring::calculate_score;
///
/// assert_eq!(calculate_score(6, 6, 0, Difficulty::Easy, None), 1100);
/// assert_eq!(calculate_score(0, 0, 0, Difficulty::Expert, Some(300)), 0);
/// ```
#[must_use]
pub fn calculate_score(
    matches: u32,
    moves: u32,
    time_elapsed: Seconds,
    difficulty: Difficulty,
    time_limit: Option<Seconds>,
) -> u32 {
    if matches == 0 {
        return 0;
    }

    // Products can exceed u32 for large counts or limits.
    let mut score = f64::from(matches) * f64::from(MATCH_POINTS);
    score += f64::from(time_bonus(time_elapsed, time_limit));
    score -= f64::from(moves.saturating_sub(matches)) * f64::from(MOVE_PENALTY);
    score *= difficulty_multiplier(difficulty);

    if moves == matches {
        score += f64::from(PERFECT_BONUS);
    }

    // `as` saturates at u32::MAX.
    score.round().max(0.0) as u32
}

/// Convert a score into persistent reward points.
///
/// ```
/// use memory_match::core::Difficulty;
/// use memory_match::scoring::calculate_earned_points;
///
/// assert_eq!(calculate_earned_points(1234, Difficulty::Hard), 123 + 50);
/// ```
#[must_use]
pub fn calculate_earned_points(score: u32, difficulty: Difficulty) -> u32 {
    score / 10 + difficulty_bonus(difficulty)
}

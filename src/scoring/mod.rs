//! Scoring: final-score formula, earned points and time-attack combos.
//!
//! Everything here is a pure function of its inputs. The reducer calls
//! `calculate_score` on every match; the session uses `ComboState` to track
//! quick consecutive matches in time-attack mode.

mod combo;
mod score;

pub use combo::{ComboState, COMBO_MATCH_BONUS, MAX_COMBO_MULTIPLIER};
pub use score::{
    calculate_earned_points, calculate_score, difficulty_bonus, difficulty_multiplier,
    time_bonus, MATCH_POINTS, MOVE_PENALTY, PERFECT_BONUS, TIME_BONUS_PER_SECOND,
};

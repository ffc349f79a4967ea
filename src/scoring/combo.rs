//! Time-attack combo tracking.
//!
//! A match within the combo window of the previous one extends the combo;
//! otherwise the combo restarts at 1. The multiplier is
//! `min(count / 3 + 1, 5)`. `max_combo` is a running maximum and is never
//! lowered mid-game.

use serde::{Deserialize, Serialize};

use crate::core::{Seconds, Timestamp};

/// Multiplier ceiling.
pub const MAX_COMBO_MULTIPLIER: u32 = 5;

/// Bonus points per multiplier step above 1, added on every match.
pub const COMBO_MATCH_BONUS: u32 = 25;

/// Combo counters for a time-attack session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    pub multiplier: u32,
    /// Game-clock milliseconds of the last match. Paused time is excluded.
    pub last_match_at: Option<Timestamp>,
    pub max_combo: u32,
    /// Accumulated combo bonus points.
    pub bonus: u32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            count: 0,
            multiplier: 1,
            last_match_at: None,
            max_combo: 0,
            bonus: 0,
        }
    }
}

impl ComboState {
    /// Multiplier for a combo count.
    ///
    /// ```
    /// use memory_match::scoring::ComboState;
    ///
    /// assert_eq!(ComboState::multiplier_for(0), 1);
    /// assert_eq!(ComboState::multiplier_for(3), 2);
    /// assert_eq!(ComboState::multiplier_for(20), 5);
    /// ```
    #[must_use]
    pub fn multiplier_for(count: u32) -> u32 {
        (count / 3 + 1).min(MAX_COMBO_MULTIPLIER)
    }

    /// The combo after a successful match at game-clock time `now` (ms).
    #[must_use]
    pub fn register_match(&self, now: Timestamp, window: Seconds) -> Self {
        let window_ms = u64::from(window) * 1000;
        let extends = self
            .last_match_at
            .is_some_and(|last| now.saturating_sub(last) <= window_ms);

        let count = if extends { self.count + 1 } else { 1 };
        let multiplier = Self::multiplier_for(count);

        Self {
            count,
            multiplier,
            last_match_at: Some(now),
            max_combo: self.max_combo.max(count),
            bonus: self.bonus.saturating_add(COMBO_MATCH_BONUS * (multiplier - 1)),
        }
    }
}

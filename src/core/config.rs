//! Game configuration types.
//!
//! A session is configured by a `GameConfig` (mode, difficulty, deck and an
//! optional time-limit override). Difficulties map to fixed tables of pair
//! counts, time limits and grid layout; time-attack has its own table with
//! shorter limits and a combo window.
//!
//! The config is immutable once a session starts.

use serde::{Deserialize, Serialize};

/// Seconds, as used for elapsed time and limits.
pub type Seconds = u32;

/// Play mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// One player, no opponent.
    #[default]
    Single,
    /// Two local players alternating turns on one device.
    Versus,
    /// One player racing a short clock with combo scoring.
    TimeAttack,
    /// One player against an optional custom time limit.
    Challenge,
}

impl GameMode {
    /// Number of players a board is dealt for.
    #[must_use]
    pub const fn player_count(self) -> usize {
        match self {
            GameMode::Versus => 2,
            GameMode::Single | GameMode::TimeAttack | GameMode::Challenge => 1,
        }
    }
}

/// Difficulty level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Standard table entry for this difficulty.
    ///
    /// | Difficulty | Pairs | Time limit | Grid cols |
    /// |---|---|---|---|
    /// | Easy | 6 | none | 4 |
    /// | Medium | 9 | none | 6 |
    /// | Hard | 12 | 180 | 6 |
    /// | Expert | 18 | 300 | 6 |
    #[must_use]
    pub const fn settings(self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings::new(6, None, 4),
            Difficulty::Medium => DifficultySettings::new(9, None, 6),
            Difficulty::Hard => DifficultySettings::new(12, Some(180), 6),
            Difficulty::Expert => DifficultySettings::new(18, Some(300), 6),
        }
    }

    /// Time-attack table entry for this difficulty.
    #[must_use]
    pub const fn time_attack_settings(self) -> TimeAttackSettings {
        match self {
            Difficulty::Easy => TimeAttackSettings { time_limit: 60, combo_window: 5 },
            Difficulty::Medium => TimeAttackSettings { time_limit: 90, combo_window: 4 },
            Difficulty::Hard => TimeAttackSettings { time_limit: 120, combo_window: 3 },
            Difficulty::Expert => TimeAttackSettings { time_limit: 180, combo_window: 3 },
        }
    }

    /// Number of pairs dealt at this difficulty.
    #[must_use]
    pub const fn pair_count(self) -> usize {
        self.settings().pairs
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        };
        f.write_str(name)
    }
}

/// Pair count, optional time limit and layout for a difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultySettings {
    pub pairs: usize,
    pub time_limit: Option<Seconds>,
    pub grid_columns: usize,
}

impl DifficultySettings {
    const fn new(pairs: usize, time_limit: Option<Seconds>, grid_columns: usize) -> Self {
        Self {
            pairs,
            time_limit,
            grid_columns,
        }
    }

    /// Rows needed to lay out every card in `grid_columns` columns.
    #[must_use]
    pub const fn grid_rows(&self) -> usize {
        (self.pairs * 2).div_ceil(self.grid_columns)
    }
}

/// Time-attack limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeAttackSettings {
    pub time_limit: Seconds,
    /// A match within this many seconds of the previous one extends the combo.
    pub combo_window: Seconds,
}

/// Configuration for one session.
///
/// ```
/// use memory_match::core::{Difficulty, GameConfig, GameMode};
///
/// let config = GameConfig::new(GameMode::TimeAttack, Difficulty::Medium, "animals");
/// assert_eq!(config.effective_time_limit(), Some(90));
///
/// let custom = config.with_time_limit(45);
/// assert_eq!(custom.effective_time_limit(), Some(45));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Deck the board images come from.
    pub deck_ref: String,
    /// Overrides the table time limit when set.
    #[serde(default)]
    pub time_limit: Option<Seconds>,
    /// Display names in player order. Missing names fall back to "Player N".
    #[serde(default)]
    pub player_names: Vec<String>,
}

impl GameConfig {
    /// Create a new game configuration.
    pub fn new(mode: GameMode, difficulty: Difficulty, deck_ref: impl Into<String>) -> Self {
        Self {
            mode,
            difficulty,
            deck_ref: deck_ref.into(),
            time_limit: None,
            player_names: Vec::new(),
        }
    }

    /// Override the time limit.
    #[must_use]
    pub fn with_time_limit(mut self, seconds: Seconds) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the display names.
    #[must_use]
    pub fn with_player_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Number of pairs dealt.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.difficulty.pair_count()
    }

    /// Number of players for this mode.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.mode.player_count()
    }

    /// The time limit in force: explicit override, else the mode's table.
    #[must_use]
    pub fn effective_time_limit(&self) -> Option<Seconds> {
        self.time_limit.or(match self.mode {
            GameMode::TimeAttack => Some(self.difficulty.time_attack_settings().time_limit),
            _ => self.difficulty.settings().time_limit,
        })
    }

    /// Combo window in seconds, time-attack only.
    #[must_use]
    pub fn combo_window(&self) -> Option<Seconds> {
        (self.mode == GameMode::TimeAttack)
            .then(|| self.difficulty.time_attack_settings().combo_window)
    }

    /// Display name for a player index.
    #[must_use]
    pub fn player_name(&self, index: usize) -> String {
        self.player_names
            .get(index)
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Player {}", index + 1))
    }
}

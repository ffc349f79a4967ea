//! Finished-game records and aggregate statistics.
//!
//! Records live under one key as a JSON array, newest first, capped at
//! `MAX_RECORDS`. Reads never fail: an unavailable or corrupt store reads as
//! an empty history.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::store::{read_json_or_default, write_json, KeyValueStore};
use crate::core::{Difficulty, GameMode, GameState, Seconds, Timestamp};
use crate::rules::determine_winner;
use crate::scoring::calculate_earned_points;
use crate::session::{Clock, SystemClock};

/// Store key for the record history.
pub const RECORDS_KEY: &str = "memory-match.records";

/// Records kept; older ones are evicted.
pub const MAX_RECORDS: usize = 100;

/// A finished game, before it is given an id and timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewGameRecord {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub deck_id: String,
    pub score: u32,
    /// Flip attempts (two flips each).
    pub moves: u32,
    pub matches: u32,
    pub time_elapsed: Seconds,
    /// All pairs found, as opposed to running out of time.
    pub completed: bool,
    #[serde(default)]
    pub max_combo: Option<u32>,
    /// Versus winner's display name; `None` for a draw or a solo game.
    #[serde(default)]
    pub winner: Option<String>,
    pub points_earned: u32,
}

impl NewGameRecord {
    /// Summarize a finished game.
    #[must_use]
    pub fn from_state(state: &GameState, completed: bool) -> Self {
        let score = match state.config.mode {
            GameMode::Versus => state.players.values().map(|p| p.score).max().unwrap_or(0),
            _ => state.first_player().map_or(0, |p| p.score),
        };

        Self {
            mode: state.config.mode,
            difficulty: state.config.difficulty,
            deck_id: state.config.deck_ref.clone(),
            score,
            moves: state.stats.attempts(),
            matches: state.stats.matches,
            time_elapsed: state.stats.time_elapsed,
            completed,
            max_combo: state.stats.combo.as_ref().map(|c| c.max_combo),
            winner: determine_winner(state).map(|p| p.display_name.clone()),
            points_earned: calculate_earned_points(score, state.config.difficulty),
        }
    }
}

/// A stored record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub game: NewGameRecord,
}

/// Aggregates over the records of one difficulty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub games_played: u32,
    pub games_completed: u32,
    pub best_score: u32,
    pub average_score: f64,
    /// Fastest completed game.
    pub best_time: Option<Seconds>,
    pub average_moves: f64,
}

/// Record history over a key-value store.
#[derive(Debug)]
pub struct RecordRepository<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> RecordRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock::new())
    }
}

impl<S: KeyValueStore, C: Clock> RecordRepository<S, C> {
    /// Create a repository that stamps records with `clock`.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Store a finished game as the newest record.
    ///
    /// Returns the stored record. A failed write is logged and the record is
    /// still returned so the caller can show the result.
    pub fn save_game_record(&mut self, game: NewGameRecord) -> GameRecord {
        let record = GameRecord {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: self.clock.now(),
            game,
        };

        let mut records = self.get_all_records();
        records.insert(0, record.clone());
        records.truncate(MAX_RECORDS);

        match write_json(&mut self.store, RECORDS_KEY, &records) {
            Ok(()) => info!(id = %record.id, score = record.game.score, "game record saved"),
            Err(err) => warn!(error = %err, "failed to save game record"),
        }
        record
    }

    /// Every record, newest first.
    #[must_use]
    pub fn get_all_records(&self) -> Vec<GameRecord> {
        read_json_or_default(&self.store, RECORDS_KEY)
    }

    /// Records for one mode, newest first.
    #[must_use]
    pub fn get_records_by_mode(&self, mode: GameMode) -> Vec<GameRecord> {
        self.get_all_records()
            .into_iter()
            .filter(|r| r.game.mode == mode)
            .collect()
    }

    /// Aggregate the records of `difficulty`.
    #[must_use]
    pub fn calculate_difficulty_stats(&self, difficulty: Difficulty) -> DifficultyStats {
        let records = self.get_all_records();
        summarize(difficulty, records.iter().filter(|r| r.game.difficulty == difficulty))
    }

    /// Aggregates for every difficulty, including ones never played.
    #[must_use]
    pub fn stats_by_difficulty(&self) -> FxHashMap<Difficulty, DifficultyStats> {
        let records = self.get_all_records();
        Difficulty::ALL
            .into_iter()
            .map(|d| (d, summarize(d, records.iter().filter(|r| r.game.difficulty == d))))
            .collect()
    }

    /// Sum of points earned across the kept history.
    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.get_all_records()
            .iter()
            .map(|r| u64::from(r.game.points_earned))
            .sum()
    }

    /// Drop the whole history.
    pub fn clear_records(&mut self) {
        if let Err(err) = self.store.delete(RECORDS_KEY) {
            warn!(error = %err, "failed to clear game records");
        }
    }
}

fn summarize<'a>(difficulty: Difficulty, records: impl Iterator<Item = &'a GameRecord>) -> DifficultyStats {
    let mut stats = DifficultyStats {
        difficulty,
        ..DifficultyStats::default()
    };
    let mut total_score = 0u64;
    let mut total_moves = 0u64;

    for record in records {
        let game = &record.game;
        stats.games_played += 1;
        total_score += u64::from(game.score);
        total_moves += u64::from(game.moves);
        stats.best_score = stats.best_score.max(game.score);

        if game.completed {
            stats.games_completed += 1;
            stats.best_time = Some(match stats.best_time {
                Some(best) => best.min(game.time_elapsed),
                None => game.time_elapsed,
            });
        }
    }

    if stats.games_played > 0 {
        let played = f64::from(stats.games_played);
        stats.average_score = total_score as f64 / played;
        stats.average_moves = total_moves as f64 / played;
    }
    stats
}

//! # memory-match
//!
//! A state-transition engine for memory-matching card games.
//!
//! ## Design Principles
//!
//! 1. **Pure Core**: `reduce(&state, &action)` is the only way state changes.
//!    It never reads a clock, never panics, and ignores actions that are
//!    illegal in the current state.
//!
//! 2. **Deterministic Boards**: dealing takes an explicit seed, so a board can
//!    be reproduced from `(config, images, seed)`.
//!
//! 3. **Effects at the Edge**: timers, delayed resolution and persistence live
//!    in `session` and `storage`, outside the reducer.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: the board is an `im::Vector`, so the
//!   reducer's copy-on-write clone is O(1).
//!
//! - **Generation Tokens**: every delayed resolution is tagged with the game
//!   generation. A reset or re-deal bumps it and stale work is dropped.
//!
//! ## Modules
//!
//! - `core`: Cards, players, configuration, state, actions, RNG
//! - `deck`: Pairing and shuffling image references
//! - `scoring`: Final score, earned points, time-attack combos
//! - `rules`: Flip legality, matching, game-over and winner rules
//! - `reducer`: The state machine
//! - `session`: Clock, timer and delayed resolution around the reducer
//! - `storage`: Game records, statistics and decks over a key-value store

pub mod core;
pub mod deck;
pub mod error;
pub mod reducer;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    Action, Card, CardId, CardState, Difficulty, GameConfig, GameMode, GameRng, GameState,
    GameStats, GameStatus, PairId, Player, PlayerId, PlayerMap, Seconds, Timestamp,
};

pub use crate::deck::{create_shuffled_pairs, PairDescriptor};

pub use crate::error::{DeckError, SessionError, SnapshotError, StorageError};

pub use crate::reducer::reduce;

pub use crate::rules::{
    can_flip_card, check_match, determine_winner, game_result, get_next_player, initialize_game,
    is_game_over, is_time_up, GameResult,
};

pub use crate::scoring::{calculate_earned_points, calculate_score, ComboState};

pub use crate::session::{Clock, GameSession, ManualClock, SessionEvent, SessionSettings, SystemClock};

pub use crate::storage::{
    builtin_decks, Deck, DeckRepository, DifficultyStats, FileStore, GameRecord, KeyValueStore,
    MemoryStore, NewDeck, NewGameRecord, RecordRepository,
};

//! Core types: cards, players, configuration, state, actions, RNG.

pub mod action;
pub mod card;
pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use action::Action;
pub use card::{Card, CardId, CardState, PairId};
pub use config::{Difficulty, DifficultySettings, GameConfig, GameMode, Seconds, TimeAttackSettings};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{GameState, GameStats, GameStatus, RevealedCards, Timestamp};

//! Game rules for memory matching.
//!
//! Pure functions that the reducer and the session consult:
//! - Initializing a shuffled board
//! - Flip legality and match checks
//! - Game-over, time-up and winner conditions
//! - Versus turn rotation
//!
//! They never mutate state; the reducer is the only writer.

pub mod engine;

pub use engine::{
    can_flip_card, check_match, determine_winner, game_result, get_next_player, initialize_game,
    is_game_over, is_time_up, GameResult,
};

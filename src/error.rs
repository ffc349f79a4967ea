//! Boundary errors.
//!
//! The engine and reducer never fail; these only surface where the crate
//! meets storage, imported decks and saved snapshots.

use thiserror::Error;

use crate::core::{CardId, PlayerId};

/// Key-value store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON under key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Rejected deck imports.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck name must not be empty")]
    EmptyName,

    #[error("deck has {found} images, at least {required} are required")]
    TooFewImages { found: usize, required: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures starting or restoring a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot start game: deck {0} not found")]
    DeckNotFound(String),

    #[error("deck {deck} has {found} images, {required} pairs are needed")]
    DeckTooSmall {
        deck: String,
        found: usize,
        required: usize,
    },

    #[error("snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Snapshots that fail to decode or describe an impossible game.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot could not be encoded or decoded: {0}")]
    Codec(#[from] bincode::Error),

    #[error("snapshot has {found} players, the mode needs {expected}")]
    PlayerCount { expected: usize, found: usize },

    #[error("current player {0} does not exist")]
    CurrentPlayer(PlayerId),

    #[error("snapshot has {0} revealed cards, at most 2 are allowed")]
    TooManyRevealed(usize),

    #[error("revealed card {0} is not face-up on the board")]
    RevealedCard(CardId),

    #[error("board has {board} face-up cards but {revealed} are tracked as revealed")]
    RevealedMismatch { board: usize, revealed: usize },
}

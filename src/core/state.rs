//! Game state: the root aggregate the reducer owns.
//!
//! ## GameState
//!
//! - Configuration (immutable for the session)
//! - Status (`Idle`, `Playing`, `Paused`, `Finished`)
//! - Board (`im::Vector<Card>` for O(1) cloning per reducer step)
//! - Players and whose turn it is
//! - The revealed buffer (at most two cards)
//! - Stats (moves, matches, time, combo)
//!
//! Consumers only ever see `&GameState`; every change goes through
//! `reducer::reduce`, which returns a new value.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardId};
use super::config::{GameConfig, Seconds};
use super::player::{Player, PlayerId, PlayerMap};
use crate::error::SnapshotError;
use crate::scoring::ComboState;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Revealed-card buffer. Two inline slots, the most that can ever be face-up.
pub type RevealedCards = SmallVec<[CardId; 2]>;

/// Lifecycle of a session.
///
/// `Idle -> Playing -> {Paused <-> Playing} -> Finished`. `Finished` is
/// terminal until re-initialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    Finished,
}

/// Running statistics for a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Card flips so far. Two flips make one attempt.
    pub moves: u32,
    pub matches: u32,
    pub time_elapsed: Seconds,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    /// Time-attack only.
    pub combo: Option<ComboState>,
    /// Points for time left on the clock, set when a timed game ends.
    pub time_bonus: Option<u32>,
}

impl GameStats {
    /// Completed flip attempts (pairs of flips).
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.moves / 2
    }
}

/// Full game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub status: GameStatus,
    pub cards: Vector<Card>,
    pub players: PlayerMap<Player>,
    pub current_player: PlayerId,
    pub revealed: RevealedCards,
    pub stats: GameStats,
}

impl GameState {
    /// Create an idle state for `config` with the given board.
    #[must_use]
    pub fn new(config: GameConfig, cards: Vector<Card>) -> Self {
        let players = PlayerMap::new(config.player_count(), |id| {
            Player::new(id, config.player_name(id.index()))
        });

        Self {
            config,
            status: GameStatus::Idle,
            cards,
            players,
            current_player: PlayerId::new(0),
            revealed: RevealedCards::new(),
            stats: GameStats::default(),
        }
    }

    // === Cards ===

    /// Get a card by ID.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Position of a card on the board.
    #[must_use]
    pub fn card_index(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    /// Number of cards in the `Matched` state.
    #[must_use]
    pub fn matched_card_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_matched()).count()
    }

    /// The two revealed cards, if exactly two are face-up.
    #[must_use]
    pub fn revealed_pair(&self) -> Option<(&Card, &Card)> {
        match self.revealed.as_slice() {
            [a, b] => Some((self.card(*a)?, self.card(*b)?)),
            _ => None,
        }
    }

    // === Players ===

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<&Player> {
        self.players.get(self.current_player)
    }

    /// The first player. Single-player modes only ever have this one.
    #[must_use]
    pub fn first_player(&self) -> Option<&Player> {
        self.players.get(PlayerId::new(0))
    }

    // === Status ===

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    // === Snapshots ===

    /// Encode the state as a compact binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a snapshot produced by `to_bytes`.
    ///
    /// The decoded state is checked with `validate`, so a snapshot that
    /// decodes cleanly but describes an impossible game is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let state: Self = bincode::deserialize(bytes)?;
        state.validate()?;
        Ok(state)
    }

    /// Check the structural invariants the reducer relies on.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let expected = self.config.player_count();
        let found = self.players.player_count();
        if found != expected {
            return Err(SnapshotError::PlayerCount { expected, found });
        }
        if self.players.get(self.current_player).is_none() {
            return Err(SnapshotError::CurrentPlayer(self.current_player));
        }
        if self.revealed.len() > 2 {
            return Err(SnapshotError::TooManyRevealed(self.revealed.len()));
        }
        for &id in &self.revealed {
            if !self.card(id).is_some_and(Card::is_revealed) {
                return Err(SnapshotError::RevealedCard(id));
            }
        }
        let board = self.cards.iter().filter(|card| card.is_revealed()).count();
        if board != self.revealed.len() {
            return Err(SnapshotError::RevealedMismatch {
                board,
                revealed: self.revealed.len(),
            });
        }
        Ok(())
    }
}

//! Cards on the board.
//!
//! Every card has a unique `CardId` and a `PairId` shared with exactly one
//! other card. Cards are created at initialization and only change `state`
//! afterwards; a fresh board replaces them wholesale.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// Identifier shared by the two cards of a pair.
///
/// ```
/// use memory_match::core::PairId;
///
/// assert_eq!(PairId::new(3).to_string(), "pair-3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairId(pub u32);

impl PairId {
    /// Create a new pair ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pair-{}", self.0)
    }
}

/// Face state of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardState {
    /// Face down.
    #[default]
    Hidden,
    /// Flipped but not yet resolved.
    Revealed,
    /// Part of a completed pair. Terminal for the session.
    Matched,
}

/// A card instance on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub image_ref: String,
    pub state: CardState,
    pub pair_id: PairId,
}

impl Card {
    /// Create a face-down card.
    pub fn new(id: CardId, image_ref: impl Into<String>, pair_id: PairId) -> Self {
        Self {
            id,
            image_ref: image_ref.into(),
            state: CardState::Hidden,
            pair_id,
        }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.state == CardState::Hidden
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.state == CardState::Revealed
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.state == CardState::Matched
    }
}

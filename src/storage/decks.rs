//! Deck catalog: built-in decks plus user-authored decks in the store.
//!
//! Custom decks are validated here, before anything reaches the engine:
//! a deck needs a name and at least `MIN_DECK_IMAGES` images.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::store::{read_json_or_default, write_json, KeyValueStore};
use crate::core::{Difficulty, Timestamp};
use crate::error::{DeckError, StorageError};
use crate::session::{Clock, SystemClock};

/// Store key for custom decks.
pub const DECKS_KEY: &str = "memory-match.custom-decks";

/// Smallest deck that can deal the easiest board.
pub const MIN_DECK_IMAGES: usize = Difficulty::Easy.pair_count();

/// A collection of image references a board is dealt from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub images: Vec<String>,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Deck {
    /// Whether the deck has enough images for `difficulty`.
    #[must_use]
    pub fn supports(&self, difficulty: Difficulty) -> bool {
        self.images.len() >= difficulty.pair_count()
    }

    /// Difficulties this deck can deal, easiest first.
    #[must_use]
    pub fn supported_difficulties(&self) -> Vec<Difficulty> {
        Difficulty::ALL
            .into_iter()
            .filter(|&d| self.supports(d))
            .collect()
    }
}

/// A user-authored deck awaiting validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeck {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub images: Vec<String>,
}

impl NewDeck {
    /// Reject decks the engine cannot deal from.
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.name.trim().is_empty() {
            return Err(DeckError::EmptyName);
        }
        if self.images.len() < MIN_DECK_IMAGES {
            return Err(DeckError::TooFewImages {
                found: self.images.len(),
                required: MIN_DECK_IMAGES,
            });
        }
        Ok(())
    }
}

fn builtin(id: &str, name: &str, description: &str, images: &str) -> Deck {
    Deck {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        images: images.split_whitespace().map(str::to_owned).collect(),
        custom: false,
        created_at: None,
    }
}

/// Decks that ship with the game. Each supports every difficulty.
#[must_use]
pub fn builtin_decks() -> Vec<Deck> {
    vec![
        builtin(
            "animals",
            "Animals",
            "Creatures great and small",
            "🐶 🐱 🐭 🐹 🐰 🦊 🐻 🐼 🐨 🐯 🦁 🐮 🐷 🐸 🐵 🐔 🐧 🐙",
        ),
        builtin(
            "space",
            "Space",
            "Rockets, planets and stars",
            "🚀 🛸 🌍 🌙 ⭐ ☄️ 🪐 🌞 🌌 🛰️ 👽 🔭 🌠 🌑 🌕 🧑‍🚀 🌟 💫",
        ),
    ]
}

/// Deck lookup over the built-in catalog and a key-value store.
#[derive(Debug)]
pub struct DeckRepository<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> DeckRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock::new())
    }
}

impl<S: KeyValueStore, C: Clock> DeckRepository<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Find a deck by id, built-in decks first.
    #[must_use]
    pub fn get_deck_by_id(&self, id: &str) -> Option<Deck> {
        builtin_decks()
            .into_iter()
            .find(|deck| deck.id == id)
            .or_else(|| self.get_custom_decks().into_iter().find(|deck| deck.id == id))
    }

    /// Built-in decks followed by custom decks.
    #[must_use]
    pub fn get_all_decks(&self) -> Vec<Deck> {
        let mut decks = builtin_decks();
        decks.extend(self.get_custom_decks());
        decks
    }

    /// Custom decks in creation order.
    #[must_use]
    pub fn get_custom_decks(&self) -> Vec<Deck> {
        read_json_or_default(&self.store, DECKS_KEY)
    }

    /// Validate and store a custom deck.
    pub fn save_custom_deck(&mut self, new: NewDeck) -> Result<Deck, DeckError> {
        new.validate()?;

        let deck = Deck {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.trim().to_owned(),
            description: new.description,
            images: new.images,
            custom: true,
            created_at: Some(self.clock.now()),
        };

        let mut decks = self.get_custom_decks();
        decks.push(deck.clone());
        write_json(&mut self.store, DECKS_KEY, &decks)?;

        info!(id = %deck.id, images = deck.images.len(), "custom deck saved");
        Ok(deck)
    }

    /// Remove a custom deck. Built-in decks cannot be removed.
    pub fn delete_custom_deck(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut decks = self.get_custom_decks();
        let before = decks.len();
        decks.retain(|deck| deck.id != id);

        if decks.len() == before {
            if builtin_decks().iter().any(|deck| deck.id == id) {
                warn!(id, "refusing to delete a built-in deck");
            }
            return Ok(false);
        }

        write_json(&mut self.store, DECKS_KEY, &decks)?;
        Ok(true)
    }
}

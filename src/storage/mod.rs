//! Persistence adapter.
//!
//! The engine never touches storage. Callers read deck images before a
//! game and write a record after it, through small repositories over a
//! `KeyValueStore`:
//! - `RecordRepository`: finished games, capped history, per-difficulty stats
//! - `DeckRepository`: built-in and custom decks, import validation
//!
//! Faults stop here: reads that fail are logged and treated as empty.

mod decks;
mod records;
mod store;

pub use decks::{builtin_decks, Deck, DeckRepository, NewDeck, DECKS_KEY, MIN_DECK_IMAGES};
pub use records::{
    DifficultyStats, GameRecord, NewGameRecord, RecordRepository, MAX_RECORDS, RECORDS_KEY,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};

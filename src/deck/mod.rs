//! Board generation: pairing and shuffling image references.
//!
//! The generator is independent of game state. It takes images and a pair
//! count and returns a shuffled sequence of `{image_ref, pair_id}`
//! descriptors; `rules::initialize_game` turns those into cards.

mod shuffle;

pub use shuffle::{create_shuffled_pairs, PairDescriptor};

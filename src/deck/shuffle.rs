//! Shuffle/pairing generator.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, PairId};

/// One slot of a shuffled board before card ids are assigned.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairDescriptor {
    pub image_ref: String,
    pub pair_id: PairId,
}

/// Pair the first `pair_count` images and shuffle the result.
///
/// Returns `2 * pair_count` descriptors, each `pair_id` appearing exactly
/// twice. The caller guarantees `images.len() >= pair_count`; with fewer
/// images, fewer pairs are produced.
///
/// ```
/// use memory_match::core::GameRng;
/// use memory_match::deck::create_shuffled_pairs;
///
/// let mut rng = GameRng::new(7);
/// let pairs = create_shuffled_pairs(&["a", "b", "c"], 2, &mut rng);
///
/// assert_eq!(pairs.len(), 4);
/// assert!(pairs.iter().all(|p| p.image_ref != "c"));
/// ```
pub fn create_shuffled_pairs<S: AsRef<str>>(
    images: &[S],
    pair_count: usize,
    rng: &mut GameRng,
) -> Vec<PairDescriptor> {
    let mut descriptors: Vec<PairDescriptor> = images
        .iter()
        .take(pair_count)
        .enumerate()
        .flat_map(|(index, image)| {
            let descriptor = PairDescriptor {
                image_ref: image.as_ref().to_owned(),
                pair_id: PairId::new(index as u32),
            };
            [descriptor.clone(), descriptor]
        })
        .collect();

    rng.shuffle(&mut descriptors);
    descriptors
}

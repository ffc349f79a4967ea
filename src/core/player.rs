//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Single-player modes have one player,
//! versus mode has exactly two sharing a device.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by `Vec` for O(1) access by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier. Indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// A participant's running tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub score: u32,
    pub matches: u32,
}

impl Player {
    /// Create a player with a zeroed tally.
    pub fn new(id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            score: 0,
            matches: 0,
        }
    }

    /// Zero the score and matches, keeping identity.
    pub fn clear_tally(&mut self) {
        self.score = 0;
        self.matches = 0;
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use memory_match::core::{PlayerId, PlayerMap};
///
/// let mut matches: PlayerMap<u32> = PlayerMap::new(2, |_| 0);
/// matches[PlayerId::new(1)] += 1;
/// assert_eq!(matches[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(
            (1..=usize::from(u8::MAX)).contains(&player_count),
            "player count {player_count} out of range"
        );

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a player's data, or `None` for an unknown id.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a player's data mutably, or `None` for an unknown id.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over the values in player order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate mutably over the values in player order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 1");
    }

    #[test]
    fn test_player_new_is_zeroed() {
        let player = Player::new(PlayerId::new(1), "Alice");

        assert_eq!(player.display_name, "Alice");
        assert_eq!(player.score, 0);
        assert_eq!(player.matches, 0);
    }

    #[test]
    fn test_clear_tally() {
        let mut player = Player::new(PlayerId::new(0), "Bob");
        player.score = 350;
        player.matches = 3;

        player.clear_tally();

        assert_eq!(player.score, 0);
        assert_eq!(player.matches, 0);
        assert_eq!(player.display_name, "Bob");
    }

    #[test]
    fn test_player_map_get_unknown() {
        let map: PlayerMap<u32> = PlayerMap::new(2, |_| 0);

        assert_eq!(map.get(PlayerId::new(1)), Some(&0));
        assert_eq!(map.get(PlayerId::new(2)), None);
    }

    #[test]
    fn test_player_map_values_in_order() {
        let mut map: PlayerMap<u32> = PlayerMap::new(2, |p| p.index() as u32 * 10);
        map[PlayerId::new(0)] += 1;

        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, vec![1, 10]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<Player> = PlayerMap::new(2, |p| Player::new(p, p.to_string()));
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<Player> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::new(0, |_| 0);
    }
}

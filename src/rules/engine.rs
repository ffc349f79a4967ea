//! Game rules as pure functions over `GameState`.
//!
//! Nothing here mutates state or keeps state between calls:
//! - Board initialization from a config and deck images
//! - Flip legality and match checking
//! - Game-over, time-up and winner conditions
//! - Turn rotation for versus mode

use im::Vector;

use crate::core::{Card, CardId, GameConfig, GameMode, GameRng, GameState, GameStatus, Player, PlayerId};
use crate::deck::create_shuffled_pairs;

/// Result of a completed versus game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Equal match counts.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }
}

/// Deal a fresh, idle game.
///
/// Pairs the first `config.pair_count()` images, shuffles them with `rng`
/// and numbers the cards in board order. Creates one player, or two in
/// versus mode.
///
/// The deck must already be validated to hold enough images; a short deck
/// simply deals fewer pairs.
pub fn initialize_game<S: AsRef<str>>(config: GameConfig, images: &[S], rng: &mut GameRng) -> GameState {
    let cards: Vector<Card> = create_shuffled_pairs(images, config.pair_count(), rng)
        .into_iter()
        .enumerate()
        .map(|(index, pair)| Card::new(CardId::new(index as u32), pair.image_ref, pair.pair_id))
        .collect();

    GameState::new(config, cards)
}

/// Whether `card_id` may be flipped now.
///
/// Requires a playing game, fewer than two revealed cards, and a hidden
/// target card.
#[must_use]
pub fn can_flip_card(state: &GameState, card_id: CardId) -> bool {
    state.status == GameStatus::Playing
        && state.revealed.len() < 2
        && state.card(card_id).is_some_and(Card::is_hidden)
}

/// Two cards match when they share a pair id.
#[must_use]
pub fn check_match(a: &Card, b: &Card) -> bool {
    a.pair_id == b.pair_id
}

/// Every card is matched.
#[must_use]
pub fn is_game_over(state: &GameState) -> bool {
    state.cards.iter().all(Card::is_matched)
}

/// The effective time limit exists and has been reached.
#[must_use]
pub fn is_time_up(state: &GameState) -> bool {
    state
        .config
        .effective_time_limit()
        .is_some_and(|limit| state.stats.time_elapsed >= limit)
}

/// Whose turn comes next.
///
/// Versus mode alternates between the two players; every other mode keeps
/// the current player.
#[must_use]
pub fn get_next_player(state: &GameState) -> PlayerId {
    if state.config.mode != GameMode::Versus {
        return state.current_player;
    }

    let count = state.players.player_count();
    PlayerId::new(((state.current_player.index() + 1) % count) as u8)
}

/// The versus-mode player with the most matches, or `None` on a draw or
/// outside versus mode.
#[must_use]
pub fn determine_winner(state: &GameState) -> Option<&Player> {
    match game_result(state)? {
        GameResult::Winner(id) => state.players.get(id),
        GameResult::Draw => None,
    }
}

/// Versus-mode outcome by match count.
#[must_use]
pub fn game_result(state: &GameState) -> Option<GameResult> {
    if state.config.mode != GameMode::Versus {
        return None;
    }

    let best = state.players.values().map(|p| p.matches).max()?;
    let mut leaders = state.players.values().filter(|p| p.matches == best);

    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => Some(GameResult::Winner(leader.id)),
        _ => Some(GameResult::Draw),
    }
}

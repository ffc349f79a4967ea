//! The state machine: `(GameState, Action) -> GameState`.

use tracing::debug;

use crate::core::{Action, CardId, CardState, GameMode, GameRng, GameState, GameStats, GameStatus, PlayerId};
use crate::rules::{can_flip_card, check_match, get_next_player, initialize_game};
use crate::scoring::{calculate_score, time_bonus};

/// Apply `action` to `state`, returning the next state.
///
/// The input is never modified. Actions whose preconditions fail return an
/// unchanged copy; the board is an `im::Vector`, so the copy is O(1).
#[must_use]
pub fn reduce(state: &GameState, action: &Action) -> GameState {
    let mut next = state.clone();
    if !apply(&mut next, action) {
        debug!(action = %action, status = ?state.status, "action ignored");
    }
    next
}

/// Apply `action` in place. Returns `false` (leaving `state` untouched)
/// when a precondition fails.
fn apply(state: &mut GameState, action: &Action) -> bool {
    // Finished is terminal until re-initialization.
    if state.is_finished() && !matches!(action, Action::Init { .. } | Action::Reset) {
        return false;
    }

    match action {
        Action::Init { config, images, seed } => {
            *state = initialize_game(config.clone(), images.as_slice(), &mut GameRng::new(*seed));
            true
        }

        Action::Start { at } => {
            if state.status != GameStatus::Idle {
                return false;
            }
            state.status = GameStatus::Playing;
            state.stats.started_at = Some(*at);
            true
        }

        Action::Pause => transition(state, GameStatus::Playing, GameStatus::Paused),

        Action::Resume => transition(state, GameStatus::Paused, GameStatus::Playing),

        Action::Flip(card_id) => flip(state, *card_id),

        Action::Match(a, b) => resolve_match(state, *a, *b),

        Action::Unmatch => {
            let Some((first, second)) = state.revealed_pair() else {
                return false;
            };
            if check_match(first, second) {
                return false;
            }
            set_revealed_to(state, CardState::Hidden);
            true
        }

        Action::UpdateTime(elapsed) => {
            if !state.is_playing() {
                return false;
            }
            state.stats.time_elapsed = *elapsed;
            true
        }

        Action::End { final_score, at } => {
            state.status = GameStatus::Finished;
            state.stats.ended_at = Some(*at);
            state.stats.time_bonus = state
                .config
                .effective_time_limit()
                .map(|limit| time_bonus(state.stats.time_elapsed, Some(limit)));
            if let Some(player) = state.players.get_mut(PlayerId::new(0)) {
                player.score = *final_score;
            }
            true
        }

        Action::SwitchPlayer => {
            if state.config.mode != GameMode::Versus {
                return false;
            }
            state.current_player = get_next_player(state);
            true
        }

        Action::Reset => {
            for card in state.cards.iter_mut() {
                card.state = CardState::Hidden;
            }
            for player in state.players.values_mut() {
                player.clear_tally();
            }
            state.current_player = PlayerId::new(0);
            state.revealed.clear();
            state.stats = GameStats::default();
            state.status = GameStatus::Idle;
            true
        }

        Action::UpdateCombo(combo) => {
            if state.config.mode != GameMode::TimeAttack {
                return false;
            }
            state.stats.combo = Some(combo.clone());
            true
        }

        Action::ResetCombo => {
            if state.config.mode != GameMode::TimeAttack {
                return false;
            }
            state.stats.combo = None;
            true
        }
    }
}

fn transition(state: &mut GameState, from: GameStatus, to: GameStatus) -> bool {
    if state.status != from {
        return false;
    }
    state.status = to;
    true
}

fn flip(state: &mut GameState, card_id: CardId) -> bool {
    if !can_flip_card(state, card_id) {
        return false;
    }
    let Some(index) = state.card_index(card_id) else {
        return false;
    };

    state.cards[index].state = CardState::Revealed;
    state.revealed.push(card_id);
    state.stats.moves += 1;
    true
}

fn resolve_match(state: &mut GameState, a: CardId, b: CardId) -> bool {
    let Some((first, second)) = state.revealed_pair() else {
        return false;
    };
    let named = (first.id == a && second.id == b) || (first.id == b && second.id == a);
    if !named || !check_match(first, second) {
        return false;
    }

    set_revealed_to(state, CardState::Matched);
    state.stats.matches += 1;

    let difficulty = state.config.difficulty;
    let time_limit = state.config.effective_time_limit();
    let attempts = state.stats.attempts();
    let elapsed = state.stats.time_elapsed;
    let combo_bonus = match (state.config.mode, &state.stats.combo) {
        (GameMode::TimeAttack, Some(combo)) => combo.bonus,
        _ => 0,
    };

    if let Some(player) = state.players.get_mut(state.current_player) {
        player.matches += 1;
        player.score = calculate_score(player.matches, attempts, elapsed, difficulty, time_limit)
            .saturating_add(combo_bonus);
    }
    true
}

/// Move both revealed cards to `to` and empty the buffer.
fn set_revealed_to(state: &mut GameState, to: CardState) {
    let revealed = std::mem::take(&mut state.revealed);
    for card in state.cards.iter_mut() {
        if revealed.contains(&card.id) {
            card.state = to;
        }
    }
}

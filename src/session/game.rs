//! The session driver: owns the state and runs the resolution protocol.
//!
//! A flip that reveals the second card schedules a pair resolution after
//! `match_delay_ms`. The resolution dispatches `MATCH` or `UNMATCH` (plus
//! `SWITCH_PLAYER` in versus mode). When the last pair is matched, the game
//! ends after `finish_delay_ms`. Every scheduled task is tagged with the
//! generation current at scheduling time and is dropped if a reset or
//! re-initialization happened in between.
//!
//! Time only enters through `Clock`; callers drive the session by calling
//! `tick` regularly (at least once a second).

use im::Vector;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::scheduler::{Scheduler, Task};
use super::settings::SessionSettings;
use super::timer::GameTimer;
use crate::core::{
    Action, CardId, GameConfig, GameMode, GameRng, GameState, GameStatus, Player, PlayerId, Seconds,
    Timestamp,
};
use crate::error::{SessionError, SnapshotError};
use crate::reducer::reduce;
use crate::rules::{can_flip_card, check_match, determine_winner, is_game_over, is_time_up};
use crate::scoring::calculate_score;
use crate::storage::{DeckRepository, KeyValueStore, NewGameRecord};

/// Something the UI or persistence layer may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Matched { player: PlayerId, cards: (CardId, CardId) },
    Mismatched { player: PlayerId, cards: (CardId, CardId) },
    PlayerSwitched(PlayerId),
    TimeUp,
    /// The game ended; the record is ready to be saved.
    Finished(NewGameRecord),
}

/// Single-owner container for one game.
pub struct GameSession<C: Clock = SystemClock> {
    state: GameState,
    images: Vec<String>,
    seed: u64,
    clock: C,
    timer: GameTimer,
    scheduler: Scheduler,
    settings: SessionSettings,
    events: Vec<SessionEvent>,
}

impl GameSession<SystemClock> {
    /// A session on the system clock with a random seed and default pacing.
    pub fn new(config: GameConfig, images: Vec<String>) -> Self {
        let seed = GameRng::from_entropy().seed();
        Self::with_options(config, images, seed, SystemClock::new(), SessionSettings::default())
    }
}

impl<C: Clock> GameSession<C> {
    /// Deal a board from `images` and wait in `Idle`.
    pub fn with_options(
        config: GameConfig,
        images: Vec<String>,
        seed: u64,
        clock: C,
        settings: SessionSettings,
    ) -> Self {
        let mut session = Self {
            state: GameState::new(config.clone(), Vector::new()),
            images,
            seed,
            clock,
            timer: GameTimer::new(),
            scheduler: Scheduler::new(),
            settings,
            events: Vec::new(),
        };
        session.init(config, seed);
        session
    }

    /// Look up `config.deck_ref` and deal from it.
    pub fn from_deck<S: KeyValueStore, D: Clock>(
        config: GameConfig,
        decks: &DeckRepository<S, D>,
        seed: u64,
        clock: C,
        settings: SessionSettings,
    ) -> Result<Self, SessionError> {
        let deck = decks
            .get_deck_by_id(&config.deck_ref)
            .ok_or_else(|| SessionError::DeckNotFound(config.deck_ref.clone()))?;

        if !deck.supports(config.difficulty) {
            return Err(SessionError::DeckTooSmall {
                deck: deck.id,
                found: deck.images.len(),
                required: config.pair_count(),
            });
        }

        Ok(Self::with_options(config, deck.images, seed, clock, settings))
    }

    // === Read-only views ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Seed of the current board.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Bumped by every re-initialization and reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Whether a pair or game-end resolution is waiting to fire.
    #[must_use]
    pub fn has_pending_resolution(&self) -> bool {
        self.scheduler.pending() > 0
    }

    /// Seconds on the game clock right now.
    #[must_use]
    pub fn elapsed(&self) -> Seconds {
        self.timer.elapsed(self.clock.now())
    }

    /// The versus winner, once there is one.
    #[must_use]
    pub fn winner(&self) -> Option<&Player> {
        determine_winner(&self.state)
    }

    /// Drain the events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lifecycle ===

    /// Begin play. Only valid from `Idle`.
    pub fn start(&mut self) -> bool {
        if self.state.status != GameStatus::Idle {
            return false;
        }
        let now = self.clock.now();
        self.dispatch(Action::Start { at: now });
        self.timer.start(now);
        info!(
            mode = ?self.state.config.mode,
            difficulty = %self.state.config.difficulty,
            seed = self.seed,
            "game started"
        );
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.dispatch(Action::Pause);
        self.timer.pause(self.clock.now());
        true
    }

    /// Continue a paused game. Resolutions that fell due while paused fire now.
    pub fn resume(&mut self) -> bool {
        if self.state.status != GameStatus::Paused {
            return false;
        }
        let now = self.clock.now();
        self.dispatch(Action::Resume);
        self.timer.resume(now);
        self.run_due(now);
        true
    }

    /// Same board, everything face-down, back to `Idle`.
    pub fn reset(&mut self) {
        self.scheduler.advance_generation();
        self.timer.reset();
        self.dispatch(Action::Reset);
        info!(generation = self.generation(), "game reset");
    }

    /// Deal a new board with a fresh random seed.
    pub fn restart(&mut self) {
        self.restart_with_seed(GameRng::from_entropy().seed());
    }

    /// Deal a new board from `seed`.
    pub fn restart_with_seed(&mut self, seed: u64) {
        let config = self.state.config.clone();
        self.init(config, seed);
    }

    // === Play ===

    /// Flip a card. Returns `false` if the flip was not allowed.
    pub fn flip(&mut self, card_id: CardId) -> bool {
        if !can_flip_card(&self.state, card_id) {
            debug!(card = %card_id, status = ?self.state.status, "flip rejected");
            return false;
        }

        let now = self.clock.now();
        self.dispatch(Action::Flip(card_id));

        if let [a, b] = *self.state.revealed.as_slice() {
            let due = now.saturating_add(self.settings.match_delay_ms);
            self.scheduler.schedule(due, Task::ResolvePair(a, b));
        }
        self.run_due(now);
        true
    }

    /// Advance the clock: publish elapsed time, end the game on time-up and
    /// fire due resolutions.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        if let Some(elapsed) = self.timer.poll(now) {
            self.dispatch(Action::UpdateTime(elapsed));

            if self.state.is_playing() && is_time_up(&self.state) {
                // Every pair was found before the limit; only the finish delay ran over.
                if !self.state.cards.is_empty() && is_game_over(&self.state) {
                    self.finish(true, now);
                    return;
                }
                info!(elapsed, "time is up");
                self.events.push(SessionEvent::TimeUp);
                self.finish(false, now);
                return;
            }
        }

        self.run_due(now);
    }

    /// Score the game would end with right now.
    #[must_use]
    pub fn final_score(&self) -> u32 {
        let state = &self.state;
        if state.config.mode == GameMode::Versus {
            return state.first_player().map_or(0, |p| p.score);
        }

        let stats = &state.stats;
        let combo_bonus = stats.combo.as_ref().map_or(0, |c| c.bonus);
        calculate_score(
            stats.matches,
            stats.attempts(),
            stats.time_elapsed,
            state.config.difficulty,
            state.config.effective_time_limit(),
        )
        .saturating_add(combo_bonus)
    }

    // === Snapshots ===

    /// Encode the current state.
    pub fn snapshot(&self) -> Result<Vec<u8>, SessionError> {
        Ok(self.state.to_bytes().map_err(SnapshotError::from)?)
    }

    /// Replace the current game with a snapshot.
    ///
    /// Pending work from the old game is cancelled. The clock picks up at
    /// the snapshot's elapsed time, and a pair left face-up is resolved
    /// again after the usual delay.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let state = GameState::from_bytes(bytes)?;
        let now = self.clock.now();

        self.scheduler.advance_generation();
        self.timer.reset();
        match state.status {
            GameStatus::Playing => self.timer.start_at_elapsed(now, state.stats.time_elapsed),
            GameStatus::Paused => {
                self.timer.start_at_elapsed(now, state.stats.time_elapsed);
                self.timer.pause(now);
            }
            GameStatus::Idle | GameStatus::Finished => {}
        }
        self.state = state;

        if let [a, b] = *self.state.revealed.as_slice() {
            let due = now.saturating_add(self.settings.match_delay_ms);
            self.scheduler.schedule(due, Task::ResolvePair(a, b));
        } else if !self.state.is_finished() && !self.state.cards.is_empty() && is_game_over(&self.state) {
            let due = now.saturating_add(self.settings.finish_delay_ms);
            self.scheduler.schedule(due, Task::Finish);
        }

        info!(generation = self.generation(), status = ?self.state.status, "session restored");
        Ok(())
    }

    // === Internals ===

    fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, &action);
    }

    fn init(&mut self, config: GameConfig, seed: u64) {
        self.scheduler.advance_generation();
        self.timer.reset();
        self.seed = seed;
        let images = self.images.clone();
        self.dispatch(Action::Init { config, images, seed });
        debug!(generation = self.generation(), seed, "board dealt");
    }

    fn run_due(&mut self, now: Timestamp) {
        while self.state.is_playing() {
            let Some(task) = self.scheduler.pop_due(now) else {
                break;
            };
            if !self.scheduler.is_current(&task) {
                debug!(generation = task.generation, "dropping stale resolution");
                continue;
            }
            match task.task {
                Task::ResolvePair(a, b) => self.resolve_pair(a, b, task.due_at),
                Task::Finish => self.finish(true, task.due_at),
            }
        }
    }

    fn resolve_pair(&mut self, a: CardId, b: CardId, at: Timestamp) {
        let Some((first, second)) = self.state.revealed_pair() else {
            return;
        };
        if (first.id, second.id) != (a, b) {
            debug!(%a, %b, "revealed cards changed, skipping resolution");
            return;
        }
        let matched = check_match(first, second);
        let player = self.state.current_player;

        if !matched {
            self.dispatch(Action::Unmatch);
            self.events.push(SessionEvent::Mismatched { player, cards: (a, b) });

            if self.state.config.mode == GameMode::Versus {
                self.dispatch(Action::SwitchPlayer);
                self.events
                    .push(SessionEvent::PlayerSwitched(self.state.current_player));
            }
            return;
        }

        if let Some(window) = self.state.config.combo_window() {
            let combo = self
                .state
                .stats
                .combo
                .clone()
                .unwrap_or_default()
                .register_match(self.timer.elapsed_ms(at), window);
            self.dispatch(Action::UpdateCombo(combo));
        }
        self.dispatch(Action::Match(a, b));
        self.events.push(SessionEvent::Matched { player, cards: (a, b) });

        if is_game_over(&self.state) {
            let due = at.saturating_add(self.settings.finish_delay_ms);
            self.scheduler.schedule(due, Task::Finish);
        }
    }

    fn finish(&mut self, completed: bool, at: Timestamp) {
        if self.state.is_finished() {
            return;
        }

        let elapsed = self.timer.elapsed(at).max(self.state.stats.time_elapsed);
        self.dispatch(Action::UpdateTime(elapsed));

        let final_score = self.final_score();
        self.dispatch(Action::End { final_score, at });
        self.timer.pause(at);

        let record = NewGameRecord::from_state(&self.state, completed);
        info!(score = final_score, completed, elapsed, "game finished");
        self.events.push(SessionEvent::Finished(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;
    use crate::session::ManualClock;

    fn images() -> Vec<String> {
        (0..18).map(|i| format!("img-{i}")).collect()
    }

    fn new_session(mode: GameMode, settings: SessionSettings) -> (GameSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let config = GameConfig::new(mode, Difficulty::Easy, "test");
        let session = GameSession::with_options(config, images(), 42, clock.clone(), settings);
        (session, clock)
    }

    fn partner(state: &GameState, id: CardId) -> CardId {
        let card = state.card(id).unwrap();
        state
            .cards
            .iter()
            .find(|c| c.id != id && c.pair_id == card.pair_id)
            .unwrap()
            .id
    }

    fn stranger(state: &GameState, id: CardId) -> CardId {
        let card = state.card(id).unwrap();
        state.cards.iter().find(|c| c.pair_id != card.pair_id).unwrap().id
    }

    #[test]
    fn test_new_session_is_idle() {
        let (session, _) = new_session(GameMode::Single, SessionSettings::default());

        assert_eq!(session.state().status, GameStatus::Idle);
        assert_eq!(session.state().cards.len(), 12);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_flip_before_start_rejected() {
        let (mut session, _) = new_session(GameMode::Single, SessionSettings::default());
        assert!(!session.flip(CardId::new(0)));
    }

    #[test]
    fn test_resolution_waits_for_delay() {
        let (mut session, clock) = new_session(GameMode::Single, SessionSettings::default());
        session.start();

        let a = CardId::new(0);
        let b = partner(session.state(), a);
        assert!(session.flip(a));
        assert!(session.flip(b));

        assert!(session.has_pending_resolution());
        assert!(session.state().card(a).unwrap().is_revealed());

        clock.advance(999);
        session.tick();
        assert!(session.state().card(a).unwrap().is_revealed());

        clock.advance(1);
        session.tick();
        assert!(session.state().card(a).unwrap().is_matched());
        assert!(session.state().card(b).unwrap().is_matched());
    }

    #[test]
    fn test_reset_cancels_pending_resolution() {
        let (mut session, clock) = new_session(GameMode::Single, SessionSettings::default());
        session.start();

        let a = CardId::new(0);
        session.flip(a);
        session.flip(partner(session.state(), a));
        session.reset();
        assert!(!session.has_pending_resolution());

        session.start();
        clock.advance(5_000);
        session.tick();

        assert_eq!(session.state().stats.matches, 0);
        assert!(session.state().cards.iter().all(|c| c.is_hidden()));
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_restart_deals_new_board() {
        let (mut session, _) = new_session(GameMode::Single, SessionSettings::default());
        let before: Vec<_> = session.state().cards.iter().map(|c| c.pair_id).collect();

        session.restart_with_seed(43);

        let after: Vec<_> = session.state().cards.iter().map(|c| c.pair_id).collect();
        assert_ne!(before, after);
        assert_eq!(session.seed(), 43);
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_restart_mid_game() {
        let (mut session, _) = new_session(GameMode::Single, SessionSettings::default());
        session.start();
        session.flip(CardId::new(0));

        session.restart();

        assert_eq!(session.state().status, GameStatus::Idle);
        assert!(session.state().revealed.is_empty());
        assert_eq!(session.state().stats.moves, 0);
        assert!(!session.has_pending_resolution());
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_versus_switches_on_miss() {
        let (mut session, _) = new_session(GameMode::Versus, SessionSettings::immediate());
        session.start();

        let a = CardId::new(0);
        session.flip(a);
        session.flip(stranger(session.state(), a));

        assert_eq!(session.state().current_player, PlayerId::new(1));
        let events = session.take_events();
        assert!(matches!(events[0], SessionEvent::Mismatched { player: PlayerId(0), .. }));
        assert_eq!(events[1], SessionEvent::PlayerSwitched(PlayerId::new(1)));
    }

    #[test]
    fn test_versus_keeps_turn_on_match() {
        let (mut session, _) = new_session(GameMode::Versus, SessionSettings::immediate());
        session.start();

        let a = CardId::new(0);
        session.flip(a);
        session.flip(partner(session.state(), a));

        assert_eq!(session.state().current_player, PlayerId::new(0));
        assert_eq!(session.state().players[PlayerId::new(0)].matches, 1);
    }

    #[test]
    fn test_pause_defers_resolution() {
        let (mut session, clock) = new_session(GameMode::Single, SessionSettings::default());
        session.start();

        let a = CardId::new(0);
        session.flip(a);
        session.flip(partner(session.state(), a));
        session.pause();

        clock.advance(2_000);
        session.tick();
        assert_eq!(session.state().stats.matches, 0);

        session.resume();
        assert_eq!(session.state().stats.matches, 1);
    }

    #[test]
    fn test_timer_feeds_state() {
        let (mut session, clock) = new_session(GameMode::Single, SessionSettings::default());
        session.start();

        clock.advance(3_200);
        session.tick();
        assert_eq!(session.state().stats.time_elapsed, 3);

        session.pause();
        clock.advance(10_000);
        session.tick();
        assert_eq!(session.state().stats.time_elapsed, 3);

        session.resume();
        clock.advance(1_000);
        session.tick();
        assert_eq!(session.state().stats.time_elapsed, 4);
    }

    #[test]
    fn test_time_up_ends_game() {
        let (mut session, clock) = new_session(GameMode::TimeAttack, SessionSettings::immediate());
        session.start();

        clock.advance(60_000);
        session.tick();

        assert_eq!(session.state().status, GameStatus::Finished);
        let events = session.take_events();
        assert_eq!(events[0], SessionEvent::TimeUp);
        match &events[1] {
            SessionEvent::Finished(record) => {
                assert!(!record.completed);
                assert_eq!(record.score, 0);
                assert_eq!(record.time_elapsed, 60);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_all_pairs_found_before_limit_counts_as_completed() {
        let settings = SessionSettings {
            match_delay_ms: 100,
            finish_delay_ms: 1_000,
        };
        let (mut session, clock) = new_session(GameMode::TimeAttack, settings);
        session.start();
        clock.advance(59_000);
        session.tick();

        for id in 0..12 {
            let id = CardId::new(id);
            if !session.state().card(id).unwrap().is_hidden() {
                continue;
            }
            session.flip(id);
            session.flip(partner(session.state(), id));
            clock.advance(100);
            session.tick();
        }
        assert_eq!(session.state().stats.matches, 6);
        assert!(session.state().is_playing());

        // The finish delay runs past the 60s limit.
        clock.advance(600);
        session.tick();

        assert!(session.state().is_finished());
        let events = session.take_events();
        assert!(!events.contains(&SessionEvent::TimeUp));
        match events.last() {
            Some(SessionEvent::Finished(record)) => {
                assert!(record.completed);
                assert_eq!(record.matches, 6);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_combo_gap_ignores_paused_time() {
        let (mut session, clock) = new_session(GameMode::TimeAttack, SessionSettings::immediate());
        session.start();

        let a = CardId::new(0);
        session.flip(a);
        session.flip(partner(session.state(), a));

        session.pause();
        clock.advance(10_000);
        session.resume();
        clock.advance(500);

        let b = session.state().cards.iter().find(|c| c.is_hidden()).unwrap().id;
        session.flip(b);
        session.flip(partner(session.state(), b));

        let combo = session.state().stats.combo.clone().unwrap();
        assert_eq!(combo.count, 2);
        assert_eq!(combo.last_match_at, Some(500));
    }

    #[test]
    fn test_time_attack_tracks_combo() {
        let (mut session, clock) = new_session(GameMode::TimeAttack, SessionSettings::immediate());
        session.start();

        let mut matched = 0;
        for id in 0..12 {
            let id = CardId::new(id);
            if !session.state().card(id).unwrap().is_hidden() {
                continue;
            }
            session.flip(id);
            session.flip(partner(session.state(), id));
            clock.advance(1_000);
            matched += 1;
            if matched == 4 {
                break;
            }
        }

        let combo = session.state().stats.combo.clone().unwrap();
        assert_eq!(combo.count, 4);
        assert_eq!(combo.multiplier, 2);
        assert_eq!(combo.max_combo, 4);
    }

    #[test]
    fn test_snapshot_restore_resumes_clock() {
        let (mut session, clock) = new_session(GameMode::Single, SessionSettings::immediate());
        session.start();
        clock.advance(7_000);
        session.tick();
        let a = CardId::new(0);
        session.flip(a);
        session.flip(partner(session.state(), a));

        let bytes = session.snapshot().unwrap();

        let (mut other, other_clock) = new_session(GameMode::Single, SessionSettings::immediate());
        other_clock.set(clock.now() + 50_000);
        other.restore(&bytes).unwrap();

        assert_eq!(other.state(), session.state());
        assert_eq!(other.elapsed(), 7);
        assert_eq!(other.generation(), 2);
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let (mut session, _) = new_session(GameMode::Single, SessionSettings::default());
        let before = session.state().clone();

        assert!(matches!(session.restore(&[1, 2, 3]), Err(SessionError::Snapshot(_))));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_restore_rejects_snapshot_without_players() {
        let (mut session, _) = new_session(GameMode::Single, SessionSettings::default());
        session.start();
        let before = session.state().clone();

        let mut value = serde_json::to_value(session.state()).unwrap();
        value["players"]["data"] = serde_json::json!([]);
        let broken: GameState = serde_json::from_value(value).unwrap();
        let bytes = bincode::serialize(&broken).unwrap();

        assert!(matches!(
            session.restore(&bytes),
            Err(SessionError::Snapshot(SnapshotError::PlayerCount { expected: 1, found: 0 }))
        ));
        assert_eq!(session.state(), &before);
        assert_eq!(session.final_score(), 0);
    }
}

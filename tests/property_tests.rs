//! Property tests for dealing, scoring and the reducer.
//!
//! Inputs are generated valid by construction; random action sequences
//! include illegal actions on purpose, since the reducer must ignore them.

use memory_match::core::{
    Action, CardId, CardState, Difficulty, GameConfig, GameMode, GameRng, GameState, PlayerId,
};
use memory_match::deck::create_shuffled_pairs;
use memory_match::reduce;
use memory_match::rules::{get_next_player, initialize_game, is_game_over};
use memory_match::scoring::{calculate_score, ComboState, MAX_COMBO_MULTIPLIER};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(64)
        .max(1);
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

fn images() -> Vec<String> {
    (0..18).map(|i| format!("img-{i}")).collect()
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

fn mode() -> impl Strategy<Value = GameMode> {
    prop::sample::select(vec![
        GameMode::Single,
        GameMode::Versus,
        GameMode::TimeAttack,
        GameMode::Challenge,
    ])
}

/// An input step. `MatchRevealed` names whatever is face-up when it runs,
/// so sequences actually reach matches.
#[derive(Clone, Debug)]
enum Step {
    Action(Action),
    MatchRevealed,
}

fn step(card_count: u32) -> impl Strategy<Value = Step> {
    let simple = prop::sample::select(vec![
        Action::Start { at: 0 },
        Action::Pause,
        Action::Resume,
        Action::Unmatch,
        Action::SwitchPlayer,
        Action::Reset,
        Action::ResetCombo,
    ]);

    prop_oneof![
        3 => simple.prop_map(Step::Action),
        4 => (0..card_count).prop_map(|i| Step::Action(Action::Flip(CardId::new(i)))),
        1 => (0..card_count, 0..card_count)
            .prop_map(|(a, b)| Step::Action(Action::Match(CardId::new(a), CardId::new(b)))),
        2 => Just(Step::MatchRevealed),
        1 => (0u32..400).prop_map(|s| Step::Action(Action::UpdateTime(s))),
        1 => (0u32..5000).prop_map(|score| Step::Action(Action::End { final_score: score, at: 1 })),
    ]
}

fn run(state: &GameState, step: &Step) -> GameState {
    match step {
        Step::Action(action) => reduce(state, action),
        Step::MatchRevealed => match state.revealed.as_slice() {
            [a, b] => reduce(state, &Action::Match(*a, *b)),
            _ => state.clone(),
        },
    }
}

fn check_invariants(state: &GameState) -> Result<(), TestCaseError> {
    prop_assert!(state.revealed.len() <= 2);

    for id in &state.revealed {
        prop_assert_eq!(state.card(*id).map(|c| c.state), Some(CardState::Revealed));
    }
    let revealed_on_board = state.cards.iter().filter(|c| c.is_revealed()).count();
    prop_assert_eq!(revealed_on_board, state.revealed.len());

    // Pairs are matched together or not at all.
    let mut matched: FxHashMap<_, usize> = FxHashMap::default();
    for card in state.cards.iter().filter(|c| c.is_matched()) {
        *matched.entry(card.pair_id).or_default() += 1;
    }
    prop_assert!(matched.values().all(|&n| n == 2));
    prop_assert_eq!(state.matched_card_count(), 2 * state.stats.matches as usize);

    let tally: u32 = state.players.values().map(|p| p.matches).sum();
    prop_assert_eq!(tally, state.stats.matches);
    prop_assert!(state.current_player.index() < state.players.player_count());
    Ok(())
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Every pair id appears exactly twice.
    #[test]
    fn prop_pairs_appear_twice(pair_count in 1usize..=18, seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        let pairs = create_shuffled_pairs(images().as_slice(), pair_count, &mut rng);

        prop_assert_eq!(pairs.len(), 2 * pair_count);
        let mut counts: FxHashMap<_, usize> = FxHashMap::default();
        for pair in &pairs {
            *counts.entry(pair.pair_id).or_default() += 1;
        }
        prop_assert_eq!(counts.len(), pair_count);
        prop_assert!(counts.values().all(|&n| n == 2));
    }

    /// The same seed always deals the same board.
    #[test]
    fn prop_deal_is_deterministic(pair_count in 1usize..=18, seed in any::<u64>()) {
        let a = create_shuffled_pairs(images().as_slice(), pair_count, &mut GameRng::new(seed));
        let b = create_shuffled_pairs(images().as_slice(), pair_count, &mut GameRng::new(seed));
        prop_assert_eq!(a, b);
    }

    /// The shuffle is a permutation of the paired images.
    #[test]
    fn prop_shuffle_is_permutation(pair_count in 1usize..=18, seed in any::<u64>()) {
        let images = images();
        let mut dealt: Vec<String> = create_shuffled_pairs(images.as_slice(), pair_count, &mut GameRng::new(seed))
            .into_iter()
            .map(|p| p.image_ref)
            .collect();
        let mut expected: Vec<String> = images[..pair_count]
            .iter()
            .flat_map(|image| [image.clone(), image.clone()])
            .collect();
        dealt.sort();
        expected.sort();
        prop_assert_eq!(dealt, expected);
    }

    /// No matches, no points, whatever else happened.
    #[test]
    fn prop_zero_matches_scores_zero(
        moves in 0u32..200,
        elapsed in 0u32..400,
        difficulty in difficulty(),
        limit in prop::option::of(0u32..400),
    ) {
        prop_assert_eq!(calculate_score(0, moves, elapsed, difficulty, limit), 0);
    }

    /// Extra misses never raise the score.
    #[test]
    fn prop_misses_never_help(
        matches in 1u32..=18,
        extra in 0u32..100,
        elapsed in 0u32..400,
        difficulty in difficulty(),
        limit in prop::option::of(0u32..400),
    ) {
        let tight = calculate_score(matches, matches + extra, elapsed, difficulty, limit);
        let loose = calculate_score(matches, matches + extra + 1, elapsed, difficulty, limit);
        prop_assert!(loose <= tight);
    }

    /// The combo multiplier stays in 1..=5 and never decreases with count.
    #[test]
    fn prop_combo_multiplier_bounded(count in 0u32..1000) {
        let m = ComboState::multiplier_for(count);
        prop_assert!((1..=MAX_COMBO_MULTIPLIER).contains(&m));
        prop_assert!(ComboState::multiplier_for(count + 1) >= m);
    }

    /// Versus rotation only ever yields the two configured players.
    #[test]
    fn prop_versus_alternates(seed in any::<u64>(), turns in 1usize..50) {
        let config = GameConfig::new(GameMode::Versus, Difficulty::Easy, "animals");
        let mut state = initialize_game(config, images().as_slice(), &mut GameRng::new(seed));

        for _ in 0..turns {
            let next = get_next_player(&state);
            prop_assert!(next == PlayerId::new(0) || next == PlayerId::new(1));
            prop_assert_ne!(next, state.current_player);
            state.current_player = next;
        }
    }

    /// Arbitrary action sequences keep the board consistent.
    #[test]
    fn prop_reducer_invariants(
        mode in mode(),
        difficulty in difficulty(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step(36), 0..120),
    ) {
        let config = GameConfig::new(mode, difficulty, "animals");
        let mut state = initialize_game(config, images().as_slice(), &mut GameRng::new(seed));
        check_invariants(&state)?;

        for step in &steps {
            let before = state.clone();
            state = run(&state, step);
            check_invariants(&state)?;

            // Finished is terminal until RESET.
            if before.is_finished() && !matches!(step, Step::Action(Action::Reset)) {
                prop_assert_eq!(&state, &before);
            }
            // Cards never leave the matched state except through RESET.
            if !matches!(step, Step::Action(Action::Reset)) {
                for (old, new) in before.cards.iter().zip(state.cards.iter()) {
                    if old.is_matched() {
                        prop_assert!(new.is_matched());
                    }
                }
            }
        }
    }

    /// RESET twice equals RESET once.
    #[test]
    fn prop_reset_idempotent(
        seed in any::<u64>(),
        steps in prop::collection::vec(step(12), 0..60),
    ) {
        let config = GameConfig::new(GameMode::Versus, Difficulty::Easy, "animals");
        let mut state = initialize_game(config, images().as_slice(), &mut GameRng::new(seed));
        for step in &steps {
            state = run(&state, step);
        }

        let once = reduce(&state, &Action::Reset);
        let twice = reduce(&once, &Action::Reset);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!is_game_over(&once));
    }
}

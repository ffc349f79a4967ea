//! Shared helpers for integration tests.
#![allow(dead_code)]

use memory_match::core::{CardId, GameState};
use tracing_subscriber::{fmt, EnvFilter};

/// Route crate logs to the test writer.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`. Safe to call
/// from every test.
pub fn init_logging() {
    let filter = std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

pub fn images() -> Vec<String> {
    (0..18).map(|i| format!("img-{i}")).collect()
}

/// The other card of `id`'s pair.
pub fn partner(state: &GameState, id: CardId) -> CardId {
    let pair = state.card(id).unwrap().pair_id;
    state
        .cards
        .iter()
        .find(|c| c.id != id && c.pair_id == pair)
        .unwrap()
        .id
}

//! Game state reducer.
//!
//! `reduce` is the single writer of `GameState`. Every transition is one
//! `Action` variant handled by one match arm:
//!
//! | Action | Precondition |
//! |---|---|
//! | `Init` | any |
//! | `Start` | `Idle` |
//! | `Pause` / `Resume` | `Playing` / `Paused` |
//! | `Flip` | `rules::can_flip_card` |
//! | `Match` / `Unmatch` | exactly two revealed cards that do / don't match |
//! | `UpdateTime` | `Playing` |
//! | `End` | not already `Finished` |
//! | `SwitchPlayer` | versus mode |
//! | `Reset` | any |
//! | `UpdateCombo` / `ResetCombo` | time-attack mode |
//!
//! Once `Finished`, only `Init` and `Reset` have any effect. Failed
//! preconditions are no-ops, never errors.

mod machine;

pub use machine::reduce;

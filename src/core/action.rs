//! Actions dispatched to the reducer.
//!
//! One variant per transition. Anything the reducer needs from the outside
//! world (seeds, timestamps, elapsed time) travels inside the action so that
//! `reduce` stays a pure function of `(state, action)`.

use serde::{Deserialize, Serialize};

use super::card::CardId;
use super::config::{GameConfig, Seconds};
use super::state::Timestamp;
use crate::scoring::ComboState;

/// A state transition request.
///
/// ```
/// use memory_match::core::{Action, CardId};
///
/// let flip = Action::Flip(CardId::new(3));
/// assert_eq!(flip.name(), "FLIP");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Deal a fresh board. `seed` drives the shuffle.
    Init {
        config: GameConfig,
        images: Vec<String>,
        seed: u64,
    },
    Start { at: Timestamp },
    Pause,
    Resume,
    Flip(CardId),
    Match(CardId, CardId),
    Unmatch,
    UpdateTime(Seconds),
    End { final_score: u32, at: Timestamp },
    SwitchPlayer,
    Reset,
    UpdateCombo(ComboState),
    ResetCombo,
}

impl Action {
    /// Stable upper-case name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Init { .. } => "INIT",
            Action::Start { .. } => "START",
            Action::Pause => "PAUSE",
            Action::Resume => "RESUME",
            Action::Flip(_) => "FLIP",
            Action::Match(..) => "MATCH",
            Action::Unmatch => "UNMATCH",
            Action::UpdateTime(_) => "UPDATE_TIME",
            Action::End { .. } => "END",
            Action::SwitchPlayer => "SWITCH_PLAYER",
            Action::Reset => "RESET",
            Action::UpdateCombo(_) => "UPDATE_COMBO",
            Action::ResetCombo => "RESET_COMBO",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Flip(id) => write!(f, "FLIP({id})"),
            Action::Match(a, b) => write!(f, "MATCH({a}, {b})"),
            Action::UpdateTime(secs) => write!(f, "UPDATE_TIME({secs})"),
            Action::End { final_score, .. } => write!(f, "END({final_score})"),
            other => f.write_str(other.name()),
        }
    }
}

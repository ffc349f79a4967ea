//! Session pacing configuration.

use serde::{Deserialize, Serialize};

/// Delays applied by `GameSession`. Neither affects correctness; both may
/// be zero, which resolves flips on the same call.
///
/// ```
/// use memory_match::session::SessionSettings;
///
/// let settings = SessionSettings::from_json(r#"{"match_delay_ms": 0}"#).unwrap();
/// assert_eq!(settings.match_delay_ms, 0);
/// assert_eq!(settings.finish_delay_ms, 500);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// How long two revealed cards stay face-up before resolving.
    pub match_delay_ms: u64,
    /// Pause between the last match and the end of the game.
    pub finish_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            match_delay_ms: 1000,
            finish_delay_ms: 500,
        }
    }
}

impl SessionSettings {
    /// No pacing at all.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            match_delay_ms: 0,
            finish_delay_ms: 0,
        }
    }

    /// Parse settings from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

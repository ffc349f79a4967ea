//! The impure shell around the reducer.
//!
//! `GameSession` owns one `GameState` and is the only place that reads a
//! clock or defers work:
//! - `Clock`: where "now" comes from (`SystemClock`, or `ManualClock` in tests)
//! - `GameTimer`: drift-free elapsed seconds with pause support
//! - `Scheduler`: generation-tagged delayed resolutions
//! - `SessionSettings`: the match and finish delays

mod clock;
mod game;
mod scheduler;
mod settings;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use game::{GameSession, SessionEvent};
pub use scheduler::{ScheduledTask, Scheduler, Task};
pub use settings::SessionSettings;
pub use timer::GameTimer;

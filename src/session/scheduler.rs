//! Delayed resolution tasks keyed by game generation.
//!
//! Every task captures the generation current when it was scheduled. Each
//! `INIT` or `RESET` advances the generation and drops the queue; a task
//! from an older generation is never applied, even if it somehow fires.

use smallvec::SmallVec;

use crate::core::{CardId, Timestamp};

/// Work deferred for visual pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Decide whether the two revealed cards match.
    ResolvePair(CardId, CardId),
    /// Compute the final score and end the game.
    Finish,
}

/// A task waiting for its due time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub generation: u64,
    pub due_at: Timestamp,
    pub task: Task,
}

/// Single-threaded timer queue.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    generation: u64,
    queue: SmallVec<[ScheduledTask; 2]>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new generation, cancelling everything pending.
    pub fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.queue.clear();
        self.generation
    }

    /// Queue `task` for `due_at` under the current generation.
    pub fn schedule(&mut self, due_at: Timestamp, task: Task) {
        self.queue.push(ScheduledTask {
            generation: self.generation,
            due_at,
            task,
        });
    }

    /// Remove and return the earliest task due at `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<ScheduledTask> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= now)
            .min_by_key(|(_, t)| t.due_at)
            .map(|(i, _)| i)?;
        Some(self.queue.remove(index))
    }

    /// Whether a task belongs to the current generation.
    #[must_use]
    pub fn is_current(&self, task: &ScheduledTask) -> bool {
        task.generation == self.generation
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, Task::Finish);
        scheduler.schedule(100, Task::ResolvePair(CardId::new(0), CardId::new(1)));

        assert_eq!(scheduler.pop_due(50), None);

        let first = scheduler.pop_due(400).unwrap();
        assert_eq!(first.due_at, 100);
        let second = scheduler.pop_due(400).unwrap();
        assert_eq!(second.task, Task::Finish);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_advance_generation_cancels() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, Task::Finish);
        let stale = ScheduledTask {
            generation: scheduler.generation(),
            due_at: 100,
            task: Task::Finish,
        };

        assert_eq!(scheduler.advance_generation(), 1);

        assert_eq!(scheduler.pending(), 0);
        assert!(!scheduler.is_current(&stale));
        assert_eq!(scheduler.pop_due(1_000), None);
    }

    #[test]
    fn test_tasks_capture_generation() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_generation();
        scheduler.schedule(0, Task::Finish);

        let task = scheduler.pop_due(0).unwrap();
        assert_eq!(task.generation, 1);
        assert!(scheduler.is_current(&task));
    }
}

//! Flip engine: uniform outcome source plus the idle/flipping guard.
//!
//! # Responsibility
//! - Draw uniformly random outcomes on demand.
//! - Commit completed flips to the history store.
//! - Suppress re-triggering while a flip is presentationally in flight.
//!
//! # Invariants
//! - At most one flip is in flight at a time.
//! - `complete_flip` always returns the service to `Idle`, even on a
//!   persistence error.

use crate::model::record::{FlipRecord, Outcome};
use crate::repo::history_repo::{HistoryRepository, RepoResult};
use crate::service::history_service::HistoryService;
use log::info;
use rand::Rng;

/// Presentational delay UI layers wait between trigger and commit.
///
/// Carries no correctness constraint; non-visual callers may ignore it.
pub const FLIP_DISPLAY_DELAY_MS: u64 = 500;

/// Trigger state of the flip engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPhase {
    /// Ready to accept a trigger.
    Idle,
    /// A flip was triggered and its commit is pending.
    Flipping,
}

/// Draws one side with uniform probability 0.5.
pub fn draw_outcome(rng: &mut impl Rng) -> Outcome {
    if rng.gen_bool(0.5) {
        Outcome::Heads
    } else {
        Outcome::Tails
    }
}

/// Flip engine bound to a history store.
pub struct FlipService<R: HistoryRepository> {
    history: HistoryService<R>,
    phase: FlipPhase,
}

impl<R: HistoryRepository> FlipService<R> {
    /// Creates an idle engine committing into the given history service.
    pub fn new(history: HistoryService<R>) -> Self {
        Self {
            history,
            phase: FlipPhase::Idle,
        }
    }

    /// Current trigger state.
    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    /// Accepts a flip trigger.
    ///
    /// Returns `false` when a flip is already in flight; the trigger is
    /// dropped, matching the disabled flip button in the UI.
    pub fn begin_flip(&mut self) -> bool {
        if self.phase == FlipPhase::Flipping {
            return false;
        }
        self.phase = FlipPhase::Flipping;
        true
    }

    /// Computes the outcome, commits the record and returns to `Idle`.
    ///
    /// Callable from `Idle` as well, for one-shot committers that keep the
    /// trigger guard on their own side (e.g. the FFI layer).
    pub fn complete_flip(&mut self, rng: &mut impl Rng) -> RepoResult<FlipRecord> {
        self.phase = FlipPhase::Idle;

        let record = FlipRecord::new(draw_outcome(rng));
        self.history.insert(&record)?;
        info!(
            "event=flip_committed module=service status=ok record={} result={}",
            record.uuid, record.result
        );
        Ok(record)
    }

    /// Trigger and commit in one step for non-visual callers.
    ///
    /// Returns `None` when a flip is already in flight.
    pub fn flip(&mut self, rng: &mut impl Rng) -> Option<RepoResult<FlipRecord>> {
        if !self.begin_flip() {
            return None;
        }
        Some(self.complete_flip(rng))
    }

    /// Read access to the underlying history service.
    pub fn history(&self) -> &HistoryService<R> {
        &self.history
    }

    /// Mutable access, e.g. for managing subscriptions.
    pub fn history_mut(&mut self) -> &mut HistoryService<R> {
        &mut self.history
    }
}

#[cfg(test)]
mod tests {
    use super::{draw_outcome, FlipPhase, FlipService};
    use crate::db::open_db_in_memory;
    use crate::model::record::Outcome;
    use crate::repo::history_repo::SqliteHistoryRepository;
    use crate::service::history_service::HistoryService;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn begin_flip_suppresses_second_trigger() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteHistoryRepository::try_new(&conn).unwrap();
        let mut engine = FlipService::new(HistoryService::new(repo));

        assert_eq!(engine.phase(), FlipPhase::Idle);
        assert!(engine.begin_flip());
        assert_eq!(engine.phase(), FlipPhase::Flipping);
        assert!(!engine.begin_flip());

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        engine.complete_flip(&mut rng).unwrap();
        assert_eq!(engine.phase(), FlipPhase::Idle);
        assert!(engine.begin_flip());
    }

    #[test]
    fn flip_commits_exactly_one_record() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteHistoryRepository::try_new(&conn).unwrap();
        let mut engine = FlipService::new(HistoryService::new(repo));

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let record = engine.flip(&mut rng).expect("engine was idle").unwrap();

        let listed = engine.history().list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], record);
    }

    #[test]
    fn flip_while_flipping_returns_none() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteHistoryRepository::try_new(&conn).unwrap();
        let mut engine = FlipService::new(HistoryService::new(repo));

        assert!(engine.begin_flip());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(engine.flip(&mut rng).is_none());
        assert_eq!(engine.history().count().unwrap(), 0);
    }

    #[test]
    fn draw_outcome_covers_both_sides() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut saw_heads = false;
        let mut saw_tails = false;
        for _ in 0..64 {
            match draw_outcome(&mut rng) {
                Outcome::Heads => saw_heads = true,
                Outcome::Tails => saw_tails = true,
            }
        }
        assert!(saw_heads && saw_tails);
    }
}

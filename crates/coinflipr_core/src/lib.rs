//! Core domain logic for CoinFlipr.
//! This crate is the single source of truth for flip and history invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{FlipRecord, Outcome, RecordId, RecordValidationError};
pub use model::view_state::{FlipViewState, ThemeMode};
pub use repo::history_repo::{
    HistoryRepository, RepoError, RepoResult, SqliteHistoryRepository,
};
pub use service::flip_service::{
    draw_outcome, FlipPhase, FlipService, FLIP_DISPLAY_DELAY_MS,
};
pub use service::history_service::{
    HistoryChange, HistoryObserver, HistoryService, SubscriptionId,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for flip history.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `FlipRecord::validate()` before
//!   persistence.
//! - Positional deletes are atomic over a snapshot of the sorted view.

pub mod history_repo;

//! Domain model for flip outcomes and their persisted history.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep records immutable: history rows are created and deleted, never
//!   updated.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Deletion is a hard delete; no tombstone state exists.

pub mod record;
pub mod view_state;

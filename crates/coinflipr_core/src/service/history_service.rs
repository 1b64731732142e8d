//! History use-case service with change notification.
//!
//! # Responsibility
//! - Provide stable insert/list/delete entry points for core callers.
//! - Notify subscribed observers after every successful mutation, replacing
//!   the framework-reactive query of the original app with an explicit
//!   subscription interface.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Observers are only notified when the store actually changed; a no-op
//!   delete emits nothing.

use crate::model::record::{FlipRecord, RecordId};
use crate::repo::history_repo::{HistoryRepository, RepoResult};
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Handle returned by `subscribe`, used to unsubscribe later.
pub type SubscriptionId = u64;

/// Mutation event emitted to history observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryChange {
    /// One record was appended.
    Inserted(RecordId),
    /// One or more records were removed, in view order.
    Deleted(Vec<RecordId>),
}

/// Receiver side of history change notifications.
pub trait HistoryObserver: Send + Sync {
    fn history_changed(&self, change: &HistoryChange);
}

/// Use-case wrapper around a history repository plus its subscribers.
pub struct HistoryService<R: HistoryRepository> {
    repo: R,
    observers: BTreeMap<SubscriptionId, Arc<dyn HistoryObserver>>,
    next_subscription: SubscriptionId,
}

impl<R: HistoryRepository> HistoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            observers: BTreeMap::new(),
            next_subscription: 1,
        }
    }

    /// Registers an observer; returns the id used to unsubscribe.
    pub fn subscribe(&mut self, observer: Arc<dyn HistoryObserver>) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.insert(id, observer);
        id
    }

    /// Removes a subscription. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    /// Appends one record and notifies observers.
    pub fn insert(&self, record: &FlipRecord) -> RepoResult<RecordId> {
        let id = self.repo.insert(record)?;
        info!(
            "event=history_insert module=service status=ok record={id} result={}",
            record.result
        );
        self.notify(&HistoryChange::Inserted(id));
        Ok(id)
    }

    /// Returns all records, most recent first.
    pub fn list(&self) -> RepoResult<Vec<FlipRecord>> {
        self.repo.list()
    }

    /// Deletes one record by identity; absent records are a silent no-op.
    pub fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let removed = self.repo.delete(id)?;
        info!("event=history_delete module=service status=ok record={id} removed={removed}");
        if removed {
            self.notify(&HistoryChange::Deleted(vec![id]));
        }
        Ok(removed)
    }

    /// Deletes by position in the current sorted view (edit-mode multi
    /// select). Returns the identities removed.
    pub fn delete_at(&self, positions: &BTreeSet<usize>) -> RepoResult<Vec<RecordId>> {
        let removed = self.repo.delete_at(positions)?;
        info!(
            "event=history_bulk_delete module=service status=ok requested={} removed={}",
            positions.len(),
            removed.len()
        );
        if !removed.is_empty() {
            self.notify(&HistoryChange::Deleted(removed.clone()));
        }
        Ok(removed)
    }

    /// Deletes every record. Returns the identities removed.
    pub fn clear(&self) -> RepoResult<Vec<RecordId>> {
        let removed = self.repo.clear()?;
        info!(
            "event=history_clear module=service status=ok removed={}",
            removed.len()
        );
        if !removed.is_empty() {
            self.notify(&HistoryChange::Deleted(removed.clone()));
        }
        Ok(removed)
    }

    /// Returns the number of stored records.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    fn notify(&self, change: &HistoryChange) {
        for observer in self.observers.values() {
            observer.history_changed(change);
        }
    }
}

//! Notification Store
//!
//! In-memory, insertion-ordered record list for the current session. The
//! store is pure data: it knows nothing about channels or toasts.
//!
//! Insertion order is display order (most recent last), so the backing map is
//! an `IndexMap` keyed by id: ordered iteration plus O(1) lookup on resolve.

use indexmap::IndexMap;
use supplytrack_core::{NotificationId, NotificationRecord, NotificationStatus, StoreError};

/// Result of [`NotificationStore::resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The record moved `New → Resolved`; carries the updated record
    Resolved(NotificationRecord),
    /// The record was already resolved
    AlreadyResolved,
    /// No record with this id (resolution raced ahead, or predates the session)
    Unknown,
}

/// Ordered record store
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    records: IndexMap<NotificationId, NotificationRecord>,
}

impl NotificationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Ids must be unique for the store's lifetime
    /// (until [`clear`](Self::clear)).
    pub fn append(&mut self, record: NotificationRecord) -> Result<(), StoreError> {
        if self.records.contains_key(&record.id) {
            return Err(StoreError::DuplicateId { id: record.id });
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Mark a record resolved. Idempotent; unknown ids are not an error.
    pub fn resolve(&mut self, id: &NotificationId) -> ResolveOutcome {
        let Some(record) = self.records.get_mut(id) else {
            return ResolveOutcome::Unknown;
        };
        if record.mark_resolved() {
            ResolveOutcome::Resolved(record.clone())
        } else {
            ResolveOutcome::AlreadyResolved
        }
    }

    /// Records in arrival order. The iterator is `Clone`, so a sequence can
    /// be restarted from any point.
    pub fn list(&self) -> impl Iterator<Item = &NotificationRecord> + Clone + '_ {
        self.records.values()
    }

    /// Look up one record
    pub fn get(&self, id: &NotificationId) -> Option<&NotificationRecord> {
        self.records.get(id)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records still awaiting resolution
    pub fn pending_count(&self) -> usize {
        self.records
            .values()
            .filter(|record| record.status == NotificationStatus::New)
            .count()
    }

    /// Remove every record. Explicit user action only.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

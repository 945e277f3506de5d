//! Record use-case service.
//!
//! # Responsibility
//! - Provide create/find/list/count/update/destroy entry points over a
//!   `RecordStore`.
//! - Persist after every successful mutation.
//!
//! # Invariants
//! - A mutation whose persist fails is rolled back in memory before the
//!   error is returned.
//! - Lookups match the exact kind; a record is never found through another
//!   kind's name.

use crate::model::record::{AttributeInput, Record, RecordId, StoreKey};
use crate::model::schema::RecordKind;
use crate::store::{RecordStore, StoreResult};
use log::info;

/// One attribute assignment requested by an update.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub name: String,
    pub input: AttributeInput,
}

impl AttributeChange {
    pub fn new(name: impl Into<String>, input: AttributeInput) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// Result of an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No record of that kind with that id exists.
    NotFound,
    /// Every requested attribute was protected; nothing was written.
    Unchanged,
    /// `applied` attributes were written and the store persisted.
    Updated { applied: usize },
}

/// Use-case service wrapper for record CRUD operations.
pub struct RecordService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> RecordService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates, registers and persists a new record of `kind`.
    ///
    /// Returns the new record id.
    pub fn create(&mut self, kind: RecordKind) -> StoreResult<RecordId> {
        let record = Record::new(kind);
        let key = record.key();
        self.store.register(record)?;

        if let Err(err) = self.store.persist() {
            self.store.remove(&key);
            return Err(err);
        }

        info!("event=record_create module=service status=ok kind={}", kind);
        Ok(key.id)
    }

    /// Gets one record by exact kind and id.
    pub fn find(&self, kind: RecordKind, id: &str) -> Option<&Record> {
        self.store.get(&StoreKey::new(kind, id))
    }

    /// Lists records of `kind`, or of every kind when `None`, in store order.
    pub fn list(&self, kind: Option<RecordKind>) -> Vec<&Record> {
        self.store
            .all()
            .filter(|record| kind.map_or(true, |kind| record.kind == kind))
            .collect()
    }

    /// Counts records of exactly `kind`.
    pub fn count(&self, kind: RecordKind) -> usize {
        self.store.all().filter(|record| record.kind == kind).count()
    }

    /// Removes one record and persists.
    ///
    /// Returns `false` without touching the store when nothing matched.
    pub fn destroy(&mut self, kind: RecordKind, id: &str) -> StoreResult<bool> {
        let key = StoreKey::new(kind, id);
        let Some(removed) = self.store.remove(&key) else {
            return Ok(false);
        };

        if let Err(err) = self.store.persist() {
            self.store.restore(removed)?;
            return Err(err);
        }

        info!("event=record_destroy module=service status=ok kind={}", kind);
        Ok(true)
    }

    /// Applies attribute changes to one record, refreshes `updated_at` and
    /// persists when at least one change was written.
    pub fn update(
        &mut self,
        kind: RecordKind,
        id: &str,
        changes: Vec<AttributeChange>,
    ) -> StoreResult<UpdateOutcome> {
        let key = StoreKey::new(kind, id);
        let Some(record) = self.store.get_mut(&key) else {
            return Ok(UpdateOutcome::NotFound);
        };

        let snapshot = record.clone();
        let mut applied = 0;
        for change in changes {
            if record.set_attribute(&change.name, change.input) {
                applied += 1;
            }
        }
        if applied == 0 {
            return Ok(UpdateOutcome::Unchanged);
        }
        record.touch();

        if let Err(err) = self.store.persist() {
            self.store.register(snapshot)?;
            return Err(err);
        }

        info!(
            "event=record_update module=service status=ok kind={} attributes={}",
            kind, applied
        );
        Ok(UpdateOutcome::Updated { applied })
    }
}

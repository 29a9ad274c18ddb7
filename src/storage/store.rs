//! The session store: validated, ordered, observable access to records.
//!
//! The store owns the authoritative in-memory collection and writes every
//! mutation through its backend before touching memory. A backend failure
//! therefore leaves both the durable copy and the in-memory copy at their
//! last good state, and no change signal is sent.

use crate::core::catalog::DEFAULT_TITLE;
use crate::core::clock::Clock;
use crate::core::notify::{ChangeNotifier, Subscription, SubscriptionId};
use crate::core::record::{SessionFields, SessionRecord};
use crate::core::stats::Statistics;
use crate::error::{Error, Result};
use crate::storage::traits::SessionBackend;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Durable collection of completed session records.
#[derive(Debug)]
pub struct SessionStore {
    backend: Box<dyn SessionBackend>,
    clock: Arc<dyn Clock>,
    notifier: ChangeNotifier,
    default_title: String,
    /// Records in insertion order. Held for writing across each backend call
    /// so mutations are serialized.
    records: RwLock<Vec<SessionRecord>>,
}

impl SessionStore {
    /// Open a store over `backend`, loading its current contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn open(backend: impl SessionBackend + 'static, clock: Arc<dyn Clock>) -> Result<Self> {
        let records = backend.load_sessions()?;
        info!(count = records.len(), "session store opened");
        Ok(Self {
            backend: Box::new(backend),
            clock,
            notifier: ChangeNotifier::new(),
            default_title: DEFAULT_TITLE.to_string(),
            records: RwLock::new(records),
        })
    }

    /// Use `title` for records created or updated with a blank title.
    #[must_use]
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Persist a new record that started now.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for a zero duration or a mood outside 1..=5,
    /// or a persistence error if the backend write fails.
    pub fn create(&self, fields: SessionFields) -> Result<SessionRecord> {
        let now = self.clock.now();
        self.insert(fields, now, now)
    }

    /// Persist a new record for a session that began at `start_time`.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::create`].
    pub fn create_started_at(
        &self,
        fields: SessionFields,
        start_time: DateTime<Utc>,
    ) -> Result<SessionRecord> {
        self.insert(fields, start_time, self.clock.now())
    }

    fn insert(
        &self,
        mut fields: SessionFields,
        start_time: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Result<SessionRecord> {
        fields.normalize(&self.default_title);
        fields.validate()?;

        let record = SessionRecord {
            id: Uuid::new_v4(),
            fields,
            start_time,
            created_at,
        };

        {
            let mut records = self.write();
            self.persist(self.backend.put_session(&record))?;
            records.push(record.clone());
        }

        info!(id = %record.id, duration = record.fields.duration, "session recorded");
        self.notifier.broadcast();
        Ok(record)
    }

    /// All records, newest `created_at` first.
    ///
    /// Records sharing a `created_at` keep their insertion order. The
    /// returned vector is a snapshot and never changes afterwards.
    #[must_use]
    pub fn list(&self) -> Vec<SessionRecord> {
        let mut snapshot: Vec<SessionRecord> = self.read().clone();
        snapshot.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        snapshot
    }

    /// Look up one record.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<SessionRecord> {
        self.read().iter().find(|r| r.id == id).cloned()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Edit a record's fields and refresh its `created_at`.
    ///
    /// The id and start time cannot be changed. `mutator` runs before the
    /// store is locked, so it may read the store.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown id, `Error::Validation` if the
    /// edited fields are out of range, or a persistence error.
    pub fn update(&self, id: Uuid, mutator: impl FnOnce(&mut SessionFields)) -> Result<SessionRecord> {
        let mut fields = self.get(id).ok_or(Error::NotFound(id))?.fields;
        mutator(&mut fields);
        fields.normalize(&self.default_title);
        fields.validate()?;

        let updated = {
            let mut records = self.write();
            let index = records
                .iter()
                .position(|r| r.id == id)
                .ok_or(Error::NotFound(id))?;

            let updated = SessionRecord {
                fields,
                created_at: self.clock.now(),
                ..records[index].clone()
            };
            self.persist(self.backend.put_session(&updated))?;
            records[index] = updated.clone();
            updated
        };

        info!(%id, "session updated");
        self.notifier.broadcast();
        Ok(updated)
    }

    /// Remove one record, returning it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown id, or a persistence error.
    pub fn delete(&self, id: Uuid) -> Result<SessionRecord> {
        let removed = {
            let mut records = self.write();
            let index = records
                .iter()
                .position(|r| r.id == id)
                .ok_or(Error::NotFound(id))?;
            self.persist(self.backend.delete_session(id))?;
            records.remove(index)
        };

        info!(%id, "session deleted");
        self.notifier.broadcast();
        Ok(removed)
    }

    /// Remove every record, returning how many were removed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the backend cannot be cleared.
    pub fn clear_all(&self) -> Result<usize> {
        let removed = {
            let mut records = self.write();
            self.persist(self.backend.clear_sessions())?;
            let removed = records.len();
            records.clear();
            removed
        };

        info!(removed, "session store cleared");
        self.notifier.broadcast();
        Ok(removed)
    }

    /// Statistics over one snapshot as of the store's clock.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let snapshot = self.read().clone();
        Statistics::compute(&snapshot, self.clock.now())
    }

    /// Listen for store-changed signals.
    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }

    /// Stop listening. Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// The clock stamping new records.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn persist(&self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            warn!(error = %e, "session store write failed, keeping last good state");
        } else {
            debug!("session store write committed");
        }
        result
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<SessionRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<SessionRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

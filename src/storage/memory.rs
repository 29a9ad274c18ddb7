//! In-memory storage backend for testing.

use crate::core::SessionRecord;
use crate::error::Result;
use crate::storage::traits::SessionBackend;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// In-memory storage backend for testing and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sessions: RwLock<Vec<SessionRecord>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with `records`, in order.
    #[must_use]
    pub fn with_sessions(records: Vec<SessionRecord>) -> Self {
        Self {
            sessions: RwLock::new(records),
        }
    }
}

impl SessionBackend for MemoryBackend {
    fn load_sessions(&self) -> Result<Vec<SessionRecord>> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(sessions.clone())
    }

    fn put_session(&self, record: &SessionRecord) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => sessions.push(record.clone()),
        }
        Ok(())
    }

    fn delete_session(&self, id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|r| r.id != id);
        Ok(())
    }

    fn clear_sessions(&self) -> Result<()> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

//! Storage trait definitions.

use crate::core::SessionRecord;
use crate::error::Result;
use std::fmt::Debug;
use uuid::Uuid;

/// Durable backend for session records.
///
/// Backends only persist; validation, ordering and notification live in
/// [`SessionStore`](crate::storage::SessionStore).
pub trait SessionBackend: Debug + Send + Sync {
    /// Load every record, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn load_sessions(&self) -> Result<Vec<SessionRecord>>;

    /// Insert a record, or replace the one with the same id in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn put_session(&self, record: &SessionRecord) -> Result<()>;

    /// Remove a record. Removing an absent id succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn delete_session(&self, id: Uuid) -> Result<()>;

    /// Remove every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn clear_sessions(&self) -> Result<()>;
}

//! Optional health-platform sink for finished sessions.

use crate::core::record::SessionRecord;
use crate::error::Result;
use std::fmt::Debug;

/// Best-effort destination for mindful-minutes entries.
///
/// The coordinator never blocks on or fails because of a sink.
pub trait MindfulnessSink: Debug + Send + Sync {
    /// Whether the platform is present and writes are authorized.
    fn is_available(&self) -> bool;

    /// Record the span `record.start_time ..= record.end_time()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the entry.
    fn record_session(&self, record: &SessionRecord) -> Result<()>;
}

/// Sink used when no health platform is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHealthSink;

impl MindfulnessSink for NoHealthSink {
    fn is_available(&self) -> bool {
        false
    }

    fn record_session(&self, _record: &SessionRecord) -> Result<()> {
        Ok(())
    }
}

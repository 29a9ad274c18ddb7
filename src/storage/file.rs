//! File-based storage backend.
//!
//! All records live in one `sessions.json` array under the data directory.
//! Every mutation rewrites it through a temp file and rename, so a crash
//! mid-write leaves the previous version intact.

use crate::core::SessionRecord;
use crate::error::Result;
use crate::storage::traits::SessionBackend;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Name of the session document inside the data directory.
pub const SESSIONS_FILE: &str = "sessions.json";

/// File-based storage backend with atomic writes.
#[derive(Debug)]
pub struct FileBackend {
    base_dir: PathBuf,
    /// Serializes read-modify-write cycles on the document.
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Create a new file backend.
    ///
    /// Creates the data directory if it doesn't exist. A missing session
    /// document is treated as an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Path to the session document.
    #[must_use]
    pub fn sessions_path(&self) -> PathBuf {
        self.base_dir.join(SESSIONS_FILE)
    }

    fn read_all(&self) -> Result<Vec<SessionRecord>> {
        let path = self.sessions_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, records: &[SessionRecord]) -> Result<()> {
        let contents = serde_json::to_string_pretty(records)?;
        write_atomic(&self.sessions_path(), &contents)
    }

    fn modify(&self, f: impl FnOnce(&mut Vec<SessionRecord>)) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read_all()?;
        f(&mut records);
        self.write_all(&records)
    }
}

impl SessionBackend for FileBackend {
    fn load_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.read_all()
    }

    fn put_session(&self, record: &SessionRecord) -> Result<()> {
        self.modify(|records| match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        })
    }

    fn delete_session(&self, id: Uuid) -> Result<()> {
        self.modify(|records| records.retain(|r| r.id != id))
    }

    fn clear_sessions(&self) -> Result<()> {
        self.modify(Vec::clear)
    }
}

/// Write `contents` to `path` via a sibling temp file and rename.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or renamed.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp = path.with_extension("tmp");
    fs::write(&temp, contents)?;
    // Atomic rename - prevents corruption if process crashes mid-write
    fs::rename(&temp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionFields;
    use crate::error::Error;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_backend() -> (FileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().to_path_buf()).unwrap();
        (backend, temp_dir)
    }

    fn record(duration: u32) -> SessionRecord {
        let at = Utc.with_ymd_and_hms(2024, 2, 2, 21, 0, 0).unwrap();
        SessionRecord {
            id: Uuid::new_v4(),
            fields: SessionFields::new(duration, 2, 4).with_notes("steady"),
            start_time: at,
            created_at: at,
        }
    }

    #[test]
    fn creates_data_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let _backend = FileBackend::new(nested.clone()).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn first_launch_is_empty() {
        let (store, _temp) = create_test_backend();
        assert!(store.load_sessions().unwrap().is_empty());
        assert!(!store.sessions_path().exists());
    }

    #[test]
    fn put_and_load_round_trip() {
        let (store, _temp) = create_test_backend();
        let a = record(60);
        let b = record(300);

        store.put_session(&a).unwrap();
        store.put_session(&b).unwrap();

        assert_eq!(store.load_sessions().unwrap(), vec![a, b]);
    }

    #[test]
    fn survives_reopen() {
        let (store, temp) = create_test_backend();
        let a = record(60);
        store.put_session(&a).unwrap();
        drop(store);

        let reopened = FileBackend::new(temp.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load_sessions().unwrap(), vec![a]);
    }

    #[test]
    fn put_replaces_existing() {
        let (store, _temp) = create_test_backend();
        let mut a = record(60);
        store.put_session(&a).unwrap();

        a.fields.mood_after = 5;
        store.put_session(&a).unwrap();

        let loaded = store.load_sessions().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].fields.mood_after, 5);
    }

    #[test]
    fn delete_and_clear() {
        let (store, _temp) = create_test_backend();
        let a = record(60);
        let b = record(90);
        store.put_session(&a).unwrap();
        store.put_session(&b).unwrap();

        store.delete_session(a.id).unwrap();
        assert_eq!(store.load_sessions().unwrap(), vec![b]);

        // Should not error when deleting a missing record
        store.delete_session(a.id).unwrap();

        store.clear_sessions().unwrap();
        assert!(store.load_sessions().unwrap().is_empty());
        store.clear_sessions().unwrap();
    }

    #[test]
    fn atomic_write_creates_no_temp_file() {
        let (store, temp_dir) = create_test_backend();
        store.put_session(&record(60)).unwrap();

        assert!(!temp_dir.path().join("sessions.tmp").exists());
        assert!(temp_dir.path().join(SESSIONS_FILE).exists());
    }

    #[test]
    fn empty_file_is_empty_store() {
        let (store, temp_dir) = create_test_backend();
        fs::write(temp_dir.path().join(SESSIONS_FILE), "").unwrap();
        assert!(store.load_sessions().unwrap().is_empty());
    }

    #[test]
    fn corrupted_file_is_an_error() {
        let (store, temp_dir) = create_test_backend();
        fs::write(temp_dir.path().join(SESSIONS_FILE), "{ not json ]").unwrap();

        let err = store.load_sessions().unwrap_err();
        assert!(matches!(err, Error::Serde(_)));

        // A write must not clobber data it could not read
        assert!(store.put_session(&record(60)).is_err());
        let raw = fs::read_to_string(temp_dir.path().join(SESSIONS_FILE)).unwrap();
        assert_eq!(raw, "{ not json ]");
    }

    #[test]
    fn stray_temp_file_is_ignored() {
        let (store, temp_dir) = create_test_backend();
        let a = record(60);
        store.put_session(&a).unwrap();
        fs::write(temp_dir.path().join("sessions.tmp"), "garbage").unwrap();

        assert_eq!(store.load_sessions().unwrap(), vec![a]);
    }
}

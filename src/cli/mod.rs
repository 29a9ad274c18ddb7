//! CLI command implementations.

pub mod clear;
pub mod delete;
pub mod edit;
pub mod list;
pub mod log;
pub mod options;
pub mod settings;
pub mod sit;
pub mod stats;

use crate::config::Config;
use crate::core::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::settings::SettingsFile;
use crate::storage::{FileBackend, SessionBackend, SessionStore};
use std::sync::Arc;
use uuid::Uuid;

/// Shortest id prefix accepted on the command line.
const MIN_ID_PREFIX: usize = 4;

/// Application root: owns the store and settings for one command run.
#[derive(Debug)]
pub struct App {
    /// Loaded configuration.
    pub config: Config,
    /// The session store, shared with any coordinator.
    pub store: Arc<SessionStore>,
    /// User preferences.
    pub settings: SettingsFile,
}

impl App {
    /// Open the file-backed store under `config.storage.path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or session document cannot be
    /// read.
    pub fn open(config: Config) -> Result<Self> {
        let backend = FileBackend::new(config.storage.path.clone())?;
        Self::with_backend(config, backend, Arc::new(SystemClock))
    }

    /// Open over an explicit backend and clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn with_backend(
        config: Config,
        backend: impl SessionBackend + 'static,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let store = SessionStore::open(backend, clock)?
            .with_default_title(config.session.default_title.clone());
        let settings = SettingsFile::new(&config.storage.path);
        Ok(Self {
            config,
            store: Arc::new(store),
            settings,
        })
    }
}

/// Resolve a full id or a unique prefix of one.
///
/// # Errors
///
/// Returns `Error::Validation` if the prefix is too short, matches nothing,
/// or matches more than one record.
pub fn resolve_id(store: &SessionStore, input: &str) -> Result<Uuid> {
    let input = input.trim();
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }

    if input.len() < MIN_ID_PREFIX {
        return Err(Error::Validation(format!(
            "session id '{input}' is too short (use at least {MIN_ID_PREFIX} characters)"
        )));
    }

    let needle = input.to_lowercase();
    let matches: Vec<Uuid> = store
        .list()
        .iter()
        .map(|r| r.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::Validation(format!("no session matches '{input}'"))),
        _ => Err(Error::Validation(format!(
            "'{input}' matches {} sessions, use more characters",
            matches.len()
        ))),
    }
}

/// First 8 characters of an id, as shown in listings.
#[must_use]
pub fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

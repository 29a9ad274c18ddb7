//! User preferences: daily goal, ambience and onboarding state.
//!
//! Stored as `settings.json` next to the session document. The session core
//! only reads `daily_goal`; everything else is passed through to the UI.

use crate::core::catalog::{BACKGROUND_IMAGE, BACKGROUND_MUSIC, OptionSet};
use crate::core::coordinator::Ambience;
use crate::error::{Error, Result};
use crate::storage::file::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the settings document inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sessions per day the user aims for. At least 1.
    pub daily_goal: u32,

    /// Ambient sound key.
    pub background_music: String,

    /// Backdrop key.
    pub background_image: String,

    /// Whether the user granted health-platform access.
    pub health_authorized: bool,

    /// Whether first-run setup was completed.
    pub has_completed_onboarding: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal: 1,
            background_music: BACKGROUND_MUSIC.default_key().to_string(),
            background_image: BACKGROUND_IMAGE.default_key().to_string(),
            health_authorized: false,
            has_completed_onboarding: false,
        }
    }
}

impl Settings {
    /// Set the daily goal.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if `goal` is 0.
    pub fn set_daily_goal(&mut self, goal: u32) -> Result<()> {
        if goal == 0 {
            return Err(Error::Validation("daily goal must be at least 1".to_string()));
        }
        self.daily_goal = goal;
        Ok(())
    }

    /// Select an ambient sound.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for a key not in [`BACKGROUND_MUSIC`].
    pub fn set_background_music(&mut self, key: &str) -> Result<()> {
        self.background_music = known_key(&BACKGROUND_MUSIC, "background music", key)?;
        Ok(())
    }

    /// Select a backdrop.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for a key not in [`BACKGROUND_IMAGE`].
    pub fn set_background_image(&mut self, key: &str) -> Result<()> {
        self.background_image = known_key(&BACKGROUND_IMAGE, "background image", key)?;
        Ok(())
    }

    /// Session context derived from these preferences.
    #[must_use]
    pub fn ambience(&self, session_type: &str) -> Ambience {
        Ambience {
            session_type: session_type.to_string(),
            background_music: self.background_music.clone(),
            background_image: self.background_image.clone(),
        }
    }
}

fn known_key(set: &OptionSet, what: &str, key: &str) -> Result<String> {
    if set.contains(key) {
        Ok(key.to_string())
    } else {
        let known: Vec<_> = set.keys().collect();
        Err(Error::Validation(format!(
            "unknown {what} '{key}' (expected one of: {})",
            known.join(", ")
        )))
    }
}

/// Reads and writes [`Settings`] in a data directory.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Settings stored in `base_dir`.
    #[must_use]
    pub fn new(base_dir: &Path) -> Self {
        Self {
            path: base_dir.join(SETTINGS_FILE),
        }
    }

    /// Load settings, or defaults if none were saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save settings atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, &serde_json::to_string_pretty(settings)?)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Load, apply `f`, and save only if `f` succeeds.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a load/save error.
    pub fn update(&self, f: impl FnOnce(&mut Settings) -> Result<()>) -> Result<Settings> {
        let mut settings = self.load()?;
        f(&mut settings)?;
        self.save(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.daily_goal, 1);
        assert_eq!(s.background_music, "rain");
        assert_eq!(s.background_image, "forest");
        assert!(!s.health_authorized);
        assert!(!s.has_completed_onboarding);
    }

    #[test]
    fn goal_must_be_positive() {
        let mut s = Settings::default();
        assert!(matches!(s.set_daily_goal(0), Err(Error::Validation(_))));
        assert_eq!(s.daily_goal, 1);
        s.set_daily_goal(3).unwrap();
        assert_eq!(s.daily_goal, 3);
    }

    #[test]
    fn option_keys_must_be_known() {
        let mut s = Settings::default();
        s.set_background_music("ocean").unwrap();
        s.set_background_image("sunset").unwrap();
        assert_eq!(s.background_music, "ocean");
        assert_eq!(s.background_image, "sunset");

        let err = s.set_background_music("dubstep").unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("rain, forest, ocean, silence")));
        assert_eq!(s.background_music, "ocean");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let file = SettingsFile::new(temp.path());
        assert_eq!(file.load().unwrap(), Settings::default());
    }

    #[test]
    fn save_and_load() {
        let temp = TempDir::new().unwrap();
        let file = SettingsFile::new(temp.path());

        let mut s = Settings::default();
        s.set_daily_goal(4).unwrap();
        s.has_completed_onboarding = true;
        file.save(&s).unwrap();

        assert_eq!(file.load().unwrap(), s);
        assert!(!temp.path().join("settings.tmp").exists());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SETTINGS_FILE), r#"{"daily_goal": 5}"#).unwrap();

        let s = SettingsFile::new(temp.path()).load().unwrap();
        assert_eq!(s.daily_goal, 5);
        assert_eq!(s.background_music, "rain");
    }

    #[test]
    fn unknown_stored_keys_are_kept() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            r#"{"background_music": "whale-song"}"#,
        )
        .unwrap();

        let s = SettingsFile::new(temp.path()).load().unwrap();
        assert_eq!(s.background_music, "whale-song");
        assert_eq!(BACKGROUND_MUSIC.label(&s.background_music), "Unknown sound");
    }

    #[test]
    fn failed_update_does_not_save() {
        let temp = TempDir::new().unwrap();
        let file = SettingsFile::new(temp.path());

        assert!(file.update(|s| s.set_daily_goal(0)).is_err());
        assert!(!temp.path().join(SETTINGS_FILE).exists());

        let saved = file.update(|s| s.set_daily_goal(2)).unwrap();
        assert_eq!(saved.daily_goal, 2);
        assert_eq!(file.load().unwrap().daily_goal, 2);
    }

    #[test]
    fn ambience_from_settings() {
        let mut s = Settings::default();
        s.set_background_music("silence").unwrap();
        let a = s.ambience("mindfulness");
        assert_eq!(a.session_type, "mindfulness");
        assert_eq!(a.background_music, "silence");
        assert_eq!(a.background_image, "forest");
    }
}

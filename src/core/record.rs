//! Session record types.

use crate::core::catalog::{BACKGROUND_IMAGE, BACKGROUND_MUSIC, DEFAULT_TITLE, SESSION_TYPES};
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Valid mood scores.
pub const MOOD_RANGE: RangeInclusive<u8> = 1..=5;

/// Caller-supplied part of a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFields {
    /// Display label.
    pub title: String,

    /// Planned length in seconds.
    pub duration: u32,

    /// Practice style key (see [`SESSION_TYPES`]).
    pub session_type: String,

    /// Ambient sound key (see [`BACKGROUND_MUSIC`]).
    pub background_music: String,

    /// Backdrop key (see [`BACKGROUND_IMAGE`]).
    pub background_image: String,

    /// Mood before the session, 1 to 5.
    pub mood_before: u8,

    /// Mood after the session, 1 to 5.
    pub mood_after: u8,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SessionFields {
    /// Fields with the default title, type, sound and scene.
    #[must_use]
    pub fn new(duration: u32, mood_before: u8, mood_after: u8) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            duration,
            session_type: SESSION_TYPES.default_key().to_string(),
            background_music: BACKGROUND_MUSIC.default_key().to_string(),
            background_image: BACKGROUND_IMAGE.default_key().to_string(),
            mood_before,
            mood_after,
            notes: None,
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the practice style key.
    #[must_use]
    pub fn with_session_type(mut self, session_type: impl Into<String>) -> Self {
        self.session_type = session_type.into();
        self
    }

    /// Check duration and mood ranges.
    ///
    /// Out-of-range values are rejected, never clamped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(Error::Validation(
                "duration must be a positive number of seconds".to_string(),
            ));
        }
        for (name, mood) in [("mood_before", self.mood_before), ("mood_after", self.mood_after)] {
            if !MOOD_RANGE.contains(&mood) {
                return Err(Error::Validation(format!(
                    "{name} must be between {} and {} (got {mood})",
                    MOOD_RANGE.start(),
                    MOOD_RANGE.end()
                )));
            }
        }
        Ok(())
    }

    /// Replace a blank title with `default_title`. Notes are kept as given.
    pub(crate) fn normalize(&mut self, default_title: &str) {
        if self.title.trim().is_empty() {
            self.title = default_title.to_string();
        }
    }
}

/// One persisted meditation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique identifier, never reused.
    pub id: Uuid,

    /// Editable fields.
    #[serde(flatten)]
    pub fields: SessionFields,

    /// When the session actually began.
    pub start_time: DateTime<Utc>,

    /// When the record was persisted or last updated. Sort key.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Mood change across the session.
    #[must_use]
    pub fn mood_delta(&self) -> i32 {
        i32::from(self.fields.mood_after) - i32::from(self.fields.mood_before)
    }

    /// When the planned session ended.
    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::seconds(i64::from(self.fields.duration))
    }
}

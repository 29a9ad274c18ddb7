//! `hush log` command implementation.

use crate::cli::{App, short_id};
use crate::core::SessionRecord;
use crate::core::record::SessionFields;
use crate::core::stats::format_duration;
use crate::error::Result;

/// A session entered after the fact.
#[derive(Debug, Clone)]
pub struct LogArgs {
    /// Length in seconds.
    pub duration: u32,
    /// Mood before, 1 to 5.
    pub mood_before: u8,
    /// Mood after, 1 to 5.
    pub mood_after: u8,
    /// Record title.
    pub title: Option<String>,
    /// Practice style key.
    pub session_type: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Run the log command.
///
/// # Errors
///
/// Returns `Error::Validation` for invalid fields, or a storage error.
pub fn run(app: &App, args: &LogArgs) -> Result<()> {
    let record = log_session(app, args)?;
    println!(
        "Logged {} session {} ({}→{}).",
        format_duration(u64::from(record.fields.duration)),
        short_id(record.id),
        record.fields.mood_before,
        record.fields.mood_after,
    );
    Ok(())
}

fn log_session(app: &App, args: &LogArgs) -> Result<SessionRecord> {
    let settings = app.settings.load()?;
    let session_type = args
        .session_type
        .clone()
        .unwrap_or_else(|| app.config.session.default_type.clone());
    let ambience = settings.ambience(&session_type);

    let fields = SessionFields {
        title: args.title.clone().unwrap_or_default(),
        duration: args.duration,
        session_type: ambience.session_type,
        background_music: ambience.background_music,
        background_image: ambience.background_image,
        mood_before: args.mood_before,
        mood_after: args.mood_after,
        notes: args.notes.clone(),
    };
    app.store.create(fields)
}

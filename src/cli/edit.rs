//! `hush edit` command implementation.

use crate::cli::{App, resolve_id, short_id};
use crate::core::SessionRecord;
use crate::error::{Error, Result};

/// Field changes for an existing session. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct EditArgs {
    /// Full id or unique prefix.
    pub id: String,
    /// New title; blank restores the default.
    pub title: Option<String>,
    /// New length in seconds.
    pub duration: Option<u32>,
    /// New mood before.
    pub mood_before: Option<u8>,
    /// New mood after.
    pub mood_after: Option<u8>,
    /// New notes.
    pub notes: Option<String>,
    /// Remove the notes.
    pub clear_notes: bool,
    /// New practice style key.
    pub session_type: Option<String>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.duration.is_none()
            && self.mood_before.is_none()
            && self.mood_after.is_none()
            && self.notes.is_none()
            && !self.clear_notes
            && self.session_type.is_none()
    }
}

/// Run the edit command.
///
/// # Errors
///
/// Returns an error if no change was given, the id is unknown, or the edited
/// record fails validation.
pub fn run(app: &App, args: &EditArgs) -> Result<()> {
    let record = edit_session(app, args)?;
    println!("Updated session {}.", short_id(record.id));
    Ok(())
}

fn edit_session(app: &App, args: &EditArgs) -> Result<SessionRecord> {
    if args.is_empty() {
        return Err(Error::Validation("nothing to change".to_string()));
    }
    if args.clear_notes && args.notes.is_some() {
        return Err(Error::Validation(
            "--notes and --clear-notes cannot be combined".to_string(),
        ));
    }

    let id = resolve_id(&app.store, &args.id)?;
    app.store.update(id, |fields| {
        if let Some(title) = &args.title {
            fields.title.clone_from(title);
        }
        if let Some(duration) = args.duration {
            fields.duration = duration;
        }
        if let Some(m) = args.mood_before {
            fields.mood_before = m;
        }
        if let Some(m) = args.mood_after {
            fields.mood_after = m;
        }
        if let Some(notes) = &args.notes {
            fields.notes = Some(notes.clone());
        }
        if args.clear_notes {
            fields.notes = None;
        }
        if let Some(t) = &args.session_type {
            fields.session_type.clone_from(t);
        }
    })
}

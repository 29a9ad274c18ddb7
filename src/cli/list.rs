//! `hush list` command implementation.

use crate::cli::{App, short_id};
use crate::core::SessionRecord;
use crate::core::stats::format_duration;
use crate::error::Result;
use chrono::{DateTime, Local, Utc};

/// Default number of sessions to show.
const DEFAULT_LIMIT: usize = 20;

/// Maximum length for notes preview.
const NOTES_PREVIEW_LEN: usize = 40;

/// Run the list command.
///
/// Shows recent sessions, newest first.
///
/// # Errors
///
/// Currently infallible once the store is open; kept fallible like the other
/// commands.
pub fn run(app: &App, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let sessions = app.store.list();

    if sessions.is_empty() {
        println!("No sessions yet. Start one with `hush sit`.");
        println!("\nSessions are stored in: {}", app.config.storage.path.display());
        return Ok(());
    }

    println!(
        "{:<10} {:<17} {:>8} {:>6}  {:<16} Notes",
        "ID", "When", "Length", "Mood", "Title"
    );
    println!("{}", "─".repeat(90));

    for record in sessions.iter().take(limit) {
        println!("{}", format_row(record));
    }

    println!("{}", "─".repeat(90));
    println!(
        "Showing {} of {} session(s)",
        sessions.len().min(limit),
        sessions.len()
    );

    Ok(())
}

/// One table row.
fn format_row(record: &SessionRecord) -> String {
    format!(
        "{:<10} {:<17} {:>8} {:>6}  {:<16} {}",
        short_id(record.id),
        format_local_time(record.created_at),
        format_duration(u64::from(record.fields.duration)),
        format!("{}→{}", record.fields.mood_before, record.fields.mood_after),
        record.fields.title,
        format_notes_preview(record.fields.notes.as_deref()),
    )
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

/// Format notes preview, truncating if needed.
fn format_notes_preview(notes: Option<&str>) -> String {
    match notes {
        Some(n) => {
            let first_line = n.lines().next().unwrap_or(n);
            if first_line.chars().count() > NOTES_PREVIEW_LEN {
                let cut: String = first_line.chars().take(NOTES_PREVIEW_LEN).collect();
                format!("{cut}...")
            } else {
                first_line.to_string()
            }
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::test_app;
    use crate::core::SessionFields;

    #[test]
    fn list_runs_on_empty_store() {
        let (app, _clock, _temp) = test_app();
        run(&app, None).unwrap();
    }

    #[test]
    fn row_contains_fields() {
        let (app, _clock, _temp) = test_app();
        let r = app
            .store
            .create(SessionFields::new(270, 2, 4).with_title("Dawn").with_notes("birds"))
            .unwrap();

        let row = format_row(&r);
        assert!(row.starts_with(&short_id(r.id)));
        assert!(row.contains("4m 30s"));
        assert!(row.contains("2→4"));
        assert!(row.contains("Dawn"));
        assert!(row.contains("birds"));
    }

    #[test]
    fn notes_preview_truncates_long_notes() {
        let long = "x".repeat(100);
        let preview = format_notes_preview(Some(&long));
        assert_eq!(preview.chars().count(), NOTES_PREVIEW_LEN + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn notes_preview_takes_first_line() {
        assert_eq!(format_notes_preview(Some("first\nsecond")), "first");
        assert_eq!(format_notes_preview(None), "");
    }

    #[test]
    fn notes_preview_respects_char_boundaries() {
        let notes = "靜".repeat(50);
        let preview = format_notes_preview(Some(&notes));
        assert!(preview.ends_with("..."));
    }
}

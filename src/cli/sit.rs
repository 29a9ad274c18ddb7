//! `hush sit` command implementation.
//!
//! Runs a countdown in the terminal, then asks for the mood check-in. An
//! empty answer abandons the session without storing anything.

use crate::cli::{App, short_id};
use crate::core::catalog::{BACKGROUND_IMAGE, BACKGROUND_MUSIC, SESSION_TYPES};
use crate::core::record::MOOD_RANGE;
use crate::core::stats::{format_duration, remaining_for_goal};
use crate::core::{Ambience, CompletionInput, SessionCoordinator, SessionRecord, TimerEngine};
use crate::error::{Error, Result};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

/// How often the countdown is advanced and redrawn.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Options for a sitting.
#[derive(Debug, Clone, Default)]
pub struct SitArgs {
    /// Requested length in minutes.
    pub minutes: Option<u32>,
    /// Requested length in seconds; wins over `minutes`.
    pub seconds: Option<u32>,
    /// Use the wider custom-entry bounds.
    pub custom: bool,
    /// Practice style key.
    pub session_type: Option<String>,
    /// Record title.
    pub title: Option<String>,
    /// Mood before, skips the prompt.
    pub mood_before: Option<u8>,
    /// Mood after, skips the prompt.
    pub mood_after: Option<u8>,
    /// Notes, skips the prompt.
    pub notes: Option<String>,
}

/// Run the sit command.
///
/// # Errors
///
/// Returns an error for an out-of-range mood flag, a terminal I/O failure,
/// or if the finished session cannot be stored.
pub fn run(app: &App, args: &SitArgs) -> Result<()> {
    check_mood_flag("mood before", args.mood_before)?;
    check_mood_flag("mood after", args.mood_after)?;

    let settings = app.settings.load()?;
    let session_type = args
        .session_type
        .clone()
        .unwrap_or_else(|| app.config.session.default_type.clone());
    let mut coordinator = build_coordinator(app, args, &settings.ambience(&session_type))?;
    let total = coordinator.timer().total_seconds();

    println!(
        "Sitting for {} · {} · {} · {}",
        format_duration(u64::from(total)),
        SESSION_TYPES.label(&session_type),
        BACKGROUND_MUSIC.label(&settings.background_music),
        BACKGROUND_IMAGE.label(&settings.background_image),
    );

    coordinator.start();
    let mut stdout = io::stdout();
    let event = loop {
        thread::sleep(TICK_INTERVAL);
        if let Some(event) = coordinator.tick() {
            break event;
        }
        write!(
            stdout,
            "\r  {} remaining ",
            format_clock(coordinator.timer().remaining_seconds())
        )?;
        stdout.flush()?;
    };
    println!("\r  Done. {} of stillness.   ", format_duration(u64::from(event.duration)));

    let stdin = io::stdin();
    let reflection = gather_reflection(&mut stdin.lock(), &mut stdout, args)?;

    match finish(&mut coordinator, reflection)? {
        Some(record) => {
            println!("Saved session {}.", short_id(record.id));
            let today = app.store.statistics().sessions_today;
            match remaining_for_goal(today, settings.daily_goal) {
                0 => println!("Daily goal reached ({today}/{}).", settings.daily_goal),
                n => println!("{n} more to reach today's goal."),
            }
        }
        None => println!("Session not saved."),
    }

    Ok(())
}

/// Seconds requested on the command line, or the configured default.
fn requested_seconds(minutes: Option<u32>, seconds: Option<u32>, default: u32) -> u32 {
    match (seconds, minutes) {
        (Some(s), _) => s,
        (None, Some(m)) => m.saturating_mul(60),
        (None, None) => default,
    }
}

fn build_coordinator(
    app: &App,
    args: &SitArgs,
    ambience: &Ambience,
) -> Result<SessionCoordinator> {
    let timer_config = &app.config.timer;
    let bounds = if args.custom {
        timer_config.custom_bounds()
    } else {
        timer_config.bounds()
    };
    let requested = requested_seconds(args.minutes, args.seconds, timer_config.default_seconds);
    if requested == 0 {
        return Err(Error::Validation("duration must be positive".to_string()));
    }

    let timer = TimerEngine::new(app.store.clock().clone(), timer_config.mode(), bounds, requested);
    if timer.total_seconds() != requested {
        println!(
            "Adjusted to {} (allowed {} to {}).",
            format_duration(u64::from(timer.total_seconds())),
            format_duration(u64::from(bounds.min)),
            format_duration(u64::from(bounds.max)),
        );
    }

    Ok(SessionCoordinator::new(app.store.clone(), timer).with_ambience(ambience.clone()))
}

/// Store the pending completion, or drop it when the user gave no answer.
fn finish(
    coordinator: &mut SessionCoordinator,
    reflection: Option<CompletionInput>,
) -> Result<Option<SessionRecord>> {
    match reflection {
        Some(input) => coordinator.complete(input).map(Some),
        None => {
            coordinator.abandon();
            Ok(None)
        }
    }
}

fn check_mood_flag(what: &str, mood: Option<u8>) -> Result<()> {
    match mood {
        Some(m) if !MOOD_RANGE.contains(&m) => Err(Error::Validation(format!(
            "{what} must be between {} and {}",
            MOOD_RANGE.start(),
            MOOD_RANGE.end()
        ))),
        _ => Ok(()),
    }
}

/// Collect moods and notes, prompting for whatever was not given as a flag.
///
/// Returns `None` if the user leaves a mood empty or input ends.
fn gather_reflection<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    args: &SitArgs,
) -> Result<Option<CompletionInput>> {
    let prompted = args.mood_before.is_none() || args.mood_after.is_none();

    let Some(mood_before) = mood_or_prompt(input, out, "Mood before", args.mood_before)? else {
        return Ok(None);
    };
    let Some(mood_after) = mood_or_prompt(input, out, "Mood after", args.mood_after)? else {
        return Ok(None);
    };

    let notes = match &args.notes {
        Some(n) => Some(n.clone()),
        None if prompted => prompt_line(input, out, "Notes (optional): ")?,
        None => None,
    };

    Ok(Some(CompletionInput {
        mood_before,
        mood_after,
        notes,
        title: args.title.clone(),
    }))
}

fn mood_or_prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    given: Option<u8>,
) -> Result<Option<u8>> {
    if given.is_some() {
        return Ok(given);
    }

    let prompt = format!(
        "{label} ({}-{}, empty to discard): ",
        MOOD_RANGE.start(),
        MOOD_RANGE.end()
    );
    loop {
        let Some(answer) = prompt_line(input, out, &prompt)? else {
            return Ok(None);
        };
        match answer.parse::<u8>() {
            Ok(m) if MOOD_RANGE.contains(&m) => return Ok(Some(m)),
            _ => writeln!(
                out,
                "Please enter a number from {} to {}.",
                MOOD_RANGE.start(),
                MOOD_RANGE.end()
            )?,
        }
    }
}

/// Print `prompt` and read one trimmed line; `None` when empty or at EOF.
fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

/// `MM:SS`, or `H:MM:SS` past an hour.
fn format_clock(seconds: u32) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::test_app;
    use std::io::Cursor;

    fn reflect(stdin: &str, args: &SitArgs) -> (Option<CompletionInput>, String) {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = gather_reflection(&mut input, &mut out, args).unwrap();
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn requested_seconds_precedence() {
        assert_eq!(requested_seconds(None, None, 60), 60);
        assert_eq!(requested_seconds(Some(5), None, 60), 300);
        assert_eq!(requested_seconds(Some(5), Some(90), 60), 90);
        assert_eq!(requested_seconds(Some(u32::MAX), None, 60), u32::MAX);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(272), "04:32");
        assert_eq!(format_clock(3605), "1:00:05");
    }

    #[test]
    fn reflection_from_prompts() {
        let (input, out) = reflect("2\n4\nsoft rain\n", &SitArgs::default());
        let input = input.unwrap();
        assert_eq!((input.mood_before, input.mood_after), (2, 4));
        assert_eq!(input.notes.as_deref(), Some("soft rain"));
        assert!(out.contains("Mood before (1-5"));
    }

    #[test]
    fn reflection_reprompts_out_of_range() {
        let (input, out) = reflect("9\nx\n3\n3\n\n", &SitArgs::default());
        let input = input.unwrap();
        assert_eq!(input.mood_before, 3);
        assert_eq!(input.notes, None);
        assert_eq!(out.matches("Please enter a number").count(), 2);
    }

    #[test]
    fn empty_answer_discards() {
        assert!(reflect("\n", &SitArgs::default()).0.is_none());
        assert!(reflect("3\n\n", &SitArgs::default()).0.is_none());
        assert!(reflect("", &SitArgs::default()).0.is_none());
    }

    #[test]
    fn flags_skip_prompts() {
        let args = SitArgs {
            mood_before: Some(1),
            mood_after: Some(5),
            title: Some("Evening".to_string()),
            ..SitArgs::default()
        };
        let (input, out) = reflect("", &args);
        let input = input.unwrap();
        assert_eq!((input.mood_before, input.mood_after), (1, 5));
        assert_eq!(input.title.as_deref(), Some("Evening"));
        assert!(out.is_empty());
    }

    #[test]
    fn mood_flags_are_checked() {
        assert!(check_mood_flag("mood before", Some(3)).is_ok());
        assert!(check_mood_flag("mood before", None).is_ok());
        assert!(matches!(check_mood_flag("mood after", Some(0)), Err(Error::Validation(_))));
        assert!(matches!(check_mood_flag("mood after", Some(6)), Err(Error::Validation(_))));
    }

    #[test]
    fn coordinator_uses_configured_bounds() {
        let (app, _clock, _temp) = test_app();

        let args = SitArgs {
            seconds: Some(45),
            ..SitArgs::default()
        };
        let c = build_coordinator(&app, &args, &Default::default()).unwrap();
        assert_eq!(c.timer().total_seconds(), 60);

        let custom = SitArgs {
            seconds: Some(45),
            custom: true,
            ..SitArgs::default()
        };
        let c = build_coordinator(&app, &custom, &Default::default()).unwrap();
        assert_eq!(c.timer().total_seconds(), 45);

        let zero = SitArgs {
            seconds: Some(0),
            ..SitArgs::default()
        };
        assert!(build_coordinator(&app, &zero, &Default::default()).is_err());
    }

    #[test]
    fn finished_sitting_is_stored_or_discarded() {
        let (app, clock, _temp) = test_app();
        let args = SitArgs {
            minutes: Some(1),
            ..SitArgs::default()
        };

        let mut c = build_coordinator(&app, &args, &Default::default()).unwrap();
        c.start();
        clock.advance_secs(60);
        let event = c.tick().unwrap();
        assert_eq!(event.duration, 60);

        let record = finish(&mut c, Some(CompletionInput::new(2, 4))).unwrap().unwrap();
        assert_eq!(record.fields.duration, 60);
        assert_eq!(app.store.len(), 1);

        let mut c = build_coordinator(&app, &args, &Default::default()).unwrap();
        c.start();
        clock.advance_secs(60);
        c.tick().unwrap();
        assert!(finish(&mut c, None).unwrap().is_none());
        assert!(c.pending().is_none());
        assert_eq!(app.store.len(), 1);
    }
}

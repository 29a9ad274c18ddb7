//! `hush options` command implementation.

use crate::core::catalog::{BACKGROUND_IMAGE, BACKGROUND_MUSIC, OptionSet, SESSION_TYPES};
use crate::core::timer::DurationBounds;
use crate::core::stats::format_duration;
use crate::error::Result;

/// Run the options command.
///
/// Lists the keys accepted by `settings`, `sit --type` and `log --type`.
///
/// # Errors
///
/// Infallible; returns `Result` like the other commands.
pub fn run(bounds: DurationBounds, custom: DurationBounds) -> Result<()> {
    print!("{}", render(bounds, custom));
    Ok(())
}

fn render(bounds: DurationBounds, custom: DurationBounds) -> String {
    let mut out = String::new();
    section(&mut out, "Background music", &BACKGROUND_MUSIC);
    section(&mut out, "Background images", &BACKGROUND_IMAGE);
    section(&mut out, "Session types", &SESSION_TYPES);
    out.push_str(&format!(
        "Durations\n  preset  {} to {}\n  custom  {} to {}\n",
        format_duration(u64::from(bounds.min)),
        format_duration(u64::from(bounds.max)),
        format_duration(u64::from(custom.min)),
        format_duration(u64::from(custom.max)),
    ));
    out
}

fn section(out: &mut String, heading: &str, set: &OptionSet) {
    out.push_str(heading);
    out.push('\n');
    for (key, label) in set.entries() {
        let marker = if *key == set.default_key() { " (default)" } else { "" };
        out.push_str(&format!("  {key:<12} {label}{marker}\n"));
    }
    out.push('\n');
}

//! `hush stats` command implementation.

use crate::cli::App;
use crate::core::Statistics;
use crate::core::stats::{format_duration, remaining_for_goal};
use crate::error::Result;
use serde::Serialize;

/// Width of the daily progress bar, in cells.
const BAR_WIDTH: usize = 20;

/// Statistics plus the goal they are measured against.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    stats: Statistics,
    daily_goal: u32,
    daily_progress: f64,
}

/// Run the stats command.
///
/// # Errors
///
/// Returns an error if settings cannot be read or JSON output fails.
pub fn run(app: &App, json: bool) -> Result<()> {
    let stats = app.store.statistics();
    let goal = app.settings.load()?.daily_goal;

    if json {
        let report = Report {
            daily_progress: stats.daily_progress(goal),
            daily_goal: goal,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render(&stats, goal));
    Ok(())
}

fn render(stats: &Statistics, goal: u32) -> String {
    let mut out = String::new();
    let progress = stats.daily_progress(goal);

    out.push_str(&format!(
        "Today       {} {}/{goal}",
        progress_bar(progress),
        stats.sessions_today
    ));
    match remaining_for_goal(stats.sessions_today, goal) {
        0 => out.push_str("  goal reached\n"),
        n => out.push_str(&format!("  {n} to go\n")),
    }

    out.push_str(&format!("This week   {}\n", stats.sessions_this_week));
    out.push_str(&format!("Sessions    {}\n", stats.total_sessions));
    out.push_str(&format!("Total time  {}\n", format_duration(stats.total_duration)));

    if stats.total_sessions > 0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let average = stats.average_session_duration.round() as u64;
        out.push_str(&format!("Average     {}\n", format_duration(average)));
        out.push_str(&format!(
            "Mood        {:+.1} per session\n",
            stats.average_mood_improvement
        ));
    }

    out
}

fn progress_bar(progress: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

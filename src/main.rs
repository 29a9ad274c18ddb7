//! hush CLI - bit-sized meditation timer.

use clap::{Parser, Subcommand};
use hush::cli::{self, App};
use hush::cli::edit::EditArgs;
use hush::cli::log::LogArgs;
use hush::cli::settings::SettingsAction;
use hush::cli::sit::SitArgs;
use hush::config::load_config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hush")]
#[command(author, version, about = "Bit-sized meditation timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sit for a countdown, then record how it went.
    Sit {
        /// Length in minutes. Defaults to the configured duration.
        #[arg(short, long)]
        minutes: Option<u32>,

        /// Length in seconds. Overrides --minutes.
        #[arg(short, long, conflicts_with = "minutes")]
        seconds: Option<u32>,

        /// Allow the wider custom duration range.
        #[arg(long)]
        custom: bool,

        /// Session type key (see `hush options`).
        #[arg(short = 't', long = "type")]
        session_type: Option<String>,

        /// Title for the record.
        #[arg(long)]
        title: Option<String>,

        /// Mood before (1-5). Prompted if omitted.
        #[arg(long)]
        mood_before: Option<u8>,

        /// Mood after (1-5). Prompted if omitted.
        #[arg(long)]
        mood_after: Option<u8>,

        /// Notes for the record.
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Record a session that already happened.
    Log {
        /// Length in seconds.
        #[arg(short, long)]
        duration: u32,

        /// Mood before (1-5).
        #[arg(long)]
        mood_before: u8,

        /// Mood after (1-5).
        #[arg(long)]
        mood_after: u8,

        /// Title for the record.
        #[arg(long)]
        title: Option<String>,

        /// Session type key.
        #[arg(short = 't', long = "type")]
        session_type: Option<String>,

        /// Notes for the record.
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List recent sessions.
    List {
        /// Maximum number of sessions to show. Defaults to 20.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show totals, averages and today's progress.
    Stats {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a recorded session.
    Edit {
        /// Session ID or unique prefix.
        id: String,

        /// New title. Empty restores the default.
        #[arg(long)]
        title: Option<String>,

        /// New length in seconds.
        #[arg(short, long)]
        duration: Option<u32>,

        /// New mood before (1-5).
        #[arg(long)]
        mood_before: Option<u8>,

        /// New mood after (1-5).
        #[arg(long)]
        mood_after: Option<u8>,

        /// New notes.
        #[arg(short, long)]
        notes: Option<String>,

        /// Remove the notes.
        #[arg(long)]
        clear_notes: bool,

        /// New session type key.
        #[arg(short = 't', long = "type")]
        session_type: Option<String>,
    },

    /// Delete one session.
    Delete {
        /// Session ID or unique prefix.
        id: String,
    },

    /// Delete every session.
    Clear {
        /// Confirm removal.
        #[arg(long)]
        yes: bool,
    },

    /// Show or change preferences.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommand>,
    },

    /// List available sounds, images, session types and durations.
    Options,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current preferences.
    Show,
    /// Set sessions per day to aim for.
    Goal {
        /// At least 1.
        goal: u32,
    },
    /// Select the ambient sound.
    Music {
        /// Option key, e.g. "rain".
        key: String,
    },
    /// Select the backdrop.
    Image {
        /// Option key, e.g. "forest".
        key: String,
    },
    /// Allow or stop exporting sessions to a health platform.
    Health {
        /// "true" or "false".
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Mark first-run setup as done.
    Onboarded,
}

impl From<SettingsCommand> for SettingsAction {
    fn from(command: SettingsCommand) -> Self {
        match command {
            SettingsCommand::Show => Self::Show,
            SettingsCommand::Goal { goal } => Self::Goal(goal),
            SettingsCommand::Music { key } => Self::Music(key),
            SettingsCommand::Image { key } => Self::Image(key),
            SettingsCommand::Health { enabled } => Self::Health(enabled),
            SettingsCommand::Onboarded => Self::Onboarded,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hush: error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> hush::Result<()> {
    let app = App::open(load_config()?)?;

    match command {
        Commands::Sit {
            minutes,
            seconds,
            custom,
            session_type,
            title,
            mood_before,
            mood_after,
            notes,
        } => cli::sit::run(
            &app,
            &SitArgs {
                minutes,
                seconds,
                custom,
                session_type,
                title,
                mood_before,
                mood_after,
                notes,
            },
        ),
        Commands::Log {
            duration,
            mood_before,
            mood_after,
            title,
            session_type,
            notes,
        } => cli::log::run(
            &app,
            &LogArgs {
                duration,
                mood_before,
                mood_after,
                title,
                session_type,
                notes,
            },
        ),
        Commands::List { limit } => cli::list::run(&app, limit),
        Commands::Stats { json } => cli::stats::run(&app, json),
        Commands::Edit {
            id,
            title,
            duration,
            mood_before,
            mood_after,
            notes,
            clear_notes,
            session_type,
        } => cli::edit::run(
            &app,
            &EditArgs {
                id,
                title,
                duration,
                mood_before,
                mood_after,
                notes,
                clear_notes,
                session_type,
            },
        ),
        Commands::Delete { id } => cli::delete::run(&app, &id),
        Commands::Clear { yes } => cli::clear::run(&app, yes),
        Commands::Settings { action } => {
            let action = action.map_or(SettingsAction::Show, SettingsAction::from);
            cli::settings::run(&app, &action)
        }
        Commands::Options => {
            cli::options::run(app.config.timer.bounds(), app.config.timer.custom_bounds())
        }
    }
}

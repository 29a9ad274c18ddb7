//! `hush settings` command implementation.

use crate::cli::App;
use crate::core::catalog::{BACKGROUND_IMAGE, BACKGROUND_MUSIC};
use crate::error::Result;
use crate::settings::Settings;

/// What to do with the stored preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print current values.
    Show,
    /// Set the daily goal.
    Goal(u32),
    /// Select an ambient sound.
    Music(String),
    /// Select a backdrop.
    Image(String),
    /// Record health-platform permission.
    Health(bool),
    /// Mark first-run setup as done.
    Onboarded,
}

/// Run the settings command.
///
/// # Errors
///
/// Returns `Error::Validation` for a zero goal or unknown option key, or an
/// error if the settings file cannot be read or written.
pub fn run(app: &App, action: &SettingsAction) -> Result<()> {
    let settings = apply(app, action)?;
    print!("{}", render(&settings));
    Ok(())
}

fn apply(app: &App, action: &SettingsAction) -> Result<Settings> {
    match action {
        SettingsAction::Show => app.settings.load(),
        SettingsAction::Goal(goal) => app.settings.update(|s| s.set_daily_goal(*goal)),
        SettingsAction::Music(key) => app.settings.update(|s| s.set_background_music(key)),
        SettingsAction::Image(key) => app.settings.update(|s| s.set_background_image(key)),
        SettingsAction::Health(on) => app.settings.update(|s| {
            s.health_authorized = *on;
            Ok(())
        }),
        SettingsAction::Onboarded => app.settings.update(|s| {
            s.has_completed_onboarding = true;
            Ok(())
        }),
    }
}

fn render(settings: &Settings) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    format!(
        "Daily goal        {}\n\
         Background music  {} ({})\n\
         Background image  {} ({})\n\
         Health export     {}\n\
         Onboarding done   {}\n",
        settings.daily_goal,
        BACKGROUND_MUSIC.label(&settings.background_music),
        settings.background_music,
        BACKGROUND_IMAGE.label(&settings.background_image),
        settings.background_image,
        yes_no(settings.health_authorized),
        yes_no(settings.has_completed_onboarding),
    )
}

//! `hush clear` command implementation.

use crate::cli::App;
use crate::error::{Error, Result};

/// Run the clear command.
///
/// Removes every session. Settings are kept.
///
/// # Errors
///
/// Returns `Error::Validation` without `--yes`, or a storage error.
pub fn run(app: &App, yes: bool) -> Result<()> {
    if !yes {
        return Err(Error::Validation(
            "this removes every session; pass --yes to confirm".to_string(),
        ));
    }

    let removed = app.store.clear_all()?;
    if removed == 0 {
        println!("No sessions to clear.");
    } else {
        println!("Cleared {removed} session(s).");
    }
    Ok(())
}

//! `hush delete` command implementation.

use crate::cli::{App, resolve_id, short_id};
use crate::error::Result;

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if the id does not resolve or the store cannot be
/// written.
pub fn run(app: &App, id: &str) -> Result<()> {
    let id = resolve_id(&app.store, id)?;
    let removed = app.store.delete(id)?;
    println!(
        "Deleted session {} ({}).",
        short_id(removed.id),
        removed.fields.title
    );
    Ok(())
}

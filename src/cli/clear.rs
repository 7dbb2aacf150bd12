use anyhow::{bail, Result};

use super::ui::{confirm, is_interactive};
use crate::store::{NoteStore, Slot};

/// Execute the clear command
pub fn run_clear<S: Slot>(store: &mut NoteStore<S>, force: bool) -> Result<()> {
    if !force {
        if !is_interactive() {
            bail!("Refusing to clear without confirmation. Pass --force.");
        }
        let prompt = format!("Clear all {} notes? This cannot be undone.", store.len());
        if !confirm(&prompt)? {
            return Ok(());
        }
    }

    store.clear_all()?;
    println!("Cleared.");
    Ok(())
}

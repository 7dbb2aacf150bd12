use anyhow::{bail, Result};

use super::display::swatch;
use super::ui::{confirm, find_note, first_line, is_interactive, truncate};
use crate::store::{NoteStore, Slot};

/// Execute the rm command
pub fn run_delete<S: Slot>(store: &mut NoteStore<S>, identifier: &str, force: bool) -> Result<()> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        bail!("Identifier cannot be empty.");
    }

    let Some(id) = find_note(store, identifier)? else {
        println!("No matches.");
        return Ok(());
    };

    if !force {
        if !is_interactive() {
            bail!("Refusing to delete without confirmation. Pass --force.");
        }
        let Some(note) = store.get(&id) else {
            return Ok(());
        };
        println!("{} {}", swatch(note.color), note.title);
        let preview = first_line(&note.content);
        if !preview.is_empty() {
            println!("  {}", truncate(preview, 60));
        }
        println!();

        if !confirm("Delete this note?")? {
            return Ok(());
        }
    }

    store.remove(&id)?;
    println!("Deleted.");
    Ok(())
}

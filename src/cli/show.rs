use anyhow::Result;

use super::display::print_note;
use super::ui::find_note;
use crate::store::{NoteStore, Slot};

/// Execute the show command
pub fn run_show<S: Slot>(store: &NoteStore<S>, identifier: &str) -> Result<()> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        println!("No identifier.");
        return Ok(());
    }

    match find_note(store, identifier)?.and_then(|id| store.get(&id)) {
        Some(note) => print_note(note),
        None => println!("No matches."),
    }
    Ok(())
}

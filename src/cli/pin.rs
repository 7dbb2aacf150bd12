use anyhow::Result;

use super::ui::find_note;
use crate::store::{NoteStore, Slot};

/// Execute the pin command: flip the pinned flag
pub fn run_pin<S: Slot>(store: &mut NoteStore<S>, identifier: &str) -> Result<()> {
    let Some(id) = find_note(store, identifier)? else {
        println!("No matches.");
        return Ok(());
    };

    store.toggle_pin(&id)?;
    let pinned = store.get(&id).map_or(false, |n| n.pinned);
    println!("{}", if pinned { "Pinned." } else { "Unpinned." });
    Ok(())
}

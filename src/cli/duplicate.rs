use anyhow::Result;

use super::ui::{find_note, short_id};
use crate::store::{NoteStore, Slot};

/// Execute the dup command
pub fn run_duplicate<S: Slot>(store: &mut NoteStore<S>, identifier: &str) -> Result<()> {
    let Some(id) = find_note(store, identifier)? else {
        println!("No matches.");
        return Ok(());
    };

    store.duplicate(&id)?;
    if let Some(copy) = store.notes().first() {
        println!("Duplicated. {}", short_id(&copy.id));
    }
    Ok(())
}

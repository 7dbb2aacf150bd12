use anyhow::Result;
use std::io::{self, Write};

use super::display::note_row;
use super::ui::term_size;
use crate::store::{NoteStore, Slot};
use crate::view::{project, NoteList, ViewQuery};

/// Execute the list command
pub fn run_list<S: Slot>(store: &NoteStore<S>, query: &ViewQuery, json: bool) -> Result<()> {
    let list = project(store.notes(), query);
    let mut stdout = io::stdout().lock();

    if json {
        let records: Vec<_> = list
            .entries
            .iter()
            .map(|n| n.record(store.timestamp_format()))
            .collect();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&records)?)?;
        return Ok(());
    }

    let (width, _) = term_size();
    write_list(&mut stdout, &list, query, width)?;
    Ok(())
}

/// Write the list rows, or the appropriate empty-state message
pub fn write_list<W: Write>(out: &mut W, list: &NoteList<'_>, query: &ViewQuery, width: usize) -> Result<()> {
    if list.is_empty() {
        writeln!(out, "{}", empty_message(list, query))?;
        return Ok(());
    }

    for note in &list.entries {
        writeln!(out, "{}", note_row(note, false, width))?;
    }
    Ok(())
}

pub fn empty_message(list: &NoteList<'_>, query: &ViewQuery) -> &'static str {
    if list.store_empty {
        "No notes yet. Add one with `notecmd add`."
    } else if query.is_filtered() {
        "No notes match."
    } else {
        "No notes."
    }
}

use anyhow::{bail, Result};

use super::ui::{color_input, find_note, is_interactive, text_input};
use crate::models::{Note, NoteColor, NotePatch};
use crate::store::{NoteStore, Slot};

/// Execute the edit command
pub fn run_edit<S: Slot>(
    store: &mut NoteStore<S>,
    identifier: &str,
    title: Option<String>,
    body: Option<String>,
    color: Option<NoteColor>,
) -> Result<()> {
    let Some(id) = find_note(store, identifier)? else {
        println!("No matches.");
        return Ok(());
    };

    let patch = NotePatch {
        title,
        content: body,
        color,
        pinned: None,
    };

    let patch = if !patch.is_empty() {
        patch
    } else if is_interactive() {
        let Some(note) = store.get(&id) else {
            return Ok(());
        };
        match prompt_edit(note)? {
            Some(patch) => patch,
            None => return Ok(()),
        }
    } else {
        bail!("Nothing to change. Pass --title, --body or --color.");
    };

    store.update(&id, patch)?;
    println!("Saved.");
    Ok(())
}

/// Edit form pre-filled with the note's current values.
/// Only fields that actually changed end up in the patch.
pub fn prompt_edit(note: &Note) -> Result<Option<NotePatch>> {
    let Some(title) = text_input("title:", &note.title)? else {
        return Ok(None);
    };
    let Some(body) = text_input("body:", &note.content)? else {
        return Ok(None);
    };
    let Some(color) = color_input(note.color)? else {
        return Ok(None);
    };

    Ok(Some(diff_patch(note, title, body, color)))
}

fn diff_patch(note: &Note, title: String, body: String, color: NoteColor) -> NotePatch {
    NotePatch {
        title: (title != note.title).then_some(title),
        content: (body != note.content).then_some(body),
        color: (color != note.color).then_some(color),
        pinned: None,
    }
}

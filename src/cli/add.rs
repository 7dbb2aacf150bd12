use anyhow::Result;

use super::ui::{color_input, is_interactive, short_id, text_input};
use crate::models::NoteColor;
use crate::store::{NoteStore, Slot};

/// Title, body and color typed into the new-note form
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub color: NoteColor,
}

/// Execute the add command
pub fn run_add<S: Slot>(
    store: &mut NoteStore<S>,
    title: Option<String>,
    body: Option<String>,
    color: Option<NoteColor>,
) -> Result<()> {
    let (title, body, color) = if title.is_none() && body.is_none() && is_interactive() {
        match prompt_new_note(color.unwrap_or(store.default_color()))? {
            Some(form) => (form.title, form.body, Some(form.color)),
            None => return Ok(()),
        }
    } else {
        (title.unwrap_or_default(), body.unwrap_or_default(), color)
    };

    if title.trim().is_empty() && body.trim().is_empty() {
        println!("Nothing to save.");
        return Ok(());
    }

    store.add(&title, &body, color)?;
    if let Some(note) = store.notes().first() {
        println!("Saved. {}", short_id(&note.id));
    }

    Ok(())
}

/// Ask for a new note's fields. None if any prompt was cancelled.
pub fn prompt_new_note(color: NoteColor) -> Result<Option<NewNote>> {
    let Some(title) = text_input("title:", "")? else {
        return Ok(None);
    };
    let Some(body) = text_input("body:", "")? else {
        return Ok(None);
    };
    let Some(color) = color_input(color)? else {
        return Ok(None);
    };

    Ok(Some(NewNote { title, body, color }))
}

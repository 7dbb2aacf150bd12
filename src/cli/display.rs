use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use crossterm::style::{Color, Stylize};

use super::ui::{first_line, selection_prefix, short_id, truncate};
use crate::models::{Note, NoteColor};

/// Colored dot for a note's palette entry
pub fn swatch(color: NoteColor) -> String {
    let (r, g, b) = color.rgb();
    "●".with(Color::Rgb { r, g, b }).to_string()
}

/// One row of the note list: marker, swatch, title, preview, updated time, pin badge
pub fn note_row(note: &Note, selected: bool, width: usize) -> String {
    let when = format_updated(&note.updated_at);
    let badge = if note.pinned { " • Pinned" } else { "" };

    // prefix(2) + swatch(2) + spacing
    let budget = width.saturating_sub(6 + when.chars().count() + badge.chars().count());
    let title_width = budget.min(32).max(8);
    let title = truncate(&note.title, title_width);

    let preview_width = budget.saturating_sub(title.chars().count() + 3);
    let preview = first_line(&note.content);
    let preview = if preview.is_empty() || preview_width < 8 {
        String::new()
    } else {
        format!(" - {}", truncate(preview, preview_width))
    };

    format!(
        "{}{} {}{}  {}{}",
        selection_prefix(selected),
        swatch(note.color),
        title,
        preview,
        when,
        badge
    )
}

/// Print a full note with clean formatting
pub fn print_note(note: &Note) {
    let badge = if note.pinned { "  • Pinned" } else { "" };
    println!("{} {}{}\n", swatch(note.color), note.title, badge);

    if !note.content.is_empty() {
        for line in note.content.lines() {
            println!("  {}", line);
        }
        println!();
    }

    println!("  {} · {}", note.color, short_id(&note.id));
    println!("  updated {}", format_updated(&note.updated_at));
    println!("  created {}", format_updated(&note.created_at));
}

/// Format a note timestamp for display in local time
pub fn format_updated(at: &DateTime<Utc>) -> String {
    format_relative(&at.with_timezone(&Local), &Local::now())
}

/// "Today at 3:04pm", "Yesterday at 9:15am", "Mar 4 at 10:00am", "Mar 4, 2023"
pub fn format_relative(at: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let today = now.date_naive();
    let day = at.date_naive();
    let (pm, hour) = at.hour12();
    let time = format!("{}:{:02}{}", hour, at.minute(), if pm { "pm" } else { "am" });

    if day == today {
        format!("Today at {}", time)
    } else if Some(day) == today.pred_opt() {
        format!("Yesterday at {}", time)
    } else if day.year() == today.year() {
        format!("{} at {}", at.format("%b %-d"), time)
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}

//! Shared UI primitives for notecmd
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `title: `
//! - Navigation hints: keys in brackets: `[p]in`, `[↑/↓]`
//! - Feedback: single word when possible: `Saved.`

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, InquireError, Select, Text};
use std::io::{self, IsTerminal, Write};

use crate::models::Note;
use crate::store::{NoteStore, Slot, StoreError};
use crate::view::{self, FilterMode, ViewQuery};

// ============================================================================
// Status Bar Builder
// ============================================================================

/// Maximum actions a status bar can hold (stack-allocated)
const MAX_STATUS_ACTIONS: usize = 12;

/// Builder for consistent status bar formatting.
///
/// Example output: "3/12  [n]ew [p]in [q]uit"
pub struct StatusBar<'a> {
    counter: Option<(usize, usize)>,
    actions: [Option<(&'a str, &'a str)>; MAX_STATUS_ACTIONS],
    action_count: usize,
}

impl<'a> StatusBar<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            counter: None,
            actions: [None; MAX_STATUS_ACTIONS],
            action_count: 0,
        }
    }

    /// Add a counter (current/total)
    #[inline]
    pub fn counter(mut self, current: usize, total: usize) -> Self {
        self.counter = Some((current, total));
        self
    }

    /// Add an action hint (key, label).
    /// `.action("p", "in")` produces `[p]in`
    #[inline]
    pub fn action(mut self, key: &'a str, label: &'a str) -> Self {
        if self.action_count < MAX_STATUS_ACTIONS {
            self.actions[self.action_count] = Some((key, label));
            self.action_count += 1;
        }
        self
    }

    /// Add a visual separator (" | ")
    #[inline]
    pub fn separator(self) -> Self {
        self.action("|", "")
    }

    /// Render on one line, or on two when the terminal is too narrow
    pub fn render(&self) -> String {
        let (width, _) = term_size();
        let counter = self.counter.map(|(c, t)| counter(c, t)).unwrap_or_default();
        let actions = self.render_actions();

        let one_line = match (counter.is_empty(), actions.is_empty()) {
            (true, _) => actions.clone(),
            (false, true) => counter.clone(),
            (false, false) => format!("{} {}", counter, actions),
        };

        if one_line.chars().count() > width.saturating_sub(5) && !counter.is_empty() {
            format!("{}\n{}", counter, actions)
        } else {
            one_line
        }
    }

    fn render_actions(&self) -> String {
        let mut result = String::with_capacity(self.action_count * 12);
        for (key, label) in self.actions[..self.action_count].iter().flatten() {
            if *key == "|" {
                result.push_str(" |");
                continue;
            }
            if !result.is_empty() {
                result.push(' ');
            }
            result.push('[');
            result.push_str(key);
            result.push(']');
            result.push_str(label);
        }
        result
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Layout Primitives
// ============================================================================

/// Return selection prefix for list items
#[inline]
pub fn selection_prefix(selected: bool) -> &'static str {
    if selected { "> " } else { "  " }
}

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", kept.trim_end())
}

/// First line of a note body, for one-line previews
pub fn first_line(s: &str) -> &str {
    s.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

/// Format a counter string (e.g., "12/345")
#[inline]
pub fn counter(current: usize, total: usize) -> String {
    format!("{}/{}", current, total)
}

// ============================================================================
// Message Functions
// ============================================================================

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// User-facing text for a failed save; memory already holds the change
pub fn persistence_warning(err: &StoreError) -> Option<String> {
    match err {
        StoreError::Persistence(e) => Some(format!(
            "change applied but not saved ({}); it will be lost on exit",
            e
        )),
        _ => None,
    }
}

// ============================================================================
// Terminal
// ============================================================================

/// RAII guard that ensures raw mode is disabled on drop
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Clear the terminal screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Get terminal dimensions, defaulting to 80x24 if unavailable
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Number of list rows that fit between the header and the status bar
pub fn visible_lines() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(6).max(5)
}

/// Display help for the browse screen and wait for a key
pub fn show_help() -> Result<()> {
    clear_screen()?;

    println!(
        r#"
NAVIGATION

  j / ↓         Move down
  k / ↑         Move up
  g / G         Jump to first / last
  Enter         Show full note

NOTES

  n             New note
  e             Edit title, body and color
  p             Pin / unpin
  y             Duplicate
  d             Delete (with confirmation)

VIEW

  f             Cycle filter: all, pinned, unpinned
  /             Search (Enter keeps it, Esc clears it)

EXIT

  q / Esc       Quit
  ?             This help screen
"#
    );
    println!("\nPress any key to return...");

    let _guard = RawModeGuard::new()?;
    loop {
        if let Event::Key(_) = event::read()? {
            break;
        }
    }
    Ok(())
}

// ============================================================================
// Prompts
// ============================================================================

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Prompt for yes/no confirmation (default: no)
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt_skippable()?;
    Ok(result.unwrap_or(false))
}

/// Prompt for text, pre-filled with `initial`. None if cancelled.
pub fn text_input(prompt: &str, initial: &str) -> Result<Option<String>> {
    let result = Text::new(prompt)
        .with_render_config(minimal_render_config())
        .with_initial_value(initial)
        .prompt();

    match result {
        Ok(input) => Ok(Some(input)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Pick a palette color, starting on `current`. None if cancelled.
pub fn color_input(current: crate::models::NoteColor) -> Result<Option<crate::models::NoteColor>> {
    use crate::models::NoteColor;

    let start = NoteColor::ALL.iter().position(|c| *c == current).unwrap_or(0);
    let result = Select::new("color:", NoteColor::ALL.to_vec())
        .with_render_config(minimal_render_config())
        .with_starting_cursor(start)
        .with_vim_mode(true)
        .prompt_skippable()?;
    Ok(result)
}

// ============================================================================
// Note Lookup Helpers
// ============================================================================

/// Shortest id prefix accepted as an identifier
pub const MIN_ID_PREFIX: usize = 4;

/// Notes an identifier may refer to: an exact id, else notes whose id starts
/// with it, else notes whose title or content contain it (display order).
pub fn match_notes<'a>(notes: &'a [Note], identifier: &str) -> Vec<&'a Note> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Vec::new();
    }

    if let Some(exact) = notes.iter().find(|n| n.id == identifier) {
        return vec![exact];
    }

    if identifier.chars().count() >= MIN_ID_PREFIX {
        let by_prefix: Vec<&Note> = notes.iter().filter(|n| n.id.starts_with(identifier)).collect();
        if !by_prefix.is_empty() {
            return by_prefix;
        }
    }

    view::project(notes, &ViewQuery::new(FilterMode::All, identifier)).entries
}

/// One line describing a note in selection menus
pub fn note_choice_label(note: &Note) -> String {
    let pin = if note.pinned { "* " } else { "" };
    let preview = first_line(&note.content);
    if preview.is_empty() {
        format!("{}{} ({})", pin, truncate(&note.title, 40), short_id(&note.id))
    } else {
        format!(
            "{}{}: {} ({})",
            pin,
            truncate(&note.title, 30),
            truncate(preview, 30),
            short_id(&note.id)
        )
    }
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Resolve an identifier to a note id, prompting when several notes match.
/// Returns None if nothing matches or the selection was cancelled.
pub fn find_note<S: Slot>(store: &NoteStore<S>, identifier: &str) -> Result<Option<String>> {
    let matches = match_notes(store.notes(), identifier);

    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].id.clone())),
        _ if !is_interactive() => Err(anyhow::anyhow!(
            "'{}' matches {} notes; use an id instead",
            identifier.trim(),
            matches.len()
        )),
        _ => {
            let options: Vec<String> = matches.iter().map(|n| note_choice_label(n)).collect();
            let result = Select::new("Select:", options.clone())
                .with_render_config(minimal_render_config())
                .with_page_size(visible_lines())
                .with_vim_mode(true)
                .prompt_skippable()?;

            Ok(result.and_then(|selected| {
                options
                    .iter()
                    .position(|o| *o == selected)
                    .map(|idx| matches[idx].id.clone())
            }))
        }
    }
}

//! Interactive note browser
//!
//! A raw-mode list over the store's projection. The selection follows the
//! note id across re-sorts, search text is debounced before it narrows the
//! list, and a failed save is shown on the message line instead of ending
//! the session.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::io::{self, Write};
use std::time::Instant;

use super::add::prompt_new_note;
use super::debounce::Debouncer;
use super::display::{note_row, print_note};
use super::edit::prompt_edit;
use super::list::empty_message;
use super::ui::{
    clear_screen, confirm, persistence_warning, short_id, show_help, term_size, truncate,
    visible_lines, RawModeGuard, StatusBar,
};
use crate::config::NotesConfig;
use crate::store::{NoteStore, Slot, StoreError};
use crate::view::{project, FilterMode, NoteList, ViewQuery};

/// Selection, query and in-progress search text of the browse screen
#[derive(Debug, Default)]
struct BrowseState {
    query: ViewQuery,
    selected_idx: usize,
    selected_id: Option<String>,
    /// Text typed after `/`; Some while the search line has focus
    search_input: Option<String>,
    message: Option<String>,
}

impl BrowseState {
    /// Re-anchor the selection on the previously selected note if it is
    /// still listed, otherwise clamp the index into range
    fn sync_selection(&mut self, list: &NoteList<'_>) {
        if list.is_empty() {
            self.selected_idx = 0;
            self.selected_id = None;
            return;
        }
        if let Some(idx) = self.selected_id.as_deref().and_then(|id| list.position(id)) {
            self.selected_idx = idx;
        } else if self.selected_idx >= list.len() {
            self.selected_idx = list.len() - 1;
        }
        self.selected_id = Some(list.entries[self.selected_idx].id.clone());
    }

    fn move_to(&mut self, idx: usize, list: &NoteList<'_>) {
        if let Some(note) = list.entries.get(idx) {
            self.selected_idx = idx;
            self.selected_id = Some(note.id.clone());
        }
    }

    fn select_id(&mut self, id: Option<String>) {
        if id.is_some() {
            self.selected_id = id;
        }
    }

    /// Handle a key while the search line has focus. Returns false when the
    /// key does not belong to search editing.
    fn search_key(&mut self, code: KeyCode, now: Instant, debouncer: &mut Debouncer<String>) -> bool {
        let Some(input) = self.search_input.as_mut() else {
            return false;
        };
        match code {
            KeyCode::Char(c) => {
                input.push(c);
                debouncer.push(input.clone(), now);
            }
            KeyCode::Backspace => {
                input.pop();
                debouncer.push(input.clone(), now);
            }
            KeyCode::Enter => {
                if let Some(search) = debouncer.flush() {
                    self.query.search = search;
                }
                self.search_input = None;
            }
            KeyCode::Esc => {
                debouncer.cancel();
                self.query.search.clear();
                self.search_input = None;
            }
            _ => {}
        }
        true
    }

    /// Record the outcome of a store mutation. Save failures become the
    /// message line; any other error ends the session.
    fn record(&mut self, result: Result<(), StoreError>, done: &str) -> Result<()> {
        match result {
            Ok(()) => {
                self.message = Some(done.to_string());
                Ok(())
            }
            Err(e) => match persistence_warning(&e) {
                Some(warning) => {
                    log::warn!("{}", e);
                    self.message = Some(warning);
                    Ok(())
                }
                None => Err(e.into()),
            },
        }
    }
}

/// What the screen last showed. Wakeups that change neither the store
/// revision nor the query, and handled no key, skip the redraw.
#[derive(Debug, Default)]
struct Screen {
    drawn: Option<(u64, ViewQuery)>,
    stale: bool,
}

impl Screen {
    fn needs_redraw(&self, revision: u64, query: &ViewQuery) -> bool {
        self.stale || self.drawn.as_ref() != Some(&(revision, query.clone()))
    }

    fn mark_drawn(&mut self, revision: u64, query: &ViewQuery) {
        self.drawn = Some((revision, query.clone()));
        self.stale = false;
    }

    fn invalidate(&mut self) {
        self.stale = true;
    }
}

/// Execute the browse command
pub fn run_browse<S: Slot>(store: &mut NoteStore<S>, config: &NotesConfig) -> Result<()> {
    let mut state = BrowseState::default();
    let mut debouncer: Debouncer<String> = Debouncer::new(config.search_debounce());
    let mut screen = Screen::default();

    loop {
        if let Some(search) = debouncer.poll(Instant::now()) {
            state.query.search = search;
        }

        if screen.needs_redraw(store.revision(), &state.query) {
            let list = project(store.notes(), &state.query);
            state.sync_selection(&list);
            render(&list, &state, store.len())?;
            screen.mark_drawn(store.revision(), &state.query);
        }

        // Block until a key arrives, or until pending search text is due
        let key = {
            let _guard = RawModeGuard::new()?;
            if let Some(wait) = debouncer.time_left(Instant::now()) {
                if !event::poll(wait)? {
                    continue;
                }
            }
            match event::read()? {
                Event::Key(KeyEvent { code, modifiers, .. }) => {
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }
                    code
                }
                Event::Resize(..) => {
                    screen.invalidate();
                    continue;
                }
                _ => continue,
            }
        };

        screen.invalidate();
        if state.search_key(key, Instant::now(), &mut debouncer) {
            continue;
        }

        let list = project(store.notes(), &state.query);
        state.sync_selection(&list);

        state.message = None;
        let current = state.selected_id.clone();
        let len = list.len();

        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                if key == KeyCode::Esc && state.query.is_filtered() {
                    state.query = ViewQuery::default();
                } else {
                    return Ok(());
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let idx = state.selected_idx.saturating_sub(1);
                state.move_to(idx, &list);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 && state.selected_idx < len - 1 {
                    let idx = state.selected_idx + 1;
                    state.move_to(idx, &list);
                }
            }
            KeyCode::Char('g') => state.move_to(0, &list),
            KeyCode::Char('G') => state.move_to(len.saturating_sub(1), &list),
            KeyCode::Enter => {
                if let Some(note) = current.as_deref().and_then(|id| store.get(id)) {
                    clear_screen()?;
                    print_note(note);
                    wait_for_key()?;
                }
            }
            KeyCode::Char('n') => {
                clear_screen()?;
                if let Some(form) = prompt_new_note(store.default_color())? {
                    if form.title.trim().is_empty() && form.body.trim().is_empty() {
                        state.message = Some("Nothing to save.".into());
                    } else {
                        let result = store.add(&form.title, &form.body, Some(form.color));
                        state.select_id(store.notes().first().map(|n| n.id.clone()));
                        state.record(result, "Saved.")?;
                    }
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = current {
                    clear_screen()?;
                    let patch = match store.get(&id) {
                        Some(note) => prompt_edit(note)?,
                        None => None,
                    };
                    if let Some(patch) = patch.filter(|p| !p.is_empty()) {
                        let result = store.update(&id, patch);
                        state.record(result, "Saved.")?;
                    }
                }
            }
            KeyCode::Char('p') => {
                if let Some(id) = current {
                    let pinned = store.get(&id).map_or(false, |n| n.pinned);
                    let result = store.toggle_pin(&id);
                    state.record(result, if pinned { "Unpinned." } else { "Pinned." })?;
                }
            }
            KeyCode::Char('y') => {
                if let Some(id) = current {
                    let result = store.duplicate(&id);
                    state.select_id(store.notes().first().map(|n| n.id.clone()));
                    state.record(result, "Duplicated.")?;
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = current {
                    let title = store.get(&id).map(|n| n.title.clone()).unwrap_or_default();
                    clear_screen()?;
                    if confirm(&format!("Delete \"{}\"?", title))? {
                        let result = store.remove(&id);
                        state.record(result, "Deleted.")?;
                    }
                }
            }
            KeyCode::Char('f') => {
                state.query.filter = state.query.filter.next();
            }
            KeyCode::Char('/') => {
                state.search_input = Some(state.query.search.clone());
            }
            KeyCode::Char('?') => {
                show_help()?;
            }
            _ => {}
        }
    }
}

fn render(list: &NoteList<'_>, state: &BrowseState, total: usize) -> Result<()> {
    clear_screen()?;
    let mut stdout = io::stdout();
    let (width, _) = term_size();

    writeln!(stdout, "{}\r\n\r", header(&state.query, total))?;

    if list.is_empty() {
        writeln!(stdout, "  {}\r", empty_message(list, &state.query))?;
    } else {
        let rows = visible_lines();
        let start = state.selected_idx.saturating_sub(rows.saturating_sub(1));
        for (i, note) in list.entries.iter().enumerate().skip(start).take(rows) {
            writeln!(stdout, "{}\r", note_row(note, i == state.selected_idx, width))?;
        }
    }

    writeln!(stdout, "\r")?;
    if let Some(ref message) = state.message {
        writeln!(stdout, "{}\r", message)?;
    }

    if let Some(ref input) = state.search_input {
        write!(stdout, "/{}", input)?;
    } else {
        let current = if list.is_empty() { 0 } else { state.selected_idx + 1 };
        let mut bar = StatusBar::new()
            .counter(current, list.len())
            .action("n", "ew")
            .action("e", "dit")
            .action("p", "in")
            .action("y", "dup")
            .action("d", "el")
            .separator()
            .action("f", state.query.filter.next().as_str())
            .action("/", "search")
            .action("?", "")
            .action("q", "uit");
        if let Some(ref id) = state.selected_id {
            bar = bar.separator().action(short_id(id), "");
        }
        write!(stdout, "{}", bar.render())?;
    }
    stdout.flush()?;
    Ok(())
}

/// Title line: note count plus the active filter and search, if any
fn header(query: &ViewQuery, total: usize) -> String {
    let mut header = format!("NOTES ({})", total);
    if query.filter != FilterMode::All {
        header.push_str(&format!("  [{}]", query.filter.as_str()));
    }
    if !query.search.is_empty() {
        header.push_str(&format!("  \"{}\"", truncate(&query.search, 24)));
    }
    header
}

fn wait_for_key() -> Result<()> {
    println!("\nPress any key to return...");
    let _guard = RawModeGuard::new()?;
    loop {
        if let Event::Key(_) = event::read()? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemorySlot, StoreOptions};
    use std::time::Duration;

    fn store_with(titles: &[&str]) -> NoteStore<MemorySlot> {
        let mut store = NoteStore::load(MemorySlot::new(), StoreOptions::default());
        for title in titles {
            store.add(title, "", None).unwrap();
        }
        store
    }

    #[test]
    fn test_redraw_only_on_revision_or_query_change() {
        let mut store = store_with(&["a"]);
        let mut screen = Screen::default();
        let mut query = ViewQuery::default();
        assert!(screen.needs_redraw(store.revision(), &query));

        screen.mark_drawn(store.revision(), &query);
        assert!(!screen.needs_redraw(store.revision(), &query));

        let id = store.notes()[0].id.clone();
        store.toggle_pin(&id).unwrap();
        assert!(screen.needs_redraw(store.revision(), &query));
        screen.mark_drawn(store.revision(), &query);

        store.toggle_pin("missing").unwrap();
        assert!(!screen.needs_redraw(store.revision(), &query));

        query.search = "a".into();
        assert!(screen.needs_redraw(store.revision(), &query));
        screen.mark_drawn(store.revision(), &query);

        screen.invalidate();
        assert!(screen.needs_redraw(store.revision(), &query));
    }

    #[test]
    fn test_header_shows_active_filter_and_search() {
        assert_eq!(header(&ViewQuery::default(), 3), "NOTES (3)");
        assert_eq!(
            header(&ViewQuery::new(FilterMode::Pinned, "milk"), 3),
            "NOTES (3)  [pinned]  \"milk\""
        );
        assert_eq!(header(&ViewQuery::new(FilterMode::Unpinned, ""), 0), "NOTES (0)  [unpinned]");
    }

    #[test]
    fn test_selection_follows_note_after_pin() {
        let mut store = store_with(&["first", "second", "third"]);
        let mut state = BrowseState::default();

        let list = project(store.notes(), &state.query);
        state.sync_selection(&list);
        state.move_to(2, &list);
        let id = state.selected_id.clone().unwrap();
        assert_eq!(store.get(&id).unwrap().title, "first");

        store.toggle_pin(&id).unwrap();
        let list = project(store.notes(), &state.query);
        state.sync_selection(&list);
        assert_eq!(state.selected_idx, 0);
        assert_eq!(state.selected_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_selection_clamps_when_note_leaves_list() {
        let mut store = store_with(&["a", "b"]);
        let mut state = BrowseState::default();

        let list = project(store.notes(), &state.query);
        state.sync_selection(&list);
        state.move_to(1, &list);
        let id = state.selected_id.clone().unwrap();

        store.remove(&id).unwrap();
        let list = project(store.notes(), &state.query);
        state.sync_selection(&list);
        assert_eq!(state.selected_idx, 0);
        assert_eq!(state.selected_id.as_deref(), Some(store.notes()[0].id.as_str()));
    }

    #[test]
    fn test_selection_empty_list() {
        let store = store_with(&["a"]);
        let mut state = BrowseState::default();
        state.query.filter = FilterMode::Pinned;

        let list = project(store.notes(), &state.query);
        state.sync_selection(&list);
        assert_eq!(state.selected_id, None);
        assert_eq!(state.selected_idx, 0);
    }

    #[test]
    fn test_search_typing_is_debounced() {
        let mut state = BrowseState::default();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        let start = Instant::now();
        state.search_input = Some(String::new());

        assert!(state.search_key(KeyCode::Char('m'), start, &mut debouncer));
        assert!(state.search_key(KeyCode::Char('i'), start + Duration::from_millis(50), &mut debouncer));
        assert_eq!(state.query.search, "");
        assert_eq!(debouncer.poll(start + Duration::from_millis(120)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(200)).as_deref(), Some("mi"));
    }

    #[test]
    fn test_search_enter_applies_immediately() {
        let mut state = BrowseState::default();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        let now = Instant::now();
        state.search_input = Some(String::new());

        state.search_key(KeyCode::Char('x'), now, &mut debouncer);
        state.search_key(KeyCode::Enter, now, &mut debouncer);
        assert_eq!(state.query.search, "x");
        assert!(state.search_input.is_none());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_search_escape_clears() {
        let mut state = BrowseState::default();
        state.query.search = "old".into();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        state.search_input = Some("old".into());

        state.search_key(KeyCode::Backspace, Instant::now(), &mut debouncer);
        state.search_key(KeyCode::Esc, Instant::now(), &mut debouncer);
        assert_eq!(state.query.search, "");
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_keys_ignored_outside_search() {
        let mut state = BrowseState::default();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        assert!(!state.search_key(KeyCode::Char('q'), Instant::now(), &mut debouncer));
    }

    #[test]
    fn test_record_turns_save_failure_into_message() {
        let mut store = store_with(&["a"]);
        let id = store.notes()[0].id.clone();
        store.slot_mut().set_fail_writes(true);

        let mut state = BrowseState::default();
        let result = store.toggle_pin(&id);
        state.record(result, "Pinned.").unwrap();
        assert!(state.message.unwrap().contains("not saved"));
        assert!(store.get(&id).unwrap().pinned);
    }
}

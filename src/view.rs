//! Display ordering for notes
//!
//! `project` turns the store's collection plus the current filter and search
//! text into the ordered list a rendering surface draws. It keeps no state and
//! is cheap enough to call after every change.

use clap::ValueEnum;

use crate::models::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterMode {
    #[default]
    All,
    Pinned,
    Unpinned,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pinned => "pinned",
            Self::Unpinned => "unpinned",
        }
    }

    /// Next mode in the all → pinned → unpinned cycle
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Pinned,
            Self::Pinned => Self::Unpinned,
            Self::Unpinned => Self::All,
        }
    }

    pub fn admits(&self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::Pinned => note.pinned,
            Self::Unpinned => !note.pinned,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter: FilterMode,
    pub search: String,
}

impl ViewQuery {
    pub fn new(filter: FilterMode, search: impl Into<String>) -> Self {
        Self {
            filter,
            search: search.into(),
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.filter != FilterMode::All || !self.search.trim().is_empty()
    }
}

/// Ordered notes to display
#[derive(Debug, Clone)]
pub struct NoteList<'a> {
    pub entries: Vec<&'a Note>,
    /// The store itself has no notes, as opposed to everything being filtered out
    pub store_empty: bool,
}

impl NoteList<'_> {
    /// Nothing to show, whether because the store is empty or the query excludes everything
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|n| n.id == id)
    }
}

/// Filter then sort pinned-first, most recently updated first within each group
pub fn project<'a>(notes: &'a [Note], query: &ViewQuery) -> NoteList<'a> {
    let needle = query.search.trim().to_lowercase();

    let mut entries: Vec<&Note> = notes
        .iter()
        .filter(|n| query.filter.admits(n) && n.matches_lowercase(&needle))
        .collect();

    // Stable, so equal keys keep collection order
    entries.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });

    NoteList {
        entries,
        store_empty: notes.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteColor;
    use chrono::{Duration, TimeZone, Utc};

    fn note(id: &str, title: &str, content: &str, pinned: bool, minutes: i64) -> Note {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut n = Note::new(id.into(), title, content, NoteColor::default(), base);
        n.pinned = pinned;
        n.updated_at = base + Duration::minutes(minutes);
        n
    }

    fn ids<'a>(list: &NoteList<'a>) -> Vec<&'a str> {
        list.entries.iter().map(|n| n.id.as_str()).collect()
    }

    fn sample() -> Vec<Note> {
        vec![
            note("old-pinned", "Recipes", "Pancakes and waffles", true, 1),
            note("new", "Shopping", "eggs, FLOUR", false, 30),
            note("older", "Ideas", "a CLI for notes", false, 5),
            note("new-pinned", "Todo", "call Sam", true, 10),
        ]
    }

    #[test]
    fn test_pinned_first_then_recent() {
        let notes = sample();
        let list = project(&notes, &ViewQuery::default());
        assert_eq!(ids(&list), vec!["new-pinned", "old-pinned", "new", "older"]);
    }

    #[test]
    fn test_pinned_before_unpinned_regardless_of_time() {
        let notes = sample();
        let list = project(&notes, &ViewQuery::default());
        let first_unpinned = list.entries.iter().position(|n| !n.pinned).unwrap();
        assert!(list.entries[..first_unpinned].iter().all(|n| n.pinned));
        assert!(list.entries[first_unpinned..].iter().all(|n| !n.pinned));
    }

    #[test]
    fn test_equal_keys_keep_collection_order() {
        let notes = vec![
            note("a", "A", "", false, 3),
            note("b", "B", "", false, 3),
            note("c", "C", "", false, 3),
        ];
        let list = project(&notes, &ViewQuery::default());
        assert_eq!(ids(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_filter_modes() {
        let notes = sample();
        let pinned = project(&notes, &ViewQuery::new(FilterMode::Pinned, ""));
        assert_eq!(ids(&pinned), vec!["new-pinned", "old-pinned"]);

        let unpinned = project(&notes, &ViewQuery::new(FilterMode::Unpinned, ""));
        assert_eq!(ids(&unpinned), vec!["new", "older"]);
    }

    #[test]
    fn test_search_case_insensitive_title_or_content() {
        let notes = sample();
        for q in ["flour", "FLOUR", "Flour", "  fLoUr "] {
            let list = project(&notes, &ViewQuery::new(FilterMode::All, q));
            assert_eq!(ids(&list), vec!["new"], "query {:?}", q);
        }

        let list = project(&notes, &ViewQuery::new(FilterMode::All, "recipes"));
        assert_eq!(ids(&list), vec!["old-pinned"]);

        let list = project(&notes, &ViewQuery::new(FilterMode::All, "zebra"));
        assert!(list.is_empty());
        assert!(!list.store_empty);
    }

    #[test]
    fn test_search_combines_with_filter() {
        let notes = sample();
        let list = project(&notes, &ViewQuery::new(FilterMode::Pinned, "cli"));
        assert!(list.is_empty());

        let list = project(&notes, &ViewQuery::new(FilterMode::Unpinned, "cli"));
        assert_eq!(ids(&list), vec!["older"]);
    }

    #[test]
    fn test_empty_store() {
        let list = project(&[], &ViewQuery::default());
        assert!(list.is_empty());
        assert!(list.store_empty);
    }

    #[test]
    fn test_filter_cycle_and_is_filtered() {
        assert_eq!(FilterMode::All.next(), FilterMode::Pinned);
        assert_eq!(FilterMode::Pinned.next(), FilterMode::Unpinned);
        assert_eq!(FilterMode::Unpinned.next(), FilterMode::All);

        assert!(!ViewQuery::default().is_filtered());
        assert!(ViewQuery::new(FilterMode::All, "x").is_filtered());
        assert!(ViewQuery::new(FilterMode::Pinned, " ").is_filtered());
    }

    #[test]
    fn test_clear_all_leaves_empty_view() {
        use crate::store::{MemorySlot, NoteStore, StoreOptions};

        let mut store = NoteStore::load(MemorySlot::new(), StoreOptions::default());
        store.add("one", "", None).unwrap();
        store.add("two", "", None).unwrap();
        store.clear_all().unwrap();

        let list = project(store.notes(), &ViewQuery::default());
        assert!(list.is_empty());
        assert!(list.store_empty);
    }
}

//! Note collection ownership and persistence
//!
//! `NoteStore` is the only thing that mutates notes. Every mutating operation
//! rewrites the whole collection to its slot before returning. Operations on
//! an unknown id are no-ops and leave the slot untouched.

use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;
use thiserror::Error;

mod ids;
mod import;
mod slot;
#[cfg(test)]
pub(crate) mod testing;

pub use ids::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use import::ImportSummary;
pub use slot::{DbSlot, MemorySlot, Slot, SlotError};

use crate::models::{Note, NoteColor, NotePatch, TimestampFormat};

/// Default file name for exported collections
pub const EXPORT_FILENAME: &str = "notes-export.json";

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed import payload; nothing was changed
    #[error("invalid import: {0}")]
    Validation(String),

    /// The slot write failed after memory was already updated
    #[error("could not save notes: {0}")]
    Persistence(#[from] SlotError),

    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Settings the store needs beyond its collaborators
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub default_color: NoteColor,
    /// Encoding for a slot that has no notes to copy the encoding from
    pub timestamp_format: TimestampFormat,
}

pub struct NoteStore<S: Slot, G: IdGenerator = UuidGenerator, C: Clock = SystemClock> {
    slot: S,
    ids: G,
    clock: C,
    notes: Vec<Note>,
    options: StoreOptions,
    format: TimestampFormat,
    revision: u64,
}

impl<S: Slot> NoteStore<S> {
    /// Load with UUID ids and the system clock
    pub fn load(slot: S, options: StoreOptions) -> Self {
        Self::load_with(slot, UuidGenerator, SystemClock, options)
    }
}

impl<S: Slot, G: IdGenerator, C: Clock> NoteStore<S, G, C> {
    /// Load the persisted collection. Absent or corrupt data yields an empty
    /// store; this never fails.
    pub fn load_with(slot: S, ids: G, clock: C, options: StoreOptions) -> Self {
        let raw = match slot.read() {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("could not read notes, starting empty: {}", e);
                None
            }
        };
        let now = clock.now().trunc_subsecs(3);
        let (notes, format) = decode_collection(raw.as_deref(), &options, now);
        log::debug!("loaded {} notes ({} timestamps)", notes.len(), format.as_str());

        Self {
            slot,
            ids,
            clock,
            notes,
            options,
            format,
            revision: 0,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Incremented by every applied mutation; views redraw when it changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.format
    }

    pub fn default_color(&self) -> NoteColor {
        self.options.default_color
    }

    /// Options matching this store, for building a scratch copy of it
    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            default_color: self.options.default_color,
            timestamp_format: self.format,
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    // ==================== MUTATIONS ====================

    pub fn add(&mut self, title: &str, content: &str, color: Option<NoteColor>) -> Result<(), StoreError> {
        let id = self.fresh_id(None);
        let color = color.unwrap_or(self.options.default_color);
        let note = Note::new(id, title, content, color, self.now());
        self.notes.insert(0, note);
        self.persist()
    }

    /// Merge `patch` into the note. `updated_at` is refreshed even when the
    /// patch changes nothing.
    pub fn update(&mut self, id: &str, patch: NotePatch) -> Result<(), StoreError> {
        let now = self.now();
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(());
        };
        patch.apply(note);
        note.touch(now);
        self.persist()
    }

    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Copy title, content and color into a new unpinned note at the front
    pub fn duplicate(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(source) = self.get(id) else {
            return Ok(());
        };
        let (title, content, color) = (source.title.clone(), source.content.clone(), source.color);

        let now = self.now();
        let copy = Note {
            id: self.fresh_id(None),
            title,
            content,
            color,
            pinned: false,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(0, copy);
        self.persist()
    }

    pub fn toggle_pin(&mut self, id: &str) -> Result<(), StoreError> {
        let now = self.now();
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(());
        };
        note.pinned = !note.pinned;
        note.touch(now);
        self.persist()
    }

    /// Prepend the notes of an external collection.
    ///
    /// The payload must be an array; records are validated up front and
    /// blank ones are dropped. Ids are kept unless missing or already taken.
    pub fn import_merge(&mut self, payload: &Value) -> Result<ImportSummary, StoreError> {
        let parsed = import::parse_payload(payload)?;
        let mut summary = ImportSummary {
            skipped: parsed.skipped,
            ..Default::default()
        };

        let mut taken: HashSet<String> = self.notes.iter().map(|n| n.id.clone()).collect();
        let now = self.now();
        let mut incoming = Vec::with_capacity(parsed.candidates.len() + self.notes.len());

        for candidate in parsed.candidates {
            let id = match candidate.id {
                Some(id) if !taken.contains(&id) => id,
                original => {
                    if let Some(ref original) = original {
                        log::info!("imported note id {} already in use, assigning a new one", original);
                    }
                    summary.reassigned_ids += 1;
                    self.fresh_id(Some(&taken))
                }
            };
            taken.insert(id.clone());

            let mut note = Note::new(
                id,
                &candidate.title,
                "",
                candidate.color.unwrap_or(self.options.default_color),
                candidate.created_at.unwrap_or(now),
            );
            note.content = candidate.content;
            note.pinned = candidate.pinned;
            note.updated_at = candidate.updated_at.unwrap_or(now);
            incoming.push(note);
        }

        summary.imported = incoming.len();
        incoming.append(&mut self.notes);
        self.notes = incoming;
        log::info!(
            "imported {} notes ({} skipped, {} new ids)",
            summary.imported,
            summary.skipped,
            summary.reassigned_ids
        );

        self.persist()?;
        Ok(summary)
    }

    /// Parse `text` as JSON and merge it. Unparsable text is a validation
    /// error and changes nothing.
    pub fn import_str(&mut self, text: &str) -> Result<ImportSummary, StoreError> {
        let payload: Value = serde_json::from_str(text)
            .map_err(|e| StoreError::Validation(format!("not valid JSON: {}", e)))?;
        self.import_merge(&payload)
    }

    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.notes.clear();
        self.persist()
    }

    // ==================== SERIALIZATION ====================

    /// Pretty-printed collection for export files
    pub fn export_json(&self) -> Result<String, StoreError> {
        let records: Vec<_> = self.notes.iter().map(|n| n.record(self.format)).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.revision += 1;
        let records: Vec<_> = self.notes.iter().map(|n| n.record(self.format)).collect();
        let json = serde_json::to_string(&records)?;
        self.slot.write(&json)?;
        log::debug!("saved {} notes ({} bytes)", self.notes.len(), json.len());
        Ok(())
    }

    /// Clock reading at the precision timestamps are stored with, so memory
    /// and the slot always agree
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    /// Generate an id that no note (and nothing in `extra`) already uses
    fn fresh_id(&mut self, extra: Option<&HashSet<String>>) -> String {
        loop {
            let id = self.ids.generate();
            let in_store = self.notes.iter().any(|n| n.id == id);
            let in_extra = extra.map_or(false, |set| set.contains(&id));
            if !in_store && !in_extra {
                return id;
            }
            log::debug!("generated id {} collides, retrying", id);
        }
    }
}

/// Decode a stored collection, falling back to empty on any corruption.
/// Sparse records are defaulted; only records without an id, or repeating
/// an earlier id, are dropped.
fn decode_collection(
    raw: Option<&str>,
    options: &StoreOptions,
    now: DateTime<Utc>,
) -> (Vec<Note>, TimestampFormat) {
    let fallback = options.timestamp_format;
    let Some(raw) = raw else {
        return (Vec::new(), fallback);
    };

    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            log::warn!("stored notes are not a list, starting empty");
            return (Vec::new(), fallback);
        }
        Err(e) => {
            log::warn!("stored notes are unreadable ({}), starting empty", e);
            return (Vec::new(), fallback);
        }
    };

    let format = records
        .iter()
        .find_map(|r| r.get("updatedAt").and_then(TimestampFormat::detect))
        .unwrap_or(fallback);

    let mut seen = HashSet::new();
    let notes = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match Note::from_stored(&record, options.default_color, now) {
            Ok(note) if seen.insert(note.id.clone()) => Some(note),
            Ok(note) => {
                log::warn!("dropping stored note #{} with duplicate id {}", idx + 1, note.id);
                None
            }
            Err(e) => {
                log::warn!("dropping stored note #{}: {}", idx + 1, e);
                None
            }
        })
        .collect();

    (notes, format)
}

//! Durable storage slots
//!
//! A slot is a single named location holding one whole serialized value.
//! `NoteStore` reads it once at startup and rewrites it after every mutation.

use thiserror::Error;

use crate::db::Database;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("storage write rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

pub trait Slot {
    /// Current value, or `None` if nothing was ever written
    fn read(&self) -> Result<Option<String>, SlotError>;

    /// Replace the whole value
    fn write(&mut self, value: &str) -> Result<(), SlotError>;
}

/// Slot backed by a row of the `slots` table
pub struct DbSlot<'a> {
    db: &'a Database,
    key: String,
}

impl<'a> DbSlot<'a> {
    pub fn new(db: &'a Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Slot for DbSlot<'_> {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.db.get_slot(&self.key)?)
    }

    fn write(&mut self, value: &str) -> Result<(), SlotError> {
        self.db.set_slot(&self.key, value)?;
        Ok(())
    }
}

/// In-process slot, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make subsequent writes fail, as a full disk or quota would
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<(), SlotError> {
        if self.fail_writes {
            return Err(SlotError::Rejected("quota exceeded".to_string()));
        }
        self.value = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot_fail_writes() {
        let mut slot = MemorySlot::with_value("[]");
        slot.set_fail_writes(true);
        assert!(matches!(slot.write("[1]"), Err(SlotError::Rejected(_))));
        assert_eq!(slot.value(), Some("[]"));
        assert_eq!(slot.writes(), 0);

        slot.set_fail_writes(false);
        slot.write("[1]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[1]"));
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn test_db_slot_round_trip() {
        let db = Database::open_memory().unwrap();
        let mut slot = DbSlot::new(&db, "colorful-notes:v1");
        assert_eq!(slot.read().unwrap(), None);

        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
        assert_eq!(db.get_slot(slot.key()).unwrap().as_deref(), Some("[]"));
    }
}

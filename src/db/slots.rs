use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::Database;

impl Database {
    // ==================== SLOTS ====================
    // Each slot holds one whole serialized value under a named key.

    pub fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?, ?, ?)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

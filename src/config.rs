//! Configuration management
//!
//! Settings come from environment variables first, then the `app_settings`
//! table, then built-in defaults.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::db::Database;
use crate::models::{NoteColor, TimestampFormat};
use crate::store::StoreOptions;

// Settings keys for database storage
pub const SETTING_STORAGE_KEY: &str = "storage_key";
pub const SETTING_DEFAULT_COLOR: &str = "default_color";
pub const SETTING_TIMESTAMP_FORMAT: &str = "timestamp_format";
pub const SETTING_SEARCH_DEBOUNCE_MS: &str = "search_debounce_ms";

pub const SETTING_KEYS: &[&str] = &[
    SETTING_STORAGE_KEY,
    SETTING_DEFAULT_COLOR,
    SETTING_TIMESTAMP_FORMAT,
    SETTING_SEARCH_DEBOUNCE_MS,
];

// Environment variable names
pub const ENV_DB: &str = "NOTECMD_DB";
const ENV_STORAGE_KEY: &str = "NOTECMD_STORAGE_KEY";
const ENV_DEFAULT_COLOR: &str = "NOTECMD_DEFAULT_COLOR";
const ENV_TIMESTAMP_FORMAT: &str = "NOTECMD_TIMESTAMPS";
const ENV_SEARCH_DEBOUNCE_MS: &str = "NOTECMD_SEARCH_DEBOUNCE_MS";

pub const DEFAULT_STORAGE_KEY: &str = "colorful-notes:v1";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, PartialEq)]
pub struct NotesConfig {
    pub storage_key: String,
    pub default_color: NoteColor,
    pub timestamp_format: TimestampFormat,
    pub search_debounce_ms: u64,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_color: NoteColor::default(),
            timestamp_format: TimestampFormat::default(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl NotesConfig {
    /// Load configuration from environment variables and database settings.
    /// Environment variables take precedence over database settings.
    pub fn load(db: &Database) -> Result<Self> {
        Self::load_from(db, |name| env::var(name).ok())
    }

    fn load_from(db: &Database, env_var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |env_name: &str, key: &str| -> Result<Option<String>> {
            match env_var(env_name).filter(|v| !v.trim().is_empty()) {
                Some(v) => Ok(Some(v)),
                None => db.get_setting(key),
            }
        };

        let mut config = Self::default();

        if let Some(key) = lookup(ENV_STORAGE_KEY, SETTING_STORAGE_KEY)? {
            config.storage_key = key;
        }

        if let Some(color) = lookup(ENV_DEFAULT_COLOR, SETTING_DEFAULT_COLOR)? {
            match NoteColor::parse(&color) {
                Some(c) => config.default_color = c,
                None => log::warn!("ignoring unknown default color '{}'", color),
            }
        }

        if let Some(format) = lookup(ENV_TIMESTAMP_FORMAT, SETTING_TIMESTAMP_FORMAT)? {
            match TimestampFormat::parse(&format) {
                Some(f) => config.timestamp_format = f,
                None => log::warn!("ignoring unknown timestamp format '{}'", format),
            }
        }

        if let Some(ms) = lookup(ENV_SEARCH_DEBOUNCE_MS, SETTING_SEARCH_DEBOUNCE_MS)? {
            match ms.trim().parse::<u64>() {
                Ok(ms) => config.search_debounce_ms = ms,
                Err(_) => log::warn!("ignoring invalid search debounce '{}'", ms),
            }
        }

        Ok(config)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            default_color: self.default_color,
            timestamp_format: self.timestamp_format,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Effective value of a setting, as shown by `config show`
    pub fn value_of(&self, key: &str) -> Option<String> {
        match key {
            SETTING_STORAGE_KEY => Some(self.storage_key.clone()),
            SETTING_DEFAULT_COLOR => Some(self.default_color.to_string()),
            SETTING_TIMESTAMP_FORMAT => Some(self.timestamp_format.as_str().to_string()),
            SETTING_SEARCH_DEBOUNCE_MS => Some(self.search_debounce_ms.to_string()),
            _ => None,
        }
    }
}

/// Validate and store a setting. Returns the normalized value that was saved.
pub fn save_setting(db: &Database, key: &str, value: &str) -> Result<String> {
    let normalized = match key {
        SETTING_STORAGE_KEY => {
            let v = value.trim();
            if v.is_empty() {
                return Err(anyhow!("storage_key cannot be empty"));
            }
            v.to_string()
        }
        SETTING_DEFAULT_COLOR => value
            .parse::<NoteColor>()
            .map_err(|e| anyhow!(e))?
            .to_string(),
        SETTING_TIMESTAMP_FORMAT => TimestampFormat::parse(value)
            .ok_or_else(|| anyhow!("timestamp_format must be 'iso' or 'millis'"))?
            .as_str()
            .to_string(),
        SETTING_SEARCH_DEBOUNCE_MS => value
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow!("search_debounce_ms must be a whole number of milliseconds"))?
            .to_string(),
        other => return Err(unknown_key(other)),
    };

    db.set_setting(key, &normalized)?;
    Ok(normalized)
}

/// Remove a stored setting. Returns true if one was present.
pub fn clear_setting(db: &Database, key: &str) -> Result<bool> {
    if !SETTING_KEYS.contains(&key) {
        return Err(unknown_key(key));
    }
    db.delete_setting(key)
}

/// Database path: explicit flag, then NOTECMD_DB, then the default location
pub fn database_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match env::var(ENV_DB) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Database::default_path(),
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!("unknown setting '{}' (expected one of: {})", key, SETTING_KEYS.join(", "))
}

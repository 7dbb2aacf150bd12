use anyhow::Result;

use super::ConfigAction;
use crate::config::{clear_setting, save_setting, NotesConfig, SETTING_KEYS};
use crate::db::Database;

/// Execute the config command
pub fn run_config(db: &Database, config: &NotesConfig, action: Option<ConfigAction>) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            for line in settings_lines(db, config)? {
                println!("{}", line);
            }
        }
        ConfigAction::Set { key, value } => {
            let saved = save_setting(db, &key, &value)?;
            println!("{} = {}", key, saved);
        }
        ConfigAction::Unset { key } => {
            if clear_setting(db, &key)? {
                println!("Removed {}.", key);
            } else {
                println!("{} was not set.", key);
            }
        }
    }
    Ok(())
}

/// One line per setting: effective value, marked when it is only a default
/// or an environment override
fn settings_lines(db: &Database, config: &NotesConfig) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(SETTING_KEYS.len());
    for key in SETTING_KEYS {
        let value = config.value_of(key).unwrap_or_default();
        let stored = db.get_setting(key)?;
        let source = match stored {
            Some(ref s) if *s == value => "",
            Some(_) => "  (env)",
            None if value == config_default(key) => "  (default)",
            None => "  (env)",
        };
        lines.push(format!("{:<20} {}{}", key, value, source));
    }
    Ok(lines)
}

fn config_default(key: &str) -> String {
    NotesConfig::default().value_of(key).unwrap_or_default()
}

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::store::{NoteStore, Slot, EXPORT_FILENAME};

/// Execute the export command. `-` writes to stdout.
pub fn run_export<S: Slot>(store: &NoteStore<S>, path: Option<&str>) -> Result<()> {
    let json = store.export_json()?;

    if path == Some("-") {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", json)?;
        return Ok(());
    }

    let path = path.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(EXPORT_FILENAME));
    write_export(&path, &json)?;
    println!("Exported {} notes to {}", store.len(), path.display());
    Ok(())
}

fn write_export(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, format!("{}\n", json))
        .with_context(|| format!("Failed to write {}", path.display()))
}

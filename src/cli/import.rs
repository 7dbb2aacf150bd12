use anyhow::{bail, Context, Result};
use rfd::FileDialog;
use std::io::{self, Read};
use std::path::Path;

use super::ui::is_interactive;
use crate::store::{ImportSummary, MemorySlot, NoteStore, Slot};

/// Opens a native file picker dialog to select a JSON export.
/// Returns `None` if the user cancels the dialog.
pub fn pick_json_file() -> Option<String> {
    FileDialog::new()
        .add_filter("JSON files", &["json"])
        .set_title("Select notes export to import")
        .pick_file()
        .map(|p| p.to_string_lossy().to_string())
}

/// Execute the import command. `-` reads from stdin; no path opens a picker.
pub fn run_import<S: Slot>(store: &mut NoteStore<S>, path: Option<&str>, dry_run: bool) -> Result<()> {
    let text = match path {
        Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        }
        Some(path) => read_file(Path::new(path))?,
        None => {
            if !is_interactive() {
                bail!("No file given. Pass a path, or - for stdin.");
            }
            match pick_json_file() {
                Some(path) => read_file(Path::new(&path))?,
                None => {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let summary = import_text(store, &text, dry_run)?;
    let prefix = if dry_run { "Would import" } else { "Imported" };
    println!("{}", summary_line(prefix, &summary));
    Ok(())
}

/// Merge `text` into the store, or into a scratch copy when `dry_run` is set
pub fn import_text<S: Slot>(store: &mut NoteStore<S>, text: &str, dry_run: bool) -> Result<ImportSummary> {
    if dry_run {
        let mut preview = NoteStore::load(MemorySlot::with_value(store.export_json()?), store.options());
        return Ok(preview.import_str(text)?);
    }
    Ok(store.import_str(text)?)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn summary_line(prefix: &str, summary: &ImportSummary) -> String {
    let mut line = format!("{} {} notes", prefix, summary.imported);
    let mut extras = Vec::new();
    if summary.skipped > 0 {
        extras.push(format!("{} empty skipped", summary.skipped));
    }
    if summary.reassigned_ids > 0 {
        extras.push(format!("{} given new ids", summary.reassigned_ids));
    }
    if !extras.is_empty() {
        line.push_str(&format!(" ({})", extras.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreOptions;

    const PAYLOAD: &str = r#"[
        {"id": "a1", "title": "Trip", "content": "pack", "color": "Sky"},
        {"title": "", "content": "  "},
        {"title": "Recipe", "body": "flour"}
    ]"#;

    #[test]
    fn test_import_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        std::fs::write(&path, PAYLOAD).unwrap();

        let mut store = NoteStore::load(MemorySlot::new(), StoreOptions::default());
        run_import(&mut store, path.to_str(), false).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.notes()[0].title, "Trip");
        assert_eq!(store.notes()[1].content, "flour");
    }

    #[test]
    fn test_dry_run_leaves_store_untouched() {
        let mut store = NoteStore::load(MemorySlot::new(), StoreOptions::default());
        store.add("Existing", "", None).unwrap();
        let writes = store.slot().writes();

        let summary = import_text(&mut store, PAYLOAD, true).unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.slot().writes(), writes);
    }

    #[test]
    fn test_invalid_payload_is_error() {
        let mut store = NoteStore::load(MemorySlot::new(), StoreOptions::default());
        assert!(import_text(&mut store, r#"{"title": "x"}"#, false).is_err());
        assert!(import_text(&mut store, "not json", false).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let mut store = NoteStore::load(MemorySlot::new(), StoreOptions::default());
        assert!(run_import(&mut store, path.to_str(), false).is_err());
    }

    #[test]
    fn test_summary_line() {
        let summary = ImportSummary {
            imported: 3,
            skipped: 1,
            reassigned_ids: 0,
        };
        assert_eq!(summary_line("Imported", &summary), "Imported 3 notes (1 empty skipped)");
    }
}

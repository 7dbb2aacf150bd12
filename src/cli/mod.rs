use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::NoteColor;
use crate::view::FilterMode;

pub mod add;
pub mod browse;
pub mod clear;
pub mod debounce;
pub mod delete;
pub mod display;
pub mod duplicate;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod pin;
pub mod settings;
pub mod show;
pub mod ui;

pub use add::run_add;
pub use browse::run_browse;
pub use clear::run_clear;
pub use delete::run_delete;
pub use duplicate::run_duplicate;
pub use edit::run_edit;
pub use export::run_export;
pub use import::run_import;
pub use list::run_list;
pub use pin::run_pin;
pub use settings::run_config;
pub use show::run_show;

#[derive(Parser)]
#[command(name = "notecmd")]
#[command(about = "Colorful notes for the command line")]
#[command(version)]
pub struct Cli {
    /// Database file (default: NOTECMD_DB or the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse notes interactively
    Browse,
    /// Add a new note
    Add(AddArgs),
    /// List notes, pinned first, most recently updated first
    List(ListArgs),
    /// Show a note in full
    Show(NoteArgs),
    /// Edit a note's title, body or color
    Edit(EditArgs),
    /// Pin or unpin a note
    Pin(NoteArgs),
    /// Copy a note into a new unpinned note
    Dup(NoteArgs),
    /// Delete a note
    Rm(RmArgs),
    /// Write all notes to a JSON file
    Export(ExportArgs),
    /// Merge notes from a JSON file
    Import(ImportArgs),
    /// Delete every note
    Clear(ClearArgs),
    /// Show or change settings
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub body: Option<String>,
    /// Palette color name or hex value
    #[arg(short, long)]
    pub color: Option<NoteColor>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, value_enum, default_value_t = FilterMode::All)]
    pub filter: FilterMode,
    /// Only notes whose title or body contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,
    /// Print the listed notes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Note id, id prefix, or search text
    pub identifier: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Note id, id prefix, or search text
    pub identifier: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub body: Option<String>,
    #[arg(short, long)]
    pub color: Option<NoteColor>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Note id, id prefix, or search text
    pub identifier: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file, or - for stdout (default: notes-export.json)
    pub path: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file, or - for stdin (default: pick a file)
    pub path: Option<String>,
    /// Report what would be imported without saving
    #[arg(short, long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show effective settings
    Show,
    /// Store a setting
    Set { key: String, value: String },
    /// Remove a stored setting
    Unset { key: String },
}

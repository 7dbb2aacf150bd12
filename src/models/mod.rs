mod color;
mod note;
pub mod timestamp;

pub use color::NoteColor;
pub use note::{normalize_title, Note, NotePatch, NoteRecord, UNTITLED};
pub use timestamp::TimestampFormat;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::color::NoteColor;
use super::timestamp::{self, EncodedTimestamp, TimestampFormat};

/// Title shown for notes saved without one
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: String, title: &str, content: &str, color: NoteColor, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: normalize_title(title),
            content: content.trim().to_string(),
            color,
            pinned: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a note from a persisted record.
    ///
    /// Missing or non-text `title`/`content` (or legacy `body`) read as empty,
    /// an unknown color as `default_color`, and a missing timestamp falls back
    /// to the other one and then to `now`. Only a record without a usable id
    /// is rejected.
    pub fn from_stored(record: &Value, default_color: NoteColor, now: DateTime<Utc>) -> Result<Self, String> {
        let fields = record.as_object().ok_or("not an object")?;
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .ok_or("missing id")?;

        let text = |name: &str| fields.get(name).and_then(Value::as_str);
        let created = fields.get("createdAt").and_then(timestamp::decode);
        let updated = fields.get("updatedAt").and_then(timestamp::decode);
        let created_at = created.or(updated).unwrap_or(now);

        Ok(Self {
            id: id.to_string(),
            title: normalize_title(text("title").unwrap_or_default()),
            content: text("content").or_else(|| text("body")).unwrap_or_default().to_string(),
            color: text("color").map_or(default_color, |tag| {
                NoteColor::parse(tag).unwrap_or(default_color)
            }),
            pinned: fields.get("pinned").and_then(Value::as_bool).unwrap_or(false),
            created_at,
            updated_at: updated.unwrap_or(created_at),
        })
    }

    /// Refresh `updated_at`, never moving it backwards
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Case-insensitive substring match on title or content.
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }

    pub fn record(&self, format: TimestampFormat) -> NoteRecord<'_> {
        NoteRecord {
            id: &self.id,
            title: &self.title,
            content: &self.content,
            color: self.color,
            pinned: self.pinned,
            created_at: format.encode(&self.created_at),
            updated_at: format.encode(&self.updated_at),
        }
    }
}

/// Serialized shape of a note, with a fixed field order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub color: NoteColor,
    pub pinned: bool,
    pub created_at: EncodedTimestamp,
    pub updated_at: EncodedTimestamp,
}

/// Partial update applied by `NoteStore::update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<NoteColor>,
    pub pinned: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.color.is_none() && self.pinned.is_none()
    }

    pub(crate) fn apply(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = normalize_title(&title);
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(color) = self.color {
            note.color = color;
        }
        if let Some(pinned) = self.pinned {
            note.pinned = pinned;
        }
    }
}

pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn sample() -> Note {
        Note::new("n1".into(), "  Groceries ", " milk\n", NoteColor::Mint, Utc::now())
    }

    #[test]
    fn test_note_new_trims_and_defaults() {
        let note = sample();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk");
        assert!(!note.pinned);
        assert_eq!(note.created_at, note.updated_at);

        let blank = Note::new("n2".into(), "   ", "", NoteColor::default(), Utc::now());
        assert_eq!(blank.title, UNTITLED);
        assert_eq!(blank.color, NoteColor::Grape);
    }

    #[test]
    fn test_touch_never_goes_backwards() {
        let mut note = sample();
        let before = note.updated_at;
        note.touch(before - Duration::seconds(10));
        assert_eq!(note.updated_at, before);
        note.touch(before + Duration::seconds(10));
        assert!(note.updated_at > before);
    }

    #[test]
    fn test_matches_lowercase() {
        let note = sample();
        assert!(note.matches_lowercase("groc"));
        assert!(note.matches_lowercase("milk"));
        assert!(note.matches_lowercase(""));
        assert!(!note.matches_lowercase("bread"));
    }

    #[test]
    fn test_patch_apply_normalizes_title() {
        let mut note = sample();
        NotePatch {
            title: Some("  ".into()),
            pinned: Some(true),
            ..Default::default()
        }
        .apply(&mut note);
        assert_eq!(note.title, UNTITLED);
        assert!(note.pinned);
        assert_eq!(note.content, "milk");
    }

    #[test]
    fn test_from_stored_accepts_body_and_millis() {
        let record = json!({
            "id": "abc",
            "title": "Old",
            "body": "from the first app",
            "color": "grape",
            "pinned": true,
            "createdAt": 1700000000000i64,
            "updatedAt": 1700000000500i64
        });
        let note = Note::from_stored(&record, NoteColor::Sky, Utc::now()).unwrap();
        assert_eq!(note.content, "from the first app");
        assert_eq!(note.color, NoteColor::Grape);
        assert!(note.pinned);
        assert_eq!(note.updated_at.timestamp_millis(), 1700000000500);
    }

    #[test]
    fn test_from_stored_defaults_sparse_records() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let bare = Note::from_stored(&json!({"id": "x", "title": "Keep me", "body": "b"}), NoteColor::Mint, now).unwrap();
        assert_eq!(bare.title, "Keep me");
        assert_eq!(bare.content, "b");
        assert_eq!(bare.color, NoteColor::Mint);
        assert_eq!(bare.created_at, now);
        assert_eq!(bare.updated_at, now);

        let nulls = json!({"id": "y", "title": null, "content": null, "body": "c", "color": "plaid", "createdAt": 1});
        let note = Note::from_stored(&nulls, NoteColor::Mint, now).unwrap();
        assert_eq!(note.title, UNTITLED);
        assert_eq!(note.content, "c");
        assert_eq!(note.color, NoteColor::Mint);
        assert_eq!(note.updated_at.timestamp_millis(), 1);
    }

    #[test]
    fn test_from_stored_requires_id() {
        let now = Utc::now();
        assert!(Note::from_stored(&json!({"title": "no id"}), NoteColor::Grape, now).is_err());
        assert!(Note::from_stored(&json!({"id": "  "}), NoteColor::Grape, now).is_err());
        assert!(Note::from_stored(&json!({"id": 7}), NoteColor::Grape, now).is_err());
        assert!(Note::from_stored(&json!("x"), NoteColor::Grape, now).is_err());
    }

    #[test]
    fn test_record_field_order() {
        let note = Note::new("x".into(), "T", "C", NoteColor::Sky, Utc::now());
        let json = serde_json::to_string(&note.record(TimestampFormat::Millis)).unwrap();
        let positions: Vec<usize> = ["\"id\"", "\"title\"", "\"content\"", "\"color\"", "\"pinned\"", "\"createdAt\"", "\"updatedAt\""]
            .iter()
            .map(|k| json.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

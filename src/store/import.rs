//! Validation of externally supplied note collections
//!
//! The whole payload is checked before the store is touched, so a bad record
//! anywhere aborts the import with no partial mutation.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::StoreError;
use crate::models::{timestamp, NoteColor};

/// Outcome of `NoteStore::import_merge`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Records with neither title nor body
    pub skipped: usize,
    /// Records whose id was missing or already taken
    pub reassigned_ids: usize,
}

/// A record that passed validation, with missing fields still unresolved
#[derive(Debug, Clone)]
pub(crate) struct ImportCandidate {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub color: Option<NoteColor>,
    pub pinned: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub(crate) struct ParsedImport {
    pub candidates: Vec<ImportCandidate>,
    pub skipped: usize,
}

pub(crate) fn parse_payload(payload: &Value) -> Result<ParsedImport, StoreError> {
    let records = payload.as_array().ok_or_else(|| {
        StoreError::Validation(format!(
            "expected an array of notes, found {}",
            kind_of(payload)
        ))
    })?;

    let mut parsed = ParsedImport::default();
    for (idx, record) in records.iter().enumerate() {
        let fields = record.as_object().ok_or_else(|| {
            StoreError::Validation(format!(
                "note #{} is {}, expected an object",
                idx + 1,
                kind_of(record)
            ))
        })?;

        let title = text_field(fields, "title", idx)?;
        let content = match fields.get("content") {
            Some(v) if !v.is_null() => text_field(fields, "content", idx)?,
            _ => text_field(fields, "body", idx)?,
        };

        if title.trim().is_empty() && content.trim().is_empty() {
            parsed.skipped += 1;
            continue;
        }

        parsed.candidates.push(ImportCandidate {
            id: fields
                .get("id")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            title,
            content,
            color: fields
                .get("color")
                .and_then(Value::as_str)
                .map(NoteColor::parse_or_default),
            pinned: fields.get("pinned").and_then(Value::as_bool).unwrap_or(false),
            created_at: fields.get("createdAt").and_then(timestamp::decode),
            updated_at: fields.get("updatedAt").and_then(timestamp::decode),
        });
    }

    Ok(parsed)
}

/// Missing or null text fields are empty; anything else must be a string
fn text_field(fields: &Map<String, Value>, name: &str, idx: usize) -> Result<String, StoreError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(StoreError::Validation(format!(
            "note #{}: '{}' is {}, expected text",
            idx + 1,
            name,
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_array() {
        let err = parse_payload(&json!("not-an-array")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref m) if m.contains("a string")));

        assert!(parse_payload(&json!({"notes": []})).is_err());
    }

    #[test]
    fn test_rejects_non_object_record() {
        let err = parse_payload(&json!([{"title": "ok"}, 7])).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref m) if m.contains("#2")));
    }

    #[test]
    fn test_rejects_non_text_title() {
        assert!(parse_payload(&json!([{"title": ["x"]}])).is_err());
        assert!(parse_payload(&json!([{"title": "x", "content": 3}])).is_err());
    }

    #[test]
    fn test_skips_blank_records() {
        let parsed = parse_payload(&json!([
            {"title": "", "body": "  "},
            {"id": "k"},
            {"title": null, "body": "kept"}
        ]))
        .unwrap();
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].content, "kept");
    }

    #[test]
    fn test_defaults_and_passthrough() {
        let parsed = parse_payload(&json!([{
            "id": "  ",
            "title": "Plan",
            "color": "#FFD166",
            "pinned": true,
            "createdAt": "2024-02-01T00:00:00Z",
            "updatedAt": "garbage"
        }]))
        .unwrap();
        let c = &parsed.candidates[0];
        assert_eq!(c.id, None);
        assert_eq!(c.color, Some(NoteColor::Lemon));
        assert!(c.pinned);
        assert!(c.created_at.is_some());
        assert!(c.updated_at.is_none());
    }

    #[test]
    fn test_content_preferred_over_body() {
        let parsed = parse_payload(&json!([{"content": "new", "body": "old"}])).unwrap();
        assert_eq!(parsed.candidates[0].content, "new");
    }
}

//! Timestamp encodings accepted in the notes slot
//!
//! Stored collections carry either ISO-8601 strings or epoch milliseconds.
//! Both decode to `DateTime<Utc>`; a store writes back whichever encoding it
//! loaded so one slot never mixes the two.

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    #[default]
    Iso,
    Millis,
}

impl TimestampFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iso => "iso",
            Self::Millis => "millis",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "iso" | "iso8601" | "rfc3339" => Some(Self::Iso),
            "millis" | "ms" | "epoch" => Some(Self::Millis),
            _ => None,
        }
    }

    /// Guess the encoding used by a stored timestamp value
    pub fn detect(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(Self::Iso),
            Value::Number(_) => Some(Self::Millis),
            _ => None,
        }
    }

    pub fn encode(&self, at: &DateTime<Utc>) -> EncodedTimestamp {
        match self {
            Self::Iso => EncodedTimestamp::Iso(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Millis => EncodedTimestamp::Millis(at.timestamp_millis()),
        }
    }
}

/// Serialized form of a timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EncodedTimestamp {
    Iso(String),
    Millis(i64),
}

/// Decode an ISO-8601 string or a number of epoch milliseconds.
/// Sub-millisecond digits are dropped, matching what `encode` can write back.
pub fn decode(value: &Value) -> Option<DateTime<Utc>> {
    decode_exact(value).map(|at| at.trunc_subsecs(3))
}

fn decode_exact(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            s.parse::<i64>().ok().and_then(from_millis)
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(from_millis),
        _ => None,
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Color tag from the fixed note palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteColor {
    #[default]
    Grape,
    Lemon,
    Rose,
    Mint,
    Ocean,
    Amber,
    Tangerine,
    Jade,
    Sky,
    Blossom,
}

impl NoteColor {
    pub const ALL: &'static [NoteColor] = &[
        NoteColor::Grape,
        NoteColor::Lemon,
        NoteColor::Rose,
        NoteColor::Mint,
        NoteColor::Ocean,
        NoteColor::Amber,
        NoteColor::Tangerine,
        NoteColor::Jade,
        NoteColor::Sky,
        NoteColor::Blossom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grape => "grape",
            Self::Lemon => "lemon",
            Self::Rose => "rose",
            Self::Mint => "mint",
            Self::Ocean => "ocean",
            Self::Amber => "amber",
            Self::Tangerine => "tangerine",
            Self::Jade => "jade",
            Self::Sky => "sky",
            Self::Blossom => "blossom",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Self::Grape => "#A78BFA",
            Self::Lemon => "#FFD166",
            Self::Rose => "#EF476F",
            Self::Mint => "#06D6A0",
            Self::Ocean => "#118AB2",
            Self::Amber => "#F59E0B",
            Self::Tangerine => "#F97316",
            Self::Jade => "#34D399",
            Self::Sky => "#60A5FA",
            Self::Blossom => "#F472B6",
        }
    }

    /// RGB components of the palette entry, for terminal swatches
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    /// Parse a palette name or its hex value (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.hex().eq_ignore_ascii_case(s))
            .copied()
    }

    /// Parse, falling back to the default palette entry for unknown tags
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl std::fmt::Display for NoteColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoteColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let names: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
            format!("unknown color '{}' (expected one of: {})", s, names.join(", "))
        })
    }
}

impl Serialize for NoteColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Unknown or non-string tags decode to the default color rather than failing the record.
impl<'de> Deserialize<'de> for NoteColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(Self::parse_or_default)
            .unwrap_or_default())
    }
}

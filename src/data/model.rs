use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Placeholder for any text field (or genre list) that is missing or unusable.
pub const UNKNOWN: &str = "Unknown";

/// Release year of a title whose year could not be parsed.
pub const SENTINEL_YEAR: i32 = -1;

/// Column names the normalizer reads from each raw row.
pub const TITLE_COLUMN: &str = "title";
pub const TYPE_COLUMN: &str = "type";
pub const COUNTRY_COLUMN: &str = "country";
pub const RELEASE_YEAR_COLUMN: &str = "release_year";
pub const GENRES_COLUMN: &str = "listed_in";

pub const EXPECTED_COLUMNS: [&str; 5] = [
    TITLE_COLUMN,
    TYPE_COLUMN,
    COUNTRY_COLUMN,
    RELEASE_YEAR_COLUMN,
    GENRES_COLUMN,
];

// ---------------------------------------------------------------------------
// RawValue – a single cell as delivered by the upstream loader
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what CSV / JSON / Parquet sources yield.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Already-structured multi-valued cell (JSON array, Parquet list column).
    List(Vec<RawValue>),
    Null,
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::String(s) => write!(f, "{s}"),
            RawValue::Integer(i) => write!(f, "{i}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            RawValue::Null => write!(f, "<null>"),
        }
    }
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Integer(i)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

/// One loosely-typed source row: column name → cell. Absent key = missing cell.
pub type RawRecord = BTreeMap<String, RawValue>;

// ---------------------------------------------------------------------------
// TitleRecord – one canonical catalog entry
// ---------------------------------------------------------------------------

/// A normalized catalog entry. Every field is populated; see [`UNKNOWN`] and
/// [`SENTINEL_YEAR`] for the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleRecord {
    pub title: String,
    /// Content type, e.g. `"Movie"` or `"TV Show"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub country: String,
    /// Calendar year, or [`SENTINEL_YEAR`].
    pub release_year: i32,
    /// Never empty.
    pub genres: Vec<String>,
}

impl TitleRecord {
    /// Whether the release year is a real year rather than the sentinel.
    pub fn has_valid_year(&self) -> bool {
        self.release_year >= 0
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

impl Default for TitleRecord {
    fn default() -> Self {
        Self {
            title: UNKNOWN.to_string(),
            kind: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            release_year: SENTINEL_YEAR,
            genres: vec![UNKNOWN.to_string()],
        }
    }
}

/// Row of the filtered-titles table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub release_year: i32,
    pub country: String,
}

impl From<&TitleRecord> for TableRow {
    fn from(rec: &TitleRecord) -> Self {
        TableRow {
            title: rec.title.clone(),
            kind: rec.kind.clone(),
            release_year: rec.release_year,
            country: rec.country.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_uses_placeholders() {
        let rec = TitleRecord::default();
        assert_eq!(rec.title, "Unknown");
        assert_eq!(rec.release_year, -1);
        assert!(!rec.has_valid_year());
        assert_eq!(rec.genres, vec!["Unknown".to_string()]);
    }

    #[test]
    fn genre_membership_is_exact() {
        let rec = TitleRecord {
            genres: vec!["Dramas".into(), "Comedies".into()],
            ..TitleRecord::default()
        };
        assert!(rec.has_genre("Comedies"));
        assert!(!rec.has_genre("Comedy"));
    }

    #[test]
    fn raw_list_display() {
        let v = RawValue::List(vec![RawValue::from("a"), RawValue::Integer(3)]);
        assert_eq!(v.to_string(), "[a, 3]");
    }
}

use serde::{Deserialize, Serialize};

use super::model::{TableRow, TitleRecord};

// ---------------------------------------------------------------------------
// Filter predicate: genre membership, exact type, inclusive year range
// ---------------------------------------------------------------------------

/// The active selections of the dashboard controls. `None` means "no filter".
///
/// An empty genre or type string counts as unset (a cleared dropdown).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub genre: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Inclusive `(low, high)`. Compared literally against the stored year,
    /// so sentinel rows only pass when `low <= -1`.
    pub year_range: Option<(i32, i32)>,
}

impl FilterSpec {
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_year_range(mut self, low: i32, high: i32) -> Self {
        self.year_range = Some((low, high));
        self
    }

    /// True when no predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        active(&self.genre).is_none() && active(&self.kind).is_none() && self.year_range.is_none()
    }

    /// Whether a single record passes every active predicate.
    pub fn matches(&self, rec: &TitleRecord) -> bool {
        if let Some(genre) = active(&self.genre) {
            if !rec.has_genre(genre) {
                return false;
            }
        }
        if let Some(kind) = active(&self.kind) {
            if rec.kind != kind {
                return false;
            }
        }
        if let Some((low, high)) = self.year_range {
            if rec.release_year < low || rec.release_year > high {
                return false;
            }
        }
        true
    }
}

fn active(selection: &Option<String>) -> Option<&str> {
    selection.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// FilteredView – matching rows, sharing storage with the catalog
// ---------------------------------------------------------------------------

/// The rows of a catalog that pass a [`FilterSpec`], in catalog order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: &'a [TitleRecord],
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn all(records: &'a [TitleRecord]) -> Self {
        FilteredView {
            records,
            indices: (0..records.len()).collect(),
        }
    }

    /// Number of matching rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the matching rows in the source slice.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TitleRecord> + '_ {
        let records = self.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    /// The filtered-titles table: one row per match, original order.
    pub fn table_rows(&self) -> Vec<TableRow> {
        self.iter().map(TableRow::from).collect()
    }
}

/// Return the rows that pass every active predicate of `spec`.
///
/// Pure and stable: the input is not touched and matches keep their
/// relative order.
pub fn filter<'a>(records: &'a [TitleRecord], spec: &FilterSpec) -> FilteredView<'a> {
    let indices = records
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect();
    FilteredView { records, indices }
}

//! Data layer: normalization, domain indexing, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  read file → Vec<RawRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  RawRecord → TitleRecord (defaults, sentinel year)
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  domain   │  genre / type universes, year bounds and marks
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐      ┌───────────┐
//!   │  filter   │ ───▶ │ aggregate  │  counts, histogram, distributions, insights
//!   └──────────┘      └───────────┘
//! ```
use std::path::Path;

use serde::Serialize;

pub mod aggregate;
pub mod domain;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;

pub use aggregate::{Histogram, Insights, TypeCounts, DEFAULT_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS};
pub use domain::Domain;
pub use error::{CatalogError, EmptyResult};
pub use filter::{filter, FilterSpec, FilteredView};
pub use model::{RawRecord, RawValue, TableRow, TitleRecord};

/// Normalize raw rows and derive their domain.
pub fn load(rows: &[RawRecord]) -> (Domain, Vec<TitleRecord>) {
    let records = normalize::normalize(rows);
    let domain = Domain::index(&records);
    (domain, records)
}

// ---------------------------------------------------------------------------
// Catalog – the loaded dataset, immutable after construction
// ---------------------------------------------------------------------------

/// Canonical records plus their [`Domain`], built once and only read after.
///
/// Queries take `&self`, so a catalog behind an `Arc` can serve concurrent
/// filter requests without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<TitleRecord>,
    domain: Domain,
}

impl Catalog {
    pub fn from_rows(rows: &[RawRecord]) -> Self {
        let (domain, records) = load(rows);
        Catalog { records, domain }
    }

    /// Wrap records that are already canonical.
    pub fn from_records(records: Vec<TitleRecord>) -> Self {
        let domain = Domain::index(&records);
        Catalog { records, domain }
    }

    /// Read, normalize and index a catalog file.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let rows = loader::load_file(path).map_err(|e| CatalogError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;
        let catalog = Self::from_rows(&rows);
        log::info!(
            "Loaded {} titles from {} ({} genres, {} types, years {}..={})",
            catalog.len(),
            path.display(),
            catalog.domain.genre_universe.len(),
            catalog.domain.type_universe.len(),
            catalog.domain.year_min,
            catalog.domain.year_max,
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Number of titles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, spec: &FilterSpec) -> FilteredView<'_> {
        filter(&self.records, spec)
    }

    /// Filter once and compute every dashboard output from the result.
    pub fn query(&self, spec: &FilterSpec, bin_count: usize) -> Snapshot {
        let view = self.filter(spec);
        log::debug!("filter {spec:?} matched {} of {} titles", view.len(), self.len());
        Snapshot {
            spec: spec.clone(),
            counts: aggregate::counts_by_type(&view),
            histogram: aggregate::year_histogram(&view, bin_count),
            genres: aggregate::genre_distribution(&view),
            types: aggregate::type_distribution(&view),
            table: view.table_rows(),
            insights: aggregate::insights(&view),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot – everything the presentation layer renders for one filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub spec: FilterSpec,
    pub counts: TypeCounts,
    pub histogram: Result<Histogram, EmptyResult>,
    pub genres: Vec<(String, usize)>,
    pub types: Vec<(String, usize)>,
    pub table: Vec<TableRow>,
    pub insights: Result<Insights, EmptyResult>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cells: &[(&str, RawValue)]) -> RawRecord {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn three_rows() -> Vec<RawRecord> {
        vec![
            raw(&[
                ("title", "A".into()),
                ("type", "Movie".into()),
                ("release_year", RawValue::Integer(2020)),
                ("listed_in", "['Drama']".into()),
            ]),
            raw(&[
                ("title", "B".into()),
                ("type", "TV Show".into()),
                ("release_year", RawValue::Integer(2020)),
                ("listed_in", "Comedy, Drama".into()),
            ]),
            raw(&[
                ("title", "C".into()),
                ("type", "Movie".into()),
                ("release_year", "bad".into()),
                ("listed_in", RawValue::List(vec![])),
            ]),
        ]
    }

    #[test]
    fn load_normalizes_and_indexes() {
        let (domain, records) = load(&three_rows());
        assert_eq!(records[2].release_year, -1);
        assert_eq!(records[2].genres, vec!["Unknown"]);
        assert_eq!(domain.genre_universe, vec!["Comedy", "Drama", "Unknown"]);
        assert_eq!(domain.full_year_range(), (2020, 2020));
    }

    #[test]
    fn query_builds_a_full_snapshot() {
        let catalog = Catalog::from_rows(&three_rows());
        let snapshot = catalog.query(&FilterSpec::default().with_genre("Drama"), 40);
        assert_eq!(snapshot.counts.total, 2);
        assert_eq!(snapshot.table.len(), 2);
        assert_eq!(snapshot.insights.as_ref().map(|i| i.top_year), Ok(Some(2020)));
        assert!(snapshot.histogram.is_ok());
    }

    #[test]
    fn empty_query_snapshot_serializes() {
        let catalog = Catalog::from_rows(&three_rows());
        let snapshot = catalog.query(&FilterSpec::default().with_type("Documentary"), 40);
        assert_eq!(snapshot.histogram, Err(EmptyResult::NoRows));
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"NoRows\""));
        assert!(json.contains("\"total\": 0"));
    }
}

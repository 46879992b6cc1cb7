use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::model::TitleRecord;

/// Year bounds used when the catalog has no valid release year at all.
pub const DEFAULT_YEAR_MIN: i32 = 1900;
pub const DEFAULT_YEAR_MAX: i32 = 2025;

/// Spans wider than this get a tick every [`WIDE_MARK_STEP`] years.
const WIDE_SPAN_YEARS: i32 = 20;
const WIDE_MARK_STEP: i32 = 5;
/// The step is widened when needed so no span yields more marks than this.
pub const MAX_YEAR_MARKS: i64 = 32;

// ---------------------------------------------------------------------------
// Domain – stable universes for the filter controls
// ---------------------------------------------------------------------------

/// Categorical universes and year bounds derived once from the full catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    /// Distinct genre tags, sorted ascending.
    pub genre_universe: Vec<String>,
    /// Distinct content types, sorted ascending.
    pub type_universe: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
    /// Tick labels for the year-range control; always includes both bounds.
    pub year_marks: BTreeMap<i32, String>,
}

impl Domain {
    /// Build the domain from canonical records.
    pub fn index(records: &[TitleRecord]) -> Self {
        let mut genres: BTreeSet<&str> = BTreeSet::new();
        let mut types: BTreeSet<&str> = BTreeSet::new();
        let mut years: Option<(i32, i32)> = None;

        for rec in records {
            genres.extend(rec.genres.iter().map(String::as_str));
            types.insert(rec.kind.as_str());
            if rec.has_valid_year() {
                let y = rec.release_year;
                years = Some(match years {
                    Some((lo, hi)) => (lo.min(y), hi.max(y)),
                    None => (y, y),
                });
            }
        }

        let (year_min, year_max) = years.unwrap_or((DEFAULT_YEAR_MIN, DEFAULT_YEAR_MAX));
        let step = if year_max - year_min > WIDE_SPAN_YEARS {
            WIDE_MARK_STEP
        } else {
            1
        };

        Domain {
            genre_universe: genres.into_iter().map(String::from).collect(),
            type_universe: types.into_iter().map(String::from).collect(),
            year_min,
            year_max,
            year_marks: year_marks(year_min, year_max, step),
        }
    }

    /// The full year range, i.e. the "nothing selected" slider position.
    pub fn full_year_range(&self) -> (i32, i32) {
        (self.year_min, self.year_max)
    }
}

/// Ticks at `start, start + step, ...` up to `end`, plus both endpoints.
///
/// Never more than [`MAX_YEAR_MARKS`] ticks besides the two endpoints.
pub fn year_marks(start: i32, end: i32, step: i32) -> BTreeMap<i32, String> {
    let span = (i64::from(end) - i64::from(start)).max(0);
    let step = i64::from(step.max(1)).max(span / MAX_YEAR_MARKS + 1) as usize;
    let mut marks: BTreeMap<i32, String> = (start..=end)
        .step_by(step)
        .map(|y| (y, y.to_string()))
        .collect();
    marks.insert(start, start.to_string());
    marks.insert(end, end.to_string());
    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SENTINEL_YEAR;

    fn rec(kind: &str, year: i32, genres: &[&str]) -> TitleRecord {
        TitleRecord {
            kind: kind.to_string(),
            release_year: year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..TitleRecord::default()
        }
    }

    #[test]
    fn universes_are_sorted_and_distinct() {
        let records = vec![
            rec("TV Show", 2019, &["Dramas", "Comedies"]),
            rec("Movie", 2001, &["Action", "Dramas"]),
            rec("Movie", SENTINEL_YEAR, &["Unknown"]),
        ];
        let domain = Domain::index(&records);
        assert_eq!(
            domain.genre_universe,
            vec!["Action", "Comedies", "Dramas", "Unknown"]
        );
        assert_eq!(domain.type_universe, vec!["Movie", "TV Show"]);
        assert_eq!((domain.year_min, domain.year_max), (2001, 2019));
    }

    #[test]
    fn empty_catalog_uses_default_bounds() {
        let domain = Domain::index(&[]);
        assert!(domain.genre_universe.is_empty());
        assert!(domain.type_universe.is_empty());
        assert_eq!(domain.full_year_range(), (1900, 2025));
    }

    #[test]
    fn no_valid_years_uses_default_bounds() {
        let records = vec![rec("Movie", SENTINEL_YEAR, &["Dramas"])];
        let domain = Domain::index(&records);
        assert_eq!(domain.full_year_range(), (1900, 2025));
        assert_eq!(domain.year_marks.keys().next(), Some(&1900));
        assert_eq!(domain.year_marks.keys().last(), Some(&2025));
    }

    #[test]
    fn narrow_span_marks_every_year() {
        let records = vec![rec("Movie", 2010, &["A"]), rec("Movie", 2015, &["A"])];
        let marks = Domain::index(&records).year_marks;
        assert_eq!(marks.keys().copied().collect::<Vec<_>>(), (2010..=2015).collect::<Vec<_>>());
    }

    #[test]
    fn wide_span_marks_every_five_years_plus_endpoints() {
        let records = vec![rec("Movie", 1942, &["A"]), rec("Movie", 2021, &["A"])];
        let marks = Domain::index(&records).year_marks;
        let keys: Vec<i32> = marks.keys().copied().collect();
        assert_eq!(keys.first(), Some(&1942));
        assert_eq!(keys.last(), Some(&2021));
        assert!(keys.contains(&2017));
        assert!(!keys.contains(&2020));
        assert_eq!(marks[&2021], "2021");
    }

    #[test]
    fn corrupt_far_year_keeps_marks_bounded() {
        let records = vec![rec("Movie", 1950, &["A"]), rec("Movie", 2_000_000_000, &["A"])];
        let marks = Domain::index(&records).year_marks;
        assert!(marks.len() as i64 <= MAX_YEAR_MARKS + 2);
        assert_eq!(marks.keys().next(), Some(&1950));
        assert_eq!(marks.keys().last(), Some(&2_000_000_000));
    }

    #[test]
    fn single_year_has_single_mark() {
        let marks = year_marks(2020, 2020, 1);
        assert_eq!(marks.len(), 1);
    }
}

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use super::error::EmptyResult;
use super::filter::FilteredView;

/// Bin count of the titles-per-year histogram unless configured otherwise.
pub const DEFAULT_HISTOGRAM_BINS: usize = 40;
/// Upper bound on requested bins; larger requests are clamped.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

pub const MOVIE: &str = "Movie";
pub const TV_SHOW: &str = "TV Show";

/// Placeholder shown when there is no valid year to report.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// KPI counts. Rows whose type is neither [`MOVIE`] nor [`TV_SHOW`] only
/// count towards `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub total: usize,
    pub movies: usize,
    pub tv_shows: usize,
}

/// Equal-width histogram of valid release years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges; the last bin is closed on the right.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }

    /// `(start, end, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    /// Number of years binned.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Narrative figures for the insights box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insights {
    /// Most frequent country; ties go to the first encountered.
    pub top_country: String,
    /// Most frequent valid year; ties go to the first encountered.
    pub top_year: Option<i32>,
    pub total: usize,
}

impl Insights {
    pub fn top_year_label(&self) -> String {
        self.top_year
            .map_or_else(|| NOT_AVAILABLE.to_string(), |y| y.to_string())
    }
}

// ---------------------------------------------------------------------------
// Aggregates over a filtered view
// ---------------------------------------------------------------------------

pub fn counts_by_type(view: &FilteredView<'_>) -> TypeCounts {
    view.iter().fold(TypeCounts::default(), |mut acc, rec| {
        acc.total += 1;
        match rec.kind.as_str() {
            MOVIE => acc.movies += 1,
            TV_SHOW => acc.tv_shows += 1,
            _ => {}
        }
        acc
    })
}

/// Bin the valid years of `view` into `bin_count` equal-width bins spanning
/// the observed min/max of those years. `bin_count` is clamped to
/// `1..=MAX_HISTOGRAM_BINS`.
pub fn year_histogram(view: &FilteredView<'_>, bin_count: usize) -> Result<Histogram, EmptyResult> {
    if view.is_empty() {
        return Err(EmptyResult::NoRows);
    }
    let years: Vec<i32> = view
        .iter()
        .filter(|rec| rec.has_valid_year())
        .map(|rec| rec.release_year)
        .collect();
    let (Some(&min), Some(&max)) = (years.iter().min(), years.iter().max()) else {
        return Err(EmptyResult::NoValidYears);
    };

    let bins = bin_count.clamp(1, MAX_HISTOGRAM_BINS);
    let (lo, hi) = if min == max {
        (f64::from(min) - 0.5, f64::from(max) + 0.5)
    } else {
        (f64::from(min), f64::from(max))
    };
    let width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut counts = vec![0usize; bins];
    for year in years {
        let slot = ((f64::from(year) - lo) / width) as usize;
        counts[slot.min(bins - 1)] += 1;
    }
    Ok(Histogram { edges, counts })
}

/// Occurrences per genre tag after exploding each row's genre list.
///
/// Duplicated tags within one row count once per occurrence. Sorted by
/// descending count, ties in first-encountered order.
pub fn genre_distribution(view: &FilteredView<'_>) -> Vec<(String, usize)> {
    let exploded = view
        .iter()
        .flat_map(|rec| rec.genres.iter().map(String::as_str));
    by_count_desc(tally(exploded))
}

/// Rows per distinct content type, sorted like [`genre_distribution`].
pub fn type_distribution(view: &FilteredView<'_>) -> Vec<(String, usize)> {
    by_count_desc(tally(view.iter().map(|rec| rec.kind.as_str())))
}

pub fn insights(view: &FilteredView<'_>) -> Result<Insights, EmptyResult> {
    if view.is_empty() {
        return Err(EmptyResult::NoRows);
    }
    let top_country = mode(view.iter().map(|rec| rec.country.as_str()))
        .map_or_else(|| NOT_AVAILABLE.to_string(), str::to_string);
    let top_year = mode(
        view.iter()
            .filter(|rec| rec.has_valid_year())
            .map(|rec| rec.release_year),
    );
    Ok(Insights {
        top_country,
        top_year,
        total: view.len(),
    })
}

// ---------------------------------------------------------------------------
// Counting helpers
// ---------------------------------------------------------------------------

/// Count occurrences, keeping keys in first-encountered order.
fn tally<K, I>(items: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        match slots.get(&item) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}

fn by_count_desc(mut counts: Vec<(&str, usize)>) -> Vec<(String, usize)> {
    // stable: equal counts keep first-encountered order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(key, n)| (key.to_string(), n))
        .collect()
}

/// Most frequent item; the earliest one wins a tie.
fn mode<K, I>(items: I) -> Option<K>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = K>,
{
    let mut best: Option<(K, usize)> = None;
    for (key, n) in tally(items) {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((key, n));
        }
    }
    best.map(|(key, _)| key)
}

use std::path::Path;
use std::sync::Arc;

use vod_dashboard::config::DashboardConfig;
use vod_dashboard::data::{Catalog, FilterSpec, Snapshot};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded catalog (None until a file is opened).
    pub catalog: Option<Arc<Catalog>>,

    /// Current control selections.
    pub spec: FilterSpec,

    /// Outputs for `spec` (cached, recomputed on every filter change).
    pub snapshot: Option<Snapshot>,

    /// Colour per content type.
    pub type_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            catalog: None,
            spec: FilterSpec::default(),
            snapshot: None,
            type_colors: None,
            status_message: None,
        }
    }

    /// Load a catalog file, reporting failure in the status line.
    pub fn open_path(&mut self, path: &Path) {
        match Catalog::open(path) {
            Ok(catalog) => self.set_catalog(catalog),
            Err(e) => {
                log::error!("Failed to load catalog: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded catalog and reset the controls.
    ///
    /// The year slider always carries a range, so rows with an unknown year
    /// are outside the default view, as with any slider position.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.type_colors = Some(ColorMap::new(&catalog.domain().type_universe));
        self.spec = FilterSpec {
            year_range: Some(catalog.domain().full_year_range()),
            ..FilterSpec::default()
        };
        self.catalog = Some(Arc::new(catalog));
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the snapshot after a filter change.
    pub fn refilter(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.snapshot = Some(catalog.query(&self.spec, self.config.histogram_bins));
        }
    }

    pub fn set_genre(&mut self, genre: Option<String>) {
        if self.spec.genre != genre {
            self.spec.genre = genre;
            self.refilter();
        }
    }

    pub fn set_type(&mut self, kind: Option<String>) {
        if self.spec.kind != kind {
            self.spec.kind = kind;
            self.refilter();
        }
    }

    /// Move the year range; the bound that was not moved follows the other
    /// one so `low <= high` holds.
    pub fn set_year_range(&mut self, low: i32, high: i32) {
        let (old_low, _) = self.spec.year_range.unwrap_or((low, high));
        let range = if low <= high {
            (low, high)
        } else if low != old_low {
            (low, low)
        } else {
            (high, high)
        };
        if self.spec.year_range != Some(range) {
            self.spec.year_range = Some(range);
            self.refilter();
        }
    }

    /// Back to all genres, all types and the full year range.
    pub fn reset_filters(&mut self) {
        let full = self
            .catalog
            .as_ref()
            .map(|c| c.domain().full_year_range());
        self.spec = FilterSpec {
            year_range: full,
            ..FilterSpec::default()
        };
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vod_dashboard::data::TitleRecord;

    fn rec(kind: &str, year: i32, genres: &[&str]) -> TitleRecord {
        TitleRecord {
            title: format!("{kind} {year}"),
            kind: kind.to_string(),
            country: "Portugal".to_string(),
            release_year: year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn loaded() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_catalog(Catalog::from_records(vec![
            rec("Movie", 1990, &["Dramas"]),
            rec("TV Show", 2010, &["Comedies", "Dramas"]),
            rec("Movie", -1, &["Unknown"]),
        ]));
        state
    }

    #[test]
    fn default_view_uses_full_year_range() {
        let state = loaded();
        assert_eq!(state.spec.year_range, Some((1990, 2010)));
        let snapshot = state.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.counts.total, 2);
    }

    #[test]
    fn selections_refilter() {
        let mut state = loaded();
        state.set_genre(Some("Comedies".into()));
        assert_eq!(state.snapshot.as_ref().unwrap().counts.tv_shows, 1);
        state.set_type(Some("Movie".into()));
        assert_eq!(state.snapshot.as_ref().unwrap().counts.total, 0);
        state.reset_filters();
        assert_eq!(state.spec.genre, None);
        assert_eq!(state.snapshot.as_ref().unwrap().counts.total, 2);
    }

    #[test]
    fn year_bounds_never_cross() {
        let mut state = loaded();
        state.set_year_range(2005, 2010);
        state.set_year_range(2005, 2000);
        assert_eq!(state.spec.year_range, Some((2000, 2000)));
        state.set_year_range(2008, 2000);
        assert_eq!(state.spec.year_range, Some((2008, 2008)));
    }

    #[test]
    fn failed_open_sets_status() {
        let mut state = AppState::new(DashboardConfig::default());
        state.open_path(Path::new("/nonexistent/titles.csv"));
        assert!(state.catalog.is_none());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("unavailable")));
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::DEFAULT_HISTOGRAM_BINS;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "VOD_DASHBOARD_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Presentation settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Catalog opened at startup.
    pub dataset_path: Option<PathBuf>,
    pub histogram_bins: usize,
    /// Bars shown in the genre chart (most frequent first).
    pub genre_chart_limit: usize,
    /// Rows rendered in the filtered-titles table.
    pub table_row_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            genre_chart_limit: 20,
            table_row_limit: 500,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Defaults, overlaid by `config_file` if given, then by `dataset`.
    pub fn resolve(config_file: Option<&Path>, dataset: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if dataset.is_some() {
            config.dataset_path = dataset;
        }
        Ok(config)
    }

    /// Resolve from [`CONFIG_ENV`] and the first command-line argument.
    pub fn from_env() -> Result<Self> {
        let config_file = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let dataset = std::env::args_os().nth(1).map(PathBuf::from);
        Self::resolve(config_file.as_deref(), dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = config_file(r#"{ "histogram_bins": 25 }"#);
        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.histogram_bins, 25);
        assert_eq!(config.table_row_limit, 500);
        assert_eq!(config.dataset_path, None);
    }

    #[test]
    fn dataset_argument_overrides_file() {
        let file = config_file(r#"{ "dataset_path": "from_file.csv" }"#);
        let config =
            DashboardConfig::resolve(Some(file.path()), Some(PathBuf::from("titles.csv"))).unwrap();
        assert_eq!(config.dataset_path, Some(PathBuf::from("titles.csv")));

        let config = DashboardConfig::resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.dataset_path, Some(PathBuf::from("from_file.csv")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = config_file("histogram_bins = 25");
        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }

    #[test]
    fn no_file_means_defaults() {
        let config = DashboardConfig::resolve(None, None).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.histogram_bins, 40);
    }
}

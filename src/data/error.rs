use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Fatal failures of the catalog load. Nothing after a successful load is fatal.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source '{}' is unavailable: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("failed to serialize snapshot: {0}")]
    Export(#[from] serde_json::Error),
}

/// An aggregate that needs at least one row (or one known year) got none.
///
/// Returned as a value: an empty filter result is an ordinary outcome of
/// user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub enum EmptyResult {
    #[error("no titles match the selected filters")]
    NoRows,
    #[error("no titles with a known release year match the selected filters")]
    NoValidYears,
}

/// A single malformed cell. Never leaves the normalizer; every variant is
/// resolved to a default there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum FieldError {
    #[error("value is null")]
    Null,
    #[error("not a literal: {0}")]
    NotLiteral(String),
    #[error("no usable entries")]
    Empty,
    #[error("not a number: {0}")]
    NotNumeric(String),
}

//! Filtering and aggregation core of the catalog dashboard.
//!
//! Load a catalog once with [`data::Catalog::open`] (or build one from rows
//! with [`data::Catalog::from_rows`]), then answer each filter change with
//! [`data::Catalog::query`].

pub mod config;
pub mod data;

//! Paycentile Core: salary distribution provider and analyzer.
//!
//! This crate holds everything a salary-comparison dashboard computes:
//! - Domain types (distribution points, filter selection, filter catalog)
//! - Distribution providers (synthetic curve, remote centile table) behind one trait
//! - Loading with the empty-table fallback
//! - Percentile lookup, median, and filter re-weighting
//! - Configuration (TOML file + environment) and salary input parsing
//! - A comparison session tying the pieces together for a UI

pub mod analyzer;
pub mod config;
pub mod data;
pub mod domain;
pub mod input;
pub mod session;

pub use analyzer::{apply_filters, apply_filters_with, median_salary, percentage_below, WeightTable};
pub use config::{AppConfig, ConfigError, SourceMode};
pub use data::{load_distribution, DataError, DataSource, DistributionProvider, LoadedDistribution};
pub use domain::{
    AnalysisResult, Distribution, DistributionPoint, FilterCatalog, FilterCategory,
    FilterSelection,
};
pub use input::{parse_salary, InputError};
pub use session::Comparison;

//! Domain types for paycentile

pub mod distribution;
pub mod filters;

pub use distribution::{
    Distribution, DistributionPoint, FIRST_CENTILE, LAST_CENTILE, MEDIAN_CENTILE,
};
pub use filters::{
    FilterCatalog, FilterCategory, FilterGroup, FilterOption, FilterSelection, UnknownCategory,
    NEUTRAL,
};

use serde::{Deserialize, Serialize};

/// What the dashboard displays for the current distribution and salary.
///
/// `percentage_below` is `None` until a salary has been entered, and stays
/// `None` while the distribution is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub percentage_below: Option<f64>,
    pub median_salary: f64,
}

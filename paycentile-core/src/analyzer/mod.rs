//! Distribution analyzer: pure functions over a [`Distribution`](crate::domain::Distribution).
//!
//! None of these mutate their input. Re-weighting returns a fresh distribution.

pub mod percentile;
pub mod weights;

pub use percentile::{median_salary, percentage_below};
pub use weights::{apply_filters, apply_filters_with, WeightTable, DEFAULT_WEIGHTS};

//! Percentile lookup over a distribution table.
//!
//! The 100-row table is read as a piecewise-linear curve: between two adjacent
//! rows the centile grows linearly with the salary.

use crate::domain::{Distribution, MEDIAN_CENTILE};

/// Estimated share of the population (0..=100) earning less than `salary`.
///
/// Scans for the first point whose salary is >= `salary`:
/// - match on the first point: 0
/// - no match at all (salary above the top centile): 100
/// - otherwise interpolate between the match and its predecessor.
///
/// Requires salaries to be non-decreasing in centile order.
pub fn percentage_below(distribution: &Distribution, salary: f64) -> f64 {
    let points = distribution.points();

    let Some(index) = points.iter().position(|p| p.salary >= salary) else {
        return 100.0;
    };
    if index == 0 {
        return 0.0;
    }

    let lower = points[index - 1];
    let upper = points[index];
    let width = upper.salary - lower.salary;

    // Zero-width interval: nothing to interpolate, stay on the lower centile.
    let ratio = if width > 0.0 {
        (salary - lower.salary) / width
    } else {
        0.0
    };

    f64::from(lower.centile) + ratio
}

/// Salary stored at the 50th centile, or 0 when that row is missing.
pub fn median_salary(distribution: &Distribution) -> f64 {
    distribution.salary_at(MEDIAN_CENTILE).unwrap_or(0.0)
}

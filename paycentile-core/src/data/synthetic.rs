//! Synthetic salary distribution.
//!
//! A fixed piecewise curve: gentle slopes through the lower and middle
//! centiles, a steeper linear stretch from the median to the 90th, and a
//! quadratic top decile. Used when no remote source is configured.

use super::provider::{DataError, DataSource, DistributionProvider};
use crate::domain::{Distribution, DistributionPoint, FIRST_CENTILE, LAST_CENTILE};

/// Monthly net salary for `centile` on the synthetic curve.
pub fn synthetic_salary(centile: u8) -> f64 {
    let i = f64::from(centile);
    let salary = match centile {
        0..=9 => 1200.0 + 50.0 * i,
        10..=49 => 1700.0 + 30.0 * (i - 10.0),
        50..=89 => 2900.0 + 70.0 * (i - 50.0),
        _ => 5700.0 + 100.0 * (i - 90.0).powi(2),
    };
    salary.round()
}

/// Generate the full 100-point synthetic distribution.
pub fn generate_distribution() -> Distribution {
    (FIRST_CENTILE..=LAST_CENTILE)
        .map(|c| DistributionPoint::new(c, synthetic_salary(c)))
        .collect()
}

/// Provider backed by [`generate_distribution`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticProvider;

impl DistributionProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn produce_distribution(&self) -> Result<Distribution, DataError> {
        Ok(generate_distribution())
    }
}

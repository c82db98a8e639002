//! Salary distribution: one point per integer centile, ascending.

use serde::{Deserialize, Serialize};

/// Lowest centile in a complete distribution.
pub const FIRST_CENTILE: u8 = 1;

/// Highest centile in a complete distribution.
pub const LAST_CENTILE: u8 = 100;

/// Centile holding the median salary.
pub const MEDIAN_CENTILE: u8 = 50;

/// A single row of the distribution table: the monthly net salary below which
/// `centile` percent of the population falls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionPoint {
    pub centile: u8,
    pub salary: f64,
}

impl DistributionPoint {
    pub fn new(centile: u8, salary: f64) -> Self {
        Self { centile, salary }
    }
}

/// Ordered sequence of distribution points.
///
/// A `Distribution` is never patched in place. Filtering or reloading produces
/// a new value that replaces the old one, so readers holding a reference
/// always see a consistent table.
///
/// Complete distributions hold exactly one point per centile in 1..=100, sorted
/// ascending, with non-decreasing salaries. The analyzer's scan relies on that
/// ordering; [`Distribution::is_monotonic`] checks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    points: Vec<DistributionPoint>,
}

impl Distribution {
    pub fn new(points: Vec<DistributionPoint>) -> Self {
        Self { points }
    }

    /// The fallback shown when the data source has nothing to offer.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[DistributionPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistributionPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&DistributionPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&DistributionPoint> {
        self.points.last()
    }

    /// Salary stored for `centile`, if that centile is present.
    pub fn salary_at(&self, centile: u8) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.centile == centile)
            .map(|p| p.salary)
    }

    /// True when centiles strictly increase and salaries never decrease.
    pub fn is_monotonic(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].centile < w[1].centile && w[0].salary <= w[1].salary)
    }

    /// True when every centile in 1..=100 appears exactly once, in order.
    pub fn is_complete(&self) -> bool {
        self.points.len() == usize::from(LAST_CENTILE)
            && self
                .points
                .iter()
                .zip(FIRST_CENTILE..=LAST_CENTILE)
                .all(|(p, c)| p.centile == c)
    }

    /// Build a new distribution by mapping every salary, keeping centiles.
    pub fn map_salaries(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| DistributionPoint::new(p.centile, f(p.salary)))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = &'a DistributionPoint;
    type IntoIter = std::slice::Iter<'a, DistributionPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<DistributionPoint> for Distribution {
    fn from_iter<I: IntoIterator<Item = DistributionPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(n: u8) -> Distribution {
        (1..=n)
            .map(|c| DistributionPoint::new(c, 1000.0 + f64::from(c) * 10.0))
            .collect()
    }

    #[test]
    fn salary_at_finds_present_centile() {
        let dist = linear(100);
        assert_eq!(dist.salary_at(50), Some(1500.0));
        assert_eq!(dist.salary_at(0), None);
    }

    #[test]
    fn complete_table_is_complete_and_monotonic() {
        let dist = linear(100);
        assert!(dist.is_complete());
        assert!(dist.is_monotonic());
    }

    #[test]
    fn partial_table_is_not_complete() {
        assert!(!linear(99).is_complete());
        assert!(!Distribution::empty().is_complete());
    }

    #[test]
    fn decreasing_salary_breaks_monotonicity() {
        let dist = Distribution::new(vec![
            DistributionPoint::new(1, 1500.0),
            DistributionPoint::new(2, 1400.0),
        ]);
        assert!(!dist.is_monotonic());
    }

    #[test]
    fn duplicate_centile_breaks_monotonicity() {
        let dist = Distribution::new(vec![
            DistributionPoint::new(3, 1500.0),
            DistributionPoint::new(3, 1500.0),
        ]);
        assert!(!dist.is_monotonic());
    }

    #[test]
    fn map_salaries_returns_new_distribution() {
        let base = linear(3);
        let doubled = base.map_salaries(|s| s * 2.0);
        assert_eq!(base.salary_at(1), Some(1010.0));
        assert_eq!(doubled.salary_at(1), Some(2020.0));
        assert_eq!(doubled.len(), base.len());
    }
}

//! Filter re-weighting.
//!
//! Each (category, option) pair maps to a multiplicative weight; anything not
//! listed, the neutral option included, weighs 1.0. The combined factor for a
//! selection is the product over the four categories.
//!
//! The default weights are placeholder adjustments, not segmented statistics.
//! Deployments can override them from the config file.

use std::collections::BTreeMap;

use crate::domain::{Distribution, FilterCategory, FilterSelection};

/// Built-in adjustment weights.
pub const DEFAULT_WEIGHTS: &[(FilterCategory, &str, f64)] = &[
    (FilterCategory::Sex, "femme", 0.85),
    (FilterCategory::Sex, "homme", 1.15),
    (FilterCategory::Occupation, "cadres", 1.80),
    (FilterCategory::Occupation, "professions_intermediaires", 1.20),
    (FilterCategory::Occupation, "employes", 0.90),
    (FilterCategory::Occupation, "ouvriers", 0.85),
    (FilterCategory::Age, "moins_30", 0.80),
    (FilterCategory::Age, "30_39", 1.00),
    (FilterCategory::Age, "40_49", 1.10),
    (FilterCategory::Age, "50_plus", 1.20),
    (FilterCategory::Sector, "industrie", 1.10),
    (FilterCategory::Sector, "construction", 1.05),
    (FilterCategory::Sector, "commerce", 0.95),
    (FilterCategory::Sector, "services", 1.00),
    (FilterCategory::Sector, "administration", 0.90),
];

/// Declarative lookup from (category, option id) to weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: BTreeMap<(FilterCategory, String), f64>,
}

impl WeightTable {
    /// A table with no entries: every weight is 1.0.
    pub fn neutral() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    pub fn weight(&self, category: FilterCategory, option: &str) -> f64 {
        self.weights
            .get(&(category, option.to_string()))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn set(&mut self, category: FilterCategory, option: impl Into<String>, weight: f64) {
        self.weights.insert((category, option.into()), weight);
    }

    /// Overlay `other` on top of this table; its entries win.
    pub fn merge(&mut self, other: &WeightTable) {
        for (key, &weight) in &other.weights {
            self.weights.insert(key.clone(), weight);
        }
    }

    /// Product of the weights of every category in `selection`.
    pub fn factor(&self, selection: &FilterSelection) -> f64 {
        FilterCategory::ALL
            .iter()
            .map(|&c| self.weight(c, selection.get(c)))
            .product()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        let mut table = Self::neutral();
        for &(category, option, weight) in DEFAULT_WEIGHTS {
            table.set(category, option, weight);
        }
        table
    }
}

/// Re-weight `distribution` for `selection` using the built-in weights.
pub fn apply_filters(distribution: &Distribution, selection: &FilterSelection) -> Distribution {
    apply_filters_with(distribution, selection, &WeightTable::default())
}

/// Re-weight `distribution` for `selection` using `weights`.
///
/// Every salary is scaled by the combined factor and rounded to the nearest
/// integer; centiles are unchanged.
pub fn apply_filters_with(
    distribution: &Distribution,
    selection: &FilterSelection,
    weights: &WeightTable,
) -> Distribution {
    let factor = weights.factor(selection);
    distribution.map_salaries(|salary| (salary * factor).round())
}

//! Comparison session: the state a dashboard keeps between user actions.
//!
//! Holds the base distribution, the current filter selection and the entered
//! salary. Every selection change derives a new adjusted distribution that
//! replaces the previous one; nothing is patched in place.

use log::debug;

use crate::analyzer::{apply_filters_with, median_salary, percentage_below, WeightTable};
use crate::domain::{AnalysisResult, Distribution, FilterCategory, FilterSelection};
use crate::input::{parse_salary, InputError};

#[derive(Debug, Clone)]
pub struct Comparison {
    base: Distribution,
    weights: WeightTable,
    selection: FilterSelection,
    adjusted: Distribution,
    user_salary: Option<f64>,
}

impl Comparison {
    /// Start a session on `base` with a neutral selection.
    pub fn new(base: Distribution, weights: WeightTable) -> Self {
        let selection = FilterSelection::default();
        let adjusted = apply_filters_with(&base, &selection, &weights);
        Self {
            base,
            weights,
            selection,
            adjusted,
            user_salary: None,
        }
    }

    /// The adjusted distribution for the current selection.
    pub fn distribution(&self) -> &Distribution {
        &self.adjusted
    }

    pub fn base(&self) -> &Distribution {
        &self.base
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn user_salary(&self) -> Option<f64> {
        self.user_salary
    }

    pub fn select(&mut self, category: FilterCategory, value: impl Into<String>) {
        let selection = self.selection.clone().with(category, value);
        self.set_selection(selection);
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.recompute();
    }

    /// Validate and record a salary typed by the user.
    ///
    /// On error the previously entered salary is kept.
    pub fn enter_salary(&mut self, raw: &str) -> Result<f64, InputError> {
        let salary = parse_salary(raw)?;
        self.user_salary = Some(salary);
        Ok(salary)
    }

    /// Record an already validated salary.
    pub fn set_salary(&mut self, salary: f64) {
        self.user_salary = Some(salary);
    }

    /// Swap in a freshly loaded base distribution, keeping the selection.
    pub fn reload(&mut self, base: Distribution) {
        self.base = base;
        self.recompute();
    }

    pub fn result(&self) -> AnalysisResult {
        let percentage_below = match self.user_salary {
            Some(salary) if !self.adjusted.is_empty() => {
                Some(percentage_below(&self.adjusted, salary))
            }
            _ => None,
        };
        AnalysisResult {
            percentage_below,
            median_salary: median_salary(&self.adjusted),
        }
    }

    fn recompute(&mut self) {
        let factor = self.weights.factor(&self.selection);
        debug!("re-weighting {} centiles by {factor:.4}", self.base.len());
        self.adjusted = apply_filters_with(&self.base, &self.selection, &self.weights);
    }
}

//! Distribution loading with the empty-table fallback.
//!
//! Fallback policy:
//! 1. Provider answers with rows → use them
//! 2. Table missing or empty → empty distribution plus a notice for the user
//! 3. Transport, auth or query failure → propagate to the caller
//!
//! Nothing here retries. A failed load is retried when the user refreshes.

use log::{error, info, warn};

use super::provider::{DataError, DataSource, DistributionProvider};
use crate::domain::Distribution;

/// Result of loading the base distribution, including provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDistribution {
    pub distribution: Distribution,
    pub source: DataSource,
    /// Explanation to display when the source had no data.
    pub notice: Option<String>,
}

impl LoadedDistribution {
    pub fn is_fallback(&self) -> bool {
        self.notice.is_some()
    }
}

/// Load the base distribution from `provider`.
pub fn load_distribution(
    provider: &dyn DistributionProvider,
) -> Result<LoadedDistribution, DataError> {
    match provider.produce_distribution() {
        Ok(distribution) => {
            info!("{}: loaded {} centiles", provider.name(), distribution.len());
            Ok(LoadedDistribution {
                distribution,
                source: provider.source(),
                notice: None,
            })
        }
        Err(e) if e.is_unavailable() => {
            warn!("{}: no salary data ({e}), showing an empty distribution", provider.name());
            Ok(LoadedDistribution {
                distribution: Distribution::empty(),
                source: provider.source(),
                notice: Some(unavailable_notice(&e)),
            })
        }
        Err(e) => {
            error!("{}: failed to load salary data: {e}", provider.name());
            Err(e)
        }
    }
}

fn unavailable_notice(e: &DataError) -> String {
    match e {
        DataError::TableMissing { table } => format!(
            "The salary table '{table}' was not found on the data source. \
             Check that it exists and that the access key can read it."
        ),
        DataError::NoRows { table } => format!(
            "The salary table '{table}' is empty or hidden by row-level access rules. \
             Insert the centile rows or allow SELECT for this key."
        ),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::SyntheticProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that fails with a fixed error kind and counts calls.
    struct FailingProvider {
        kind: fn() -> DataError,
        calls: AtomicUsize,
    }

    impl FailingProvider {
        fn new(kind: fn() -> DataError) -> Self {
            Self {
                kind,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DistributionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn source(&self) -> DataSource {
            DataSource::Remote
        }

        fn produce_distribution(&self) -> Result<Distribution, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.kind)())
        }
    }

    #[test]
    fn synthetic_load_has_no_notice() {
        let loaded = load_distribution(&SyntheticProvider).unwrap();
        assert_eq!(loaded.source, DataSource::Synthetic);
        assert_eq!(loaded.distribution.len(), 100);
        assert!(!loaded.is_fallback());
    }

    #[test]
    fn missing_table_falls_back_to_empty() {
        let provider = FailingProvider::new(|| DataError::TableMissing {
            table: "salary_centiles".into(),
        });
        let loaded = load_distribution(&provider).unwrap();
        assert!(loaded.distribution.is_empty());
        assert!(loaded.notice.unwrap().contains("salary_centiles"));
    }

    #[test]
    fn no_rows_falls_back_to_empty() {
        let provider = FailingProvider::new(|| DataError::NoRows {
            table: "salary_centiles".into(),
        });
        let loaded = load_distribution(&provider).unwrap();
        assert!(loaded.is_fallback());
        assert_eq!(loaded.source, DataSource::Remote);
    }

    #[test]
    fn source_error_propagates_without_retry() {
        let provider =
            FailingProvider::new(|| DataError::NetworkUnreachable("connection refused".into()));
        let err = load_distribution(&provider).unwrap_err();
        assert!(matches!(err, DataError::NetworkUnreachable(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}

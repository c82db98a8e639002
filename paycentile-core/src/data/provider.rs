//! Distribution provider trait and structured error types.
//!
//! The DistributionProvider trait abstracts over where the base distribution
//! comes from (the synthetic generator or a remote centile table) so the
//! caller picks one from configuration and mocks it in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Distribution;

/// Structured error types for data operations.
///
/// Two classes matter to callers, see [`DataError::is_unavailable`]:
/// the source answered but has nothing to give (missing table, zero rows), or
/// the source could not be queried at all.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("table '{table}' does not exist on the data source")]
    TableMissing { table: String },

    #[error("table '{table}' returned no rows")]
    NoRows { table: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("query failed with HTTP {status}: {message}")]
    Query { status: u16, message: String },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// True when the source was reachable but holds no usable rows.
    ///
    /// These are recovered by showing an empty distribution; everything else
    /// is a source error propagated to the caller.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DataError::TableMissing { .. } | DataError::NoRows { .. })
    }
}

/// Where a distribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Synthetic,
    Remote,
}

/// Trait for distribution providers.
///
/// Implementations produce the base (unfiltered) distribution. Filtering is
/// the analyzer's job; providers don't know about the selection.
pub trait DistributionProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Provenance tag attached to loaded distributions.
    fn source(&self) -> DataSource;

    /// Produce the base distribution. Blocks until the source answers.
    fn produce_distribution(&self) -> Result<Distribution, DataError>;
}

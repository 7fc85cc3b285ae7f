//! Metric error types

use thiserror::Error;

/// Result type alias for metric operations
pub type MetricResult<T> = std::result::Result<T, MetricError>;

/// Metric-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error(transparent)]
    Graph(#[from] gpga_core::Error),

    #[error("Unsupported metric: {0}")]
    UnsupportedMetric(String),

    #[error("Corpus mismatch: {predicted} predicted sentences, {gold} gold sentences")]
    CorpusMismatch { predicted: usize, gold: usize },
}

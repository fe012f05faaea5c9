//! Error types for montestat.

use thiserror::Error;

/// Result type alias for montestat operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error types for the forecast statistics engine.
///
/// Every failure is detected synchronously before or during a computation
/// and propagates to the caller; nothing here is retried or fatal to the
/// process, and a failed request never touches the shared dataset.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Weight vector is unusable: wrong length, negative entries, or a
    /// surviving-weight sum of zero after category filtering.
    #[error("Invalid weights: {message}")]
    InvalidWeights { message: String },

    /// Category filter is contradictory or eliminates every asset.
    #[error("Invalid category filter: {message}")]
    InvalidCategoryFilter { message: String },

    /// Out-of-range scalar parameter (confidence level, percentile, ...).
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A statistic is mathematically undefined for the given inputs,
    /// e.g. a zero-volatility denominator in a Sharpe ratio.
    #[error("Degenerate distribution: {message}")]
    DegenerateDistribution { message: String },

    /// Array dimensions do not line up.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl ForecastError {
    /// Create an invalid weights error.
    pub fn invalid_weights(message: impl Into<String>) -> Self {
        Self::InvalidWeights {
            message: message.into(),
        }
    }

    /// Create an invalid category filter error.
    pub fn invalid_category_filter(message: impl Into<String>) -> Self {
        Self::InvalidCategoryFilter {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a degenerate distribution error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateDistribution {
            message: message.into(),
        }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }
}

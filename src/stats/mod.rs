//! Risk/return statistics over portfolio return series.
//!
//! All functions are pure: they take a return series (or the cube, for
//! pooled methods) and produce a single aggregated scalar. Per-path scalars
//! are collapsed with an [`Aggregation`] policy.
//!
//! Pooling convention: volatility-like statistics compute a sample standard
//! deviation (ddof = 1) across periods within each path, then aggregate the
//! per-path values across paths. A one-period series has an undefined
//! sample deviation and reports 0.0.

pub mod drawdown;
pub mod returns;
pub mod tail;

pub use drawdown::{drawdown_per_path, maximum_drawdown};
pub use returns::{
    annualised_return, annualised_volatility, cagr_per_path, calmar_ratio, downside_deviation,
    information_ratio, sharpe_ratio, sortino_ratio, tracking_error, volatility_per_path,
};
pub use tail::{conditional_value_at_risk, quantile, value_at_risk};

use crate::core::types::Aggregation;

/// Arithmetic mean; 0.0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1); 0.0 with fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Median of a slice (average of the middle two for even counts).
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Collapse per-path scalars into one reported value.
pub(crate) fn aggregate(values: &[f64], aggregation: Aggregation) -> f64 {
    match aggregation {
        Aggregation::Mean => mean(values),
        Aggregation::Median => median(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_std() {
        assert_relative_eq!(sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.138089935299395, epsilon = 1e-12);
        assert_eq!(sample_std(&[1.0]), 0.0);
        assert_eq!(sample_std(&[]), 0.0);
    }

    #[test]
    fn test_median() {
        assert_relative_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_relative_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_aggregate_dispatch() {
        let values = [1.0, 2.0, 6.0];
        assert_relative_eq!(aggregate(&values, Aggregation::Mean), 3.0);
        assert_relative_eq!(aggregate(&values, Aggregation::Median), 2.0);
    }
}

//! Maximum drawdown over compounded value paths.

use rayon::prelude::*;

use crate::core::types::{Aggregation, ReturnSeries};
use crate::stats::aggregate;

/// Signed maximum drawdown per path (<= 0).
///
/// Each path's cumulative value curve starts at 1.0 (the initial
/// investment), so a loss in the very first period counts as drawdown.
/// The running peak is tracked over that curve and the per-path value is
/// the most negative (value - peak) / peak along the way.
pub fn drawdown_per_path(series: &ReturnSeries) -> Vec<f64> {
    (0..series.paths())
        .into_par_iter()
        .map(|s| {
            let mut value = 1.0;
            let mut peak = 1.0;
            let mut worst: f64 = 0.0;
            for r in series.path_iter(s) {
                value *= 1.0 + r;
                if value > peak {
                    peak = value;
                }
                let drawdown = (value - peak) / peak;
                if drawdown < worst {
                    worst = drawdown;
                }
            }
            worst
        })
        .collect()
}

/// Maximum drawdown aggregated across paths, reported as a positive
/// magnitude for readability. Exactly 0.0 for a series that never declines.
pub fn maximum_drawdown(series: &ReturnSeries, aggregation: Aggregation) -> f64 {
    -aggregate(&drawdown_per_path(series), aggregation)
}

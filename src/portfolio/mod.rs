//! Portfolio construction: weight vector + rebalancing policy -> return series.

use rayon::prelude::*;
use tracing::debug;

use crate::core::error::{ForecastError, Result};
use crate::core::types::{PortfolioSpec, Rebalance, ReturnSeries};
use crate::dataset::SimulationDataset;

/// A constructed portfolio return series plus the weights that produced it.
#[derive(Debug, Clone)]
pub struct ConstructedPortfolio {
    /// Portfolio simple returns, (periods x paths).
    pub returns: ReturnSeries,
    /// Weights after filtering and renormalisation, aligned to the cube.
    pub effective_weights: Vec<f64>,
    /// Number of assets with non-zero weight after filtering.
    pub n_assets_used: usize,
}

/// Turns a weight vector and rebalancing policy into a portfolio-level
/// return series per simulated path.
///
/// The constructor introduces no randomness of its own; output is fully
/// determined by the cube and the request.
#[derive(Debug, Clone, Copy)]
pub struct PortfolioConstructor<'a> {
    dataset: &'a SimulationDataset,
}

impl<'a> PortfolioConstructor<'a> {
    /// Create a constructor over a dataset.
    pub fn new(dataset: &'a SimulationDataset) -> Self {
        Self { dataset }
    }

    /// Build the portfolio return series for a request.
    pub fn build_returns(&self, spec: &PortfolioSpec) -> Result<ConstructedPortfolio> {
        let weights = self.resolve_weights(&spec.weights, spec)?;
        let n_assets_used = weights.iter().filter(|&&w| w > 0.0).count();

        let returns = match spec.rebalance {
            Rebalance::Periodic => self.periodic_returns(&weights),
            Rebalance::None => self.buy_and_hold_returns(&weights),
        };

        debug!(
            rebalance = ?spec.rebalance,
            n_assets_used,
            periods = returns.periods(),
            paths = returns.paths(),
            "portfolio return series built"
        );

        Ok(ConstructedPortfolio {
            returns,
            effective_weights: weights,
            n_assets_used,
        })
    }

    /// Build a benchmark return series: periodic rebalancing, no filter.
    pub fn build_benchmark_returns(&self, benchmark_weights: &[f64]) -> Result<ReturnSeries> {
        let spec = PortfolioSpec::new(benchmark_weights.to_vec());
        let weights = self.resolve_weights(benchmark_weights, &spec)?;
        Ok(self.periodic_returns(&weights))
    }

    /// Validate raw weights, apply the category filter, and renormalise the
    /// surviving weights to sum to 1.0.
    fn resolve_weights(&self, raw: &[f64], spec: &PortfolioSpec) -> Result<Vec<f64>> {
        let n_assets = self.dataset.n_assets();
        if raw.len() != n_assets {
            return Err(ForecastError::invalid_weights(format!(
                "expected {} weights, got {}",
                n_assets,
                raw.len()
            )));
        }
        if let Some(bad) = raw.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ForecastError::invalid_weights(format!(
                "weights must be finite and non-negative, got {bad}"
            )));
        }

        let mut weights = raw.to_vec();
        if let Some(filter) = spec.filter.as_ref().filter(|f| !f.is_empty()) {
            let selected = self.dataset.filter_assets(filter)?;
            let mut keep = vec![false; n_assets];
            for idx in selected {
                keep[idx] = true;
            }
            for (w, keep) in weights.iter_mut().zip(keep) {
                if !keep {
                    *w = 0.0;
                }
            }
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(ForecastError::invalid_weights(
                "surviving weights sum to zero after filtering",
            ));
        }
        for w in &mut weights {
            *w /= total;
        }
        Ok(weights)
    }

    /// Periodic rebalancing: the target weights are re-applied every period,
    /// so the portfolio return is a fixed dot product per (period, path).
    fn periodic_returns(&self, weights: &[f64]) -> ReturnSeries {
        let cube = self.dataset.cube();
        let (periods, paths) = (cube.periods(), cube.paths());
        let active: Vec<(usize, f64)> = weights
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(a, &w)| (a, w))
            .collect();

        let mut series = ReturnSeries::zeros(periods, paths);
        for t in 0..periods {
            for &(asset, weight) in &active {
                let asset_returns = cube.path_slice(asset, t);
                for s in 0..paths {
                    *series.get_mut(t, s) += weight * asset_returns[s];
                }
            }
        }
        series
    }

    /// Buy-and-hold: per-asset relative values are seeded at the target
    /// weights at period 0 and then compound independently, so effective
    /// weights drift with relative performance. Each path is independent.
    fn buy_and_hold_returns(&self, weights: &[f64]) -> ReturnSeries {
        let cube = self.dataset.cube();
        let (periods, paths) = (cube.periods(), cube.paths());
        let active: Vec<(usize, f64)> = weights
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(a, &w)| (a, w))
            .collect();

        let columns: Vec<Vec<f64>> = (0..paths)
            .into_par_iter()
            .map(|s| {
                let mut values: Vec<f64> = active.iter().map(|&(_, w)| w).collect();
                let mut previous_total: f64 = 1.0;
                let mut column = Vec::with_capacity(periods);
                for t in 0..periods {
                    for (value, &(asset, _)) in values.iter_mut().zip(&active) {
                        *value *= 1.0 + cube.get(asset, t, s);
                    }
                    let total: f64 = values.iter().sum();
                    let period_return = if previous_total.abs() < f64::EPSILON {
                        0.0
                    } else {
                        total / previous_total - 1.0
                    };
                    column.push(period_return);
                    previous_total = total;
                }
                column
            })
            .collect();

        let mut series = ReturnSeries::zeros(periods, paths);
        for (s, column) in columns.iter().enumerate() {
            for (t, &value) in column.iter().enumerate() {
                *series.get_mut(t, s) = value;
            }
        }
        series
    }
}

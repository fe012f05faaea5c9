//! Core data types for montestat.

use serde::{Deserialize, Serialize};

use crate::core::error::{ForecastError, Result};

/// Rebalancing policy applied when constructing portfolio returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rebalance {
    /// Re-apply target weights every period.
    Periodic,
    /// Buy-and-hold: weights are applied once and drift with performance.
    None,
}

impl Default for Rebalance {
    fn default() -> Self {
        Rebalance::Periodic
    }
}

/// Aggregation method for collapsing a per-path scalar into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Median,
}

impl Default for Aggregation {
    fn default() -> Self {
        Aggregation::Mean
    }
}

/// Sampling convention for Value-at-Risk and Conditional VaR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarMethod {
    /// Every (period, path) observation is one sample of one-period returns.
    Pooled,
    /// Only the terminal multi-period compounded return per path is sampled.
    Cumulative,
}

impl Default for VarMethod {
    fn default() -> Self {
        VarMethod::Pooled
    }
}

/// Slicing convention for the asset correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationMethod {
    /// One matrix from all (period, path) observations flattened per asset.
    Pooled,
    /// One matrix per period across paths, Fisher z-averaged over periods.
    PerPeriod,
    /// One matrix per path across periods, Fisher z-averaged over paths.
    PerPath,
}

impl Default for CorrelationMethod {
    fn default() -> Self {
        CorrelationMethod::Pooled
    }
}

/// Category filter restricting a computation to a subset of assets.
///
/// Empty `include` means "all categories"; `exclude` is subtracted
/// afterwards. The two sets must not overlap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl CategoryFilter {
    /// Filter that includes the listed categories only.
    pub fn include(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            include: categories.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Filter that excludes the listed categories.
    pub fn exclude(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            include: Vec::new(),
            exclude: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the filter imposes no constraint.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Portfolio definition for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSpec {
    /// One weight per asset, each >= 0. Renormalised to sum to 1 over the
    /// assets that survive filtering.
    pub weights: Vec<f64>,
    /// Rebalancing policy.
    #[serde(default)]
    pub rebalance: Rebalance,
    /// Optional category filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<CategoryFilter>,
}

impl PortfolioSpec {
    /// Create a periodic-rebalancing spec without a filter.
    pub fn new(weights: Vec<f64>) -> Self {
        Self {
            weights,
            rebalance: Rebalance::Periodic,
            filter: None,
        }
    }

    /// Set the rebalancing policy.
    pub fn with_rebalance(mut self, rebalance: Rebalance) -> Self {
        self.rebalance = rebalance;
        self
    }

    /// Set the category filter.
    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Shared scalar parameters for annualised statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatParams {
    /// Annualisation convention; the cube is nominally annual (1.0).
    pub periods_per_year: f64,
    /// How per-path scalars are collapsed into the reported value.
    pub aggregation: Aggregation,
}

impl Default for StatParams {
    fn default() -> Self {
        Self {
            periods_per_year: 1.0,
            aggregation: Aggregation::Mean,
        }
    }
}

impl StatParams {
    /// Validate `periods_per_year`.
    pub fn validate(&self) -> Result<()> {
        if !self.periods_per_year.is_finite() || self.periods_per_year <= 0.0 {
            return Err(ForecastError::invalid_parameter(format!(
                "periods_per_year must be a positive finite number, got {}",
                self.periods_per_year
            )));
        }
        Ok(())
    }
}

/// Parameters echoed back in a [`StatisticReport`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct EchoedParams {
    pub weights: Vec<f64>,
    pub rebalance: Rebalance,
    pub aggregation: Aggregation,
    pub periods_per_year: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_acceptable_return: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_method: Option<VarMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_weights: Option<Vec<f64>>,
}

/// Result of a single statistic computation, with enough metadata for a
/// caller to build a response or render a chart without interpretation.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticReport {
    /// The aggregated statistic value.
    pub value: f64,
    /// Human-readable description of the method used.
    pub method: String,
    /// Echo of the parameters that produced the value.
    pub params: EchoedParams,
    /// Number of assets with non-zero weight after filtering.
    pub n_assets_used: usize,
    /// Number of time periods in the cube.
    pub periods: usize,
    /// Number of simulated paths in the cube.
    pub paths: usize,
}

/// Portfolio-level return series: a (periods x paths) matrix of simple
/// returns, one row per period.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    periods: usize,
    paths: usize,
    data: Vec<f64>,
}

impl ReturnSeries {
    /// Create a series from flat period-major data.
    pub fn new(periods: usize, paths: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != periods * paths {
            return Err(ForecastError::shape_mismatch(periods * paths, data.len()));
        }
        Ok(Self {
            periods,
            paths,
            data,
        })
    }

    /// Allocate a zero-filled series.
    pub fn zeros(periods: usize, paths: usize) -> Self {
        Self {
            periods,
            paths,
            data: vec![0.0; periods * paths],
        }
    }

    /// Number of time periods.
    #[inline]
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Number of simulated paths.
    #[inline]
    pub fn paths(&self) -> usize {
        self.paths
    }

    /// Return at (period, path).
    #[inline]
    pub fn get(&self, period: usize, path: usize) -> f64 {
        self.data[period * self.paths + path]
    }

    /// Mutable return at (period, path).
    #[inline]
    pub fn get_mut(&mut self, period: usize, path: usize) -> &mut f64 {
        &mut self.data[period * self.paths + path]
    }

    /// All paths' returns for one period.
    #[inline]
    pub fn period_slice(&self, period: usize) -> &[f64] {
        &self.data[period * self.paths..(period + 1) * self.paths]
    }

    /// One path's returns across all periods.
    pub fn path_iter(&self, path: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.periods).map(move |t| self.get(t, path))
    }

    /// Flat view of every (period, path) observation.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

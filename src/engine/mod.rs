//! Request-level facade tying the dataset, portfolio constructor, and
//! statistics together.
//!
//! One engine wraps one immutable dataset for the process lifetime; every
//! method is `&self`, allocates only request-local state, and can run
//! concurrently with any other request.

use serde::Serialize;

use crate::assets::{self, AssetMetric};
use crate::core::error::Result;
use crate::core::types::{
    Aggregation, CategoryFilter, CorrelationMethod, EchoedParams, PortfolioSpec, StatParams,
    StatisticReport, VarMethod,
};
use crate::dataset::{AssetInfo, SimulationDataset};
use crate::portfolio::{ConstructedPortfolio, PortfolioConstructor};
use crate::projection::{self, ProjectionPoint};
use crate::stats;

/// Percentile-banded projection of portfolio value plus request metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub points: Vec<ProjectionPoint>,
    pub initial_value: f64,
    pub percentiles: Vec<f64>,
    pub n_assets_used: usize,
    pub periods: usize,
    pub paths: usize,
}

/// Per-asset metrics table and correlation matrix plus request metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AssetMetricsReport {
    pub metrics: Vec<AssetMetric>,
    /// Symmetric matrix with unit diagonal; row order follows `metrics`.
    pub correlation: Vec<Vec<f64>>,
    pub correlation_method: CorrelationMethod,
    pub n_assets_used: usize,
    pub periods: usize,
    pub paths: usize,
}

/// Forecast statistics engine over a single simulation dataset.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    dataset: SimulationDataset,
}

impl ForecastEngine {
    /// Create an engine over a dataset.
    pub fn new(dataset: SimulationDataset) -> Self {
        Self { dataset }
    }

    /// The underlying dataset.
    #[inline]
    pub fn dataset(&self) -> &SimulationDataset {
        &self.dataset
    }

    /// Asset listing sorted by name, with categories.
    pub fn assets(&self) -> Vec<AssetInfo> {
        self.dataset.assets()
    }

    fn build(&self, spec: &PortfolioSpec) -> Result<ConstructedPortfolio> {
        PortfolioConstructor::new(&self.dataset).build_returns(spec)
    }

    fn echoed(&self, spec: &PortfolioSpec, params: &StatParams) -> EchoedParams {
        let filter = spec.filter.as_ref();
        EchoedParams {
            weights: spec.weights.clone(),
            rebalance: spec.rebalance,
            aggregation: params.aggregation,
            periods_per_year: params.periods_per_year,
            include_categories: filter
                .map(|f| f.include.clone())
                .filter(|v| !v.is_empty()),
            exclude_categories: filter
                .map(|f| f.exclude.clone())
                .filter(|v| !v.is_empty()),
            ..EchoedParams::default()
        }
    }

    fn report(
        &self,
        value: f64,
        method: impl Into<String>,
        params: EchoedParams,
        n_assets_used: usize,
    ) -> StatisticReport {
        StatisticReport {
            value,
            method: method.into(),
            params,
            n_assets_used,
            periods: self.dataset.cube().periods(),
            paths: self.dataset.cube().paths(),
        }
    }

    /// Annualised return (aggregated per-path CAGR).
    pub fn annualised_return(
        &self,
        spec: &PortfolioSpec,
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let value =
            stats::annualised_return(&built.returns, params.periods_per_year, params.aggregation);
        Ok(self.report(
            value,
            "Compound Annual Growth Rate (CAGR)",
            self.echoed(spec, params),
            built.n_assets_used,
        ))
    }

    /// Annualised volatility (per-path sample std, aggregated).
    pub fn annualised_volatility(
        &self,
        spec: &PortfolioSpec,
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let value = stats::annualised_volatility(
            &built.returns,
            params.periods_per_year,
            params.aggregation,
        );
        Ok(self.report(
            value,
            "Sample Standard Deviation Annualised",
            self.echoed(spec, params),
            built.n_assets_used,
        ))
    }

    /// Sharpe ratio; fails on zero volatility.
    pub fn sharpe_ratio(
        &self,
        spec: &PortfolioSpec,
        risk_free_rate: f64,
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let value = stats::sharpe_ratio(
            &built.returns,
            risk_free_rate,
            params.periods_per_year,
            params.aggregation,
        )?;
        let mut echoed = self.echoed(spec, params);
        echoed.risk_free_rate = Some(risk_free_rate);
        Ok(self.report(
            value,
            "Sharpe Ratio: (Return - RFR) / Volatility",
            echoed,
            built.n_assets_used,
        ))
    }

    /// Annualised tracking error against a benchmark weight vector.
    ///
    /// The benchmark is constructed with periodic rebalancing and no filter.
    pub fn tracking_error(
        &self,
        spec: &PortfolioSpec,
        benchmark_weights: &[f64],
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let benchmark =
            PortfolioConstructor::new(&self.dataset).build_benchmark_returns(benchmark_weights)?;
        let value = stats::tracking_error(
            &built.returns,
            &benchmark,
            params.periods_per_year,
            params.aggregation,
        )?;
        let mut echoed = self.echoed(spec, params);
        echoed.benchmark_weights = Some(benchmark_weights.to_vec());
        Ok(self.report(
            value,
            "Standard Deviation of Excess Returns",
            echoed,
            built.n_assets_used,
        ))
    }

    /// Annualised downside deviation below a minimum acceptable return.
    pub fn downside_deviation(
        &self,
        spec: &PortfolioSpec,
        minimum_acceptable_return: f64,
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let value = stats::downside_deviation(
            &built.returns,
            minimum_acceptable_return,
            params.periods_per_year,
            params.aggregation,
        );
        let mut echoed = self.echoed(spec, params);
        echoed.minimum_acceptable_return = Some(minimum_acceptable_return);
        Ok(self.report(
            value,
            "Root Mean Square of Downside Returns",
            echoed,
            built.n_assets_used,
        ))
    }

    /// Value at Risk at the given confidence level.
    pub fn value_at_risk(
        &self,
        spec: &PortfolioSpec,
        confidence: f64,
        var_method: VarMethod,
    ) -> Result<StatisticReport> {
        let built = self.build(spec)?;
        let value = stats::value_at_risk(&built.returns, confidence, var_method)?;
        let mut echoed = self.echoed(spec, &StatParams::default());
        echoed.confidence = Some(confidence);
        echoed.var_method = Some(var_method);
        Ok(self.report(
            value,
            format!("Value at Risk ({:.0}% confidence)", confidence * 100.0),
            echoed,
            built.n_assets_used,
        ))
    }

    /// Conditional Value at Risk at the given confidence level.
    pub fn conditional_value_at_risk(
        &self,
        spec: &PortfolioSpec,
        confidence: f64,
        var_method: VarMethod,
    ) -> Result<StatisticReport> {
        let built = self.build(spec)?;
        let value = stats::conditional_value_at_risk(&built.returns, confidence, var_method)?;
        let mut echoed = self.echoed(spec, &StatParams::default());
        echoed.confidence = Some(confidence);
        echoed.var_method = Some(var_method);
        Ok(self.report(
            value,
            format!(
                "Conditional Value at Risk ({:.0}% confidence)",
                confidence * 100.0
            ),
            echoed,
            built.n_assets_used,
        ))
    }

    /// Maximum drawdown, reported as a positive magnitude.
    pub fn maximum_drawdown(
        &self,
        spec: &PortfolioSpec,
        aggregation: Aggregation,
    ) -> Result<StatisticReport> {
        let built = self.build(spec)?;
        let value = stats::maximum_drawdown(&built.returns, aggregation);
        let params = StatParams {
            periods_per_year: 1.0,
            aggregation,
        };
        Ok(self.report(
            value,
            "Peak-to-Trough Maximum Decline",
            self.echoed(spec, &params),
            built.n_assets_used,
        ))
    }

    /// Sortino ratio; fails on zero downside deviation.
    pub fn sortino_ratio(
        &self,
        spec: &PortfolioSpec,
        risk_free_rate: f64,
        minimum_acceptable_return: f64,
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let value = stats::sortino_ratio(
            &built.returns,
            risk_free_rate,
            minimum_acceptable_return,
            params.periods_per_year,
            params.aggregation,
        )?;
        let mut echoed = self.echoed(spec, params);
        echoed.risk_free_rate = Some(risk_free_rate);
        echoed.minimum_acceptable_return = Some(minimum_acceptable_return);
        Ok(self.report(
            value,
            "Sortino Ratio: (Return - RFR) / Downside Deviation",
            echoed,
            built.n_assets_used,
        ))
    }

    /// Information ratio against a benchmark; fails on zero tracking error.
    pub fn information_ratio(
        &self,
        spec: &PortfolioSpec,
        benchmark_weights: &[f64],
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let benchmark =
            PortfolioConstructor::new(&self.dataset).build_benchmark_returns(benchmark_weights)?;
        let value = stats::information_ratio(
            &built.returns,
            &benchmark,
            params.periods_per_year,
            params.aggregation,
        )?;
        let mut echoed = self.echoed(spec, params);
        echoed.benchmark_weights = Some(benchmark_weights.to_vec());
        Ok(self.report(
            value,
            "Information Ratio: Excess Return / Tracking Error",
            echoed,
            built.n_assets_used,
        ))
    }

    /// Calmar ratio; fails on zero maximum drawdown.
    pub fn calmar_ratio(
        &self,
        spec: &PortfolioSpec,
        risk_free_rate: f64,
        params: &StatParams,
    ) -> Result<StatisticReport> {
        params.validate()?;
        let built = self.build(spec)?;
        let value = stats::calmar_ratio(
            &built.returns,
            risk_free_rate,
            params.periods_per_year,
            params.aggregation,
        )?;
        let mut echoed = self.echoed(spec, params);
        echoed.risk_free_rate = Some(risk_free_rate);
        Ok(self.report(
            value,
            "Calmar Ratio: (Return - RFR) / |Max Drawdown|",
            echoed,
            built.n_assets_used,
        ))
    }

    /// Percentile-banded projection of portfolio value over time.
    pub fn project(
        &self,
        spec: &PortfolioSpec,
        initial_value: f64,
        percentiles: &[f64],
    ) -> Result<ProjectionReport> {
        let built = self.build(spec)?;
        let points = projection::project(&built.returns, initial_value, percentiles)?;
        Ok(ProjectionReport {
            points,
            initial_value,
            percentiles: percentiles.to_vec(),
            n_assets_used: built.n_assets_used,
            periods: self.dataset.cube().periods(),
            paths: self.dataset.cube().paths(),
        })
    }

    /// Per-asset metrics and correlation matrix for the filtered assets.
    pub fn asset_metrics(
        &self,
        filter: Option<&CategoryFilter>,
        correlation_method: CorrelationMethod,
        params: &StatParams,
    ) -> Result<AssetMetricsReport> {
        params.validate()?;
        let selected = match filter.filter(|f| !f.is_empty()) {
            Some(filter) => self.dataset.filter_assets(filter)?,
            None => (0..self.dataset.n_assets()).collect(),
        };
        let metrics = assets::asset_metrics(
            &self.dataset,
            &selected,
            params.periods_per_year,
            params.aggregation,
        )?;
        let correlation =
            assets::correlation_matrix(self.dataset.cube(), &selected, correlation_method);
        Ok(AssetMetricsReport {
            metrics,
            correlation,
            correlation_method,
            n_assets_used: selected.len(),
            periods: self.dataset.cube().periods(),
            paths: self.dataset.cube().paths(),
        })
    }
}

//! montestat - forecast risk/return statistics over Monte Carlo return cubes.
//!
//! This crate turns a precomputed simulation of asset-class returns
//! (assets x periods x paths), a portfolio weight vector, and a
//! rebalancing/aggregation policy into numerically well-defined risk and
//! return figures:
//! - Portfolio construction with periodic or buy-and-hold rebalancing and
//!   category-filter renormalisation
//! - Annualised return/volatility, Sharpe/Sortino/Calmar/information ratios,
//!   tracking error, downside deviation, VaR/CVaR, maximum drawdown
//! - Percentile-banded projection of portfolio value over time
//! - Per-asset metrics and Fisher-averaged correlation matrices
//!
//! The dataset is loaded once and is read-only afterwards; every request is
//! stateless against it and safe to run concurrently.

pub mod assets;
pub mod core;
pub mod dataset;
pub mod engine;
pub mod portfolio;
pub mod projection;
pub mod stats;

pub use crate::core::error::{ForecastError, Result};
pub use crate::core::types::{
    Aggregation, CategoryFilter, CorrelationMethod, PortfolioSpec, Rebalance, ReturnSeries,
    StatParams, StatisticReport, VarMethod,
};
pub use crate::dataset::{ReturnCube, SimulationDataset};
pub use crate::engine::{AssetMetricsReport, ForecastEngine, ProjectionReport};
pub use crate::portfolio::PortfolioConstructor;

//! Return, volatility, and ratio statistics.

use rayon::prelude::*;

use crate::core::error::{ForecastError, Result};
use crate::core::types::{Aggregation, ReturnSeries};
use crate::stats::{aggregate, sample_std};

/// Compound annual growth rate per path.
///
/// CAGR = (prod(1 + r_t))^(1 / years) - 1, with years = T / periods_per_year.
/// A path whose compounded value hits zero or below reports -1.0 (total loss).
pub fn cagr_per_path(series: &ReturnSeries, periods_per_year: f64) -> Vec<f64> {
    let years = series.periods() as f64 / periods_per_year;
    (0..series.paths())
        .into_par_iter()
        .map(|s| {
            let terminal: f64 = series.path_iter(s).map(|r| 1.0 + r).product();
            terminal.max(0.0).powf(1.0 / years) - 1.0
        })
        .collect()
}

/// Annualised return: per-path CAGR aggregated across paths.
pub fn annualised_return(
    series: &ReturnSeries,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> f64 {
    aggregate(&cagr_per_path(series, periods_per_year), aggregation)
}

/// Unannualised per-path sample standard deviation of period returns.
pub fn volatility_per_path(series: &ReturnSeries) -> Vec<f64> {
    (0..series.paths())
        .into_par_iter()
        .map(|s| {
            let path: Vec<f64> = series.path_iter(s).collect();
            sample_std(&path)
        })
        .collect()
}

/// Annualised volatility: per-path sample std of period returns, scaled by
/// sqrt(periods_per_year), aggregated across paths.
///
/// A one-period series reports 0.0.
pub fn annualised_volatility(
    series: &ReturnSeries,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> f64 {
    let scale = periods_per_year.sqrt();
    let vols: Vec<f64> = volatility_per_path(series)
        .into_iter()
        .map(|v| v * scale)
        .collect();
    aggregate(&vols, aggregation)
}

/// Sharpe ratio: (annualised return - risk-free rate) / annualised volatility.
///
/// Fails with [`ForecastError::DegenerateDistribution`] when the volatility
/// is exactly zero; the ratio is undefined there and no sentinel is returned.
pub fn sharpe_ratio(
    series: &ReturnSeries,
    risk_free_rate: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let annual_return = annualised_return(series, periods_per_year, aggregation);
    let annual_vol = annualised_volatility(series, periods_per_year, aggregation);
    if annual_vol == 0.0 {
        return Err(ForecastError::degenerate(
            "Sharpe ratio undefined: annualised volatility is zero",
        ));
    }
    Ok((annual_return - risk_free_rate) / annual_vol)
}

/// Annualised tracking error: per-path sample std of (portfolio - benchmark)
/// period returns, scaled by sqrt(periods_per_year), aggregated across paths.
///
/// The benchmark series must have the identical shape.
pub fn tracking_error(
    series: &ReturnSeries,
    benchmark: &ReturnSeries,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    if series.periods() != benchmark.periods() || series.paths() != benchmark.paths() {
        return Err(ForecastError::shape_mismatch(
            series.periods() * series.paths(),
            benchmark.periods() * benchmark.paths(),
        ));
    }
    let scale = periods_per_year.sqrt();
    let per_path: Vec<f64> = (0..series.paths())
        .into_par_iter()
        .map(|s| {
            let excess: Vec<f64> = series
                .path_iter(s)
                .zip(benchmark.path_iter(s))
                .map(|(p, b)| p - b)
                .collect();
            sample_std(&excess) * scale
        })
        .collect();
    Ok(aggregate(&per_path, aggregation))
}

/// Annualised downside deviation below a minimum acceptable return:
/// sqrt(mean(min(0, r - MAR)^2)) per path, scaled by sqrt(periods_per_year),
/// aggregated across paths.
pub fn downside_deviation(
    series: &ReturnSeries,
    minimum_acceptable_return: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> f64 {
    let scale = periods_per_year.sqrt();
    let per_path: Vec<f64> = (0..series.paths())
        .into_par_iter()
        .map(|s| {
            let sum_sq: f64 = series
                .path_iter(s)
                .map(|r| (r - minimum_acceptable_return).min(0.0).powi(2))
                .sum();
            (sum_sq / series.periods() as f64).sqrt() * scale
        })
        .collect();
    aggregate(&per_path, aggregation)
}

/// Sortino ratio: (annualised return - risk-free rate) / downside deviation.
///
/// Same zero-denominator policy as [`sharpe_ratio`].
pub fn sortino_ratio(
    series: &ReturnSeries,
    risk_free_rate: f64,
    minimum_acceptable_return: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let annual_return = annualised_return(series, periods_per_year, aggregation);
    let downside = downside_deviation(
        series,
        minimum_acceptable_return,
        periods_per_year,
        aggregation,
    );
    if downside == 0.0 {
        return Err(ForecastError::degenerate(
            "Sortino ratio undefined: downside deviation is zero",
        ));
    }
    Ok((annual_return - risk_free_rate) / downside)
}

/// Information ratio: (portfolio CAGR - benchmark CAGR) / tracking error.
///
/// Same zero-denominator policy as [`sharpe_ratio`].
pub fn information_ratio(
    series: &ReturnSeries,
    benchmark: &ReturnSeries,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let excess = annualised_return(series, periods_per_year, aggregation)
        - annualised_return(benchmark, periods_per_year, aggregation);
    let te = tracking_error(series, benchmark, periods_per_year, aggregation)?;
    if te == 0.0 {
        return Err(ForecastError::degenerate(
            "information ratio undefined: tracking error is zero",
        ));
    }
    Ok(excess / te)
}

/// Calmar ratio: (annualised return - risk-free rate) / max drawdown magnitude.
///
/// Same zero-denominator policy as [`sharpe_ratio`].
pub fn calmar_ratio(
    series: &ReturnSeries,
    risk_free_rate: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let annual_return = annualised_return(series, periods_per_year, aggregation);
    let max_dd = crate::stats::drawdown::maximum_drawdown(series, aggregation);
    if max_dd == 0.0 {
        return Err(ForecastError::degenerate(
            "Calmar ratio undefined: maximum drawdown is zero",
        ));
    }
    Ok((annual_return - risk_free_rate) / max_dd)
}

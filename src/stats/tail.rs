//! Tail-risk statistics: Value at Risk and Conditional Value at Risk.

use crate::core::error::{ForecastError, Result};
use crate::core::types::{ReturnSeries, VarMethod};
use crate::stats::mean;

/// Linearly interpolated quantile, matching the numpy default.
///
/// `q` must lie in [0, 1]; the input need not be sorted.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(ForecastError::degenerate("quantile of an empty sample"));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(ForecastError::invalid_parameter(format!(
            "quantile must lie in [0, 1], got {q}"
        )));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let fraction = position - lower as f64;
    Ok(sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction)
}

fn validate_confidence(confidence: f64) -> Result<()> {
    if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
        return Err(ForecastError::invalid_parameter(format!(
            "confidence must lie strictly in (0, 1), got {confidence}"
        )));
    }
    Ok(())
}

/// The sample the selected VaR method draws from: every (period, path)
/// observation for `Pooled`, or one terminal compounded return per path
/// for `Cumulative`.
fn observations(series: &ReturnSeries, method: VarMethod) -> Vec<f64> {
    match method {
        VarMethod::Pooled => series.as_slice().to_vec(),
        VarMethod::Cumulative => (0..series.paths())
            .map(|s| series.path_iter(s).map(|r| 1.0 + r).product::<f64>() - 1.0)
            .collect(),
    }
}

/// Value at Risk at the given confidence level.
///
/// Reported as the (1 - confidence) quantile of the selected sample — a
/// negative number when the tail is a loss.
pub fn value_at_risk(
    series: &ReturnSeries,
    confidence: f64,
    method: VarMethod,
) -> Result<f64> {
    validate_confidence(confidence)?;
    let sample = observations(series, method);
    quantile(&sample, 1.0 - confidence)
}

/// Conditional Value at Risk: the mean of all observations at or below the
/// VaR threshold, using the same sampling as the selected VaR method.
///
/// Degenerates to the VaR value itself when no observation falls below the
/// threshold.
pub fn conditional_value_at_risk(
    series: &ReturnSeries,
    confidence: f64,
    method: VarMethod,
) -> Result<f64> {
    validate_confidence(confidence)?;
    let sample = observations(series, method);
    let threshold = quantile(&sample, 1.0 - confidence)?;

    let tail: Vec<f64> = sample.into_iter().filter(|&r| r <= threshold).collect();
    if tail.is_empty() {
        return Ok(threshold);
    }
    Ok(mean(&tail))
}

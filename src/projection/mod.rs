//! Percentile-banded projection of portfolio value over time.

use rayon::prelude::*;
use serde::Serialize;

use crate::core::error::{ForecastError, Result};
use crate::core::types::ReturnSeries;
use crate::stats::quantile;

/// One percentile band's value at a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileBand {
    /// Percentile in [0, 100].
    pub percentile: f64,
    /// Portfolio value at this percentile across paths.
    pub value: f64,
}

/// Percentile values at one period, from 0 (the initial value) to T.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub period: usize,
    pub bands: Vec<PercentileBand>,
}

/// Compound a return series into cumulative value paths and extract the
/// requested percentiles at every period.
///
/// Period 0 is fixed at `initial_value` for every percentile; period t
/// holds the percentiles of `initial_value * prod_{u<=t}(1 + r_u)` across
/// paths. Recomputing with identical inputs yields identical output.
pub fn project(
    series: &ReturnSeries,
    initial_value: f64,
    percentiles: &[f64],
) -> Result<Vec<ProjectionPoint>> {
    if !initial_value.is_finite() || initial_value <= 0.0 {
        return Err(ForecastError::invalid_parameter(format!(
            "initial_value must be a positive finite number, got {initial_value}"
        )));
    }
    if percentiles.is_empty() {
        return Err(ForecastError::invalid_parameter(
            "at least one percentile is required",
        ));
    }
    if let Some(bad) = percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(ForecastError::invalid_parameter(format!(
            "percentiles must lie in [0, 100], got {bad}"
        )));
    }

    let (periods, paths) = (series.periods(), series.paths());

    // Cumulative value per path, one column per path.
    let columns: Vec<Vec<f64>> = (0..paths)
        .into_par_iter()
        .map(|s| {
            let mut value = initial_value;
            series
                .path_iter(s)
                .map(|r| {
                    value *= 1.0 + r;
                    value
                })
                .collect()
        })
        .collect();

    let mut points = Vec::with_capacity(periods + 1);
    points.push(ProjectionPoint {
        period: 0,
        bands: percentiles
            .iter()
            .map(|&p| PercentileBand {
                percentile: p,
                value: initial_value,
            })
            .collect(),
    });

    for t in 0..periods {
        let cross_section: Vec<f64> = columns.iter().map(|column| column[t]).collect();
        let bands = percentiles
            .iter()
            .map(|&p| {
                Ok(PercentileBand {
                    percentile: p,
                    value: quantile(&cross_section, p / 100.0)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        points.push(ProjectionPoint {
            period: t + 1,
            bands,
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_series() -> ReturnSeries {
        ReturnSeries::new(2, 4, vec![0.1, 0.0, -0.1, 0.2, 0.05, 0.05, 0.05, 0.05]).unwrap()
    }

    #[test]
    fn test_period_zero_is_initial_value() {
        let points = project(&sample_series(), 1000.0, &[5.0, 50.0, 95.0]).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].period, 0);
        for band in &points[0].bands {
            assert_relative_eq!(band.value, 1000.0);
        }
    }

    #[test]
    fn test_monotone_period_index() {
        let points = project(&sample_series(), 1.0, &[50.0]).unwrap();
        let periods: Vec<usize> = points.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![0, 1, 2]);
    }

    #[test]
    fn test_scale_invariance() {
        // Dividing by the initial value reproduces the cumulative path
        // regardless of the initial value used.
        let series = sample_series();
        let a = project(&series, 1.0, &[25.0, 75.0]).unwrap();
        let b = project(&series, 12_345.0, &[25.0, 75.0]).unwrap();
        for (pa, pb) in a.iter().zip(&b) {
            for (ba, bb) in pa.bands.iter().zip(&pb.bands) {
                assert_relative_eq!(ba.value, bb.value / 12_345.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_bands_ordered_with_percentile() {
        let points = project(&sample_series(), 1.0, &[5.0, 50.0, 95.0]).unwrap();
        for point in &points {
            assert!(point.bands[0].value <= point.bands[1].value);
            assert!(point.bands[1].value <= point.bands[2].value);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let series = sample_series();
        assert!(project(&series, 0.0, &[50.0]).is_err());
        assert!(project(&series, f64::NAN, &[50.0]).is_err());
        assert!(project(&series, 1.0, &[]).is_err());
        assert!(project(&series, 1.0, &[101.0]).is_err());
    }
}

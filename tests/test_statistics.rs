//! Integration tests for the statistics and projection engines.

use approx::assert_relative_eq;
use montestat::{
    Aggregation, ForecastEngine, PortfolioSpec, ReturnCube, SimulationDataset, StatParams,
    VarMethod,
};

/// Single-asset dataset wrapping an explicit (periods x paths) grid, so a
/// 100% weight portfolio reproduces it exactly.
fn dataset_from_grid(grid: Vec<Vec<f64>>) -> SimulationDataset {
    let cube = ReturnCube::from_nested(vec![grid]).unwrap();
    SimulationDataset::new(cube, vec!["Only".into()], vec!["equity".into()]).unwrap()
}

/// Varied multi-path dataset with both gains and losses.
fn noisy_dataset(periods: usize, paths: usize) -> SimulationDataset {
    let grid: Vec<Vec<f64>> = (0..periods)
        .map(|t| {
            (0..paths)
                .map(|s| {
                    let x = (t * 13 + s * 5) as f64;
                    0.03 + 0.12 * (x * 0.61).sin() - 0.02 * (x * 1.27).cos()
                })
                .collect()
        })
        .collect();
    dataset_from_grid(grid)
}

fn full_weight_spec() -> PortfolioSpec {
    PortfolioSpec::new(vec![1.0])
}

#[test]
fn test_max_drawdown_reported_magnitude_is_non_negative() {
    let engine = ForecastEngine::new(noisy_dataset(12, 24));
    let report = engine
        .maximum_drawdown(&full_weight_spec(), Aggregation::Mean)
        .unwrap();
    assert!(report.value >= 0.0);
}

#[test]
fn test_max_drawdown_zero_for_non_negative_returns() {
    let engine = ForecastEngine::new(dataset_from_grid(vec![
        vec![0.1, 0.0, 0.05],
        vec![0.0, 0.2, 0.0],
        vec![0.03, 0.01, 0.07],
    ]));
    let report = engine
        .maximum_drawdown(&full_weight_spec(), Aggregation::Mean)
        .unwrap();
    assert_relative_eq!(report.value, 0.0);
}

#[test]
fn test_cvar_loss_magnitude_at_least_var() {
    let engine = ForecastEngine::new(noisy_dataset(10, 50));
    for method in [VarMethod::Pooled, VarMethod::Cumulative] {
        let var = engine
            .value_at_risk(&full_weight_spec(), 0.95, method)
            .unwrap();
        let cvar = engine
            .conditional_value_at_risk(&full_weight_spec(), 0.95, method)
            .unwrap();
        // CVaR averages the tail including the VaR point, so its loss
        // magnitude is at least as large.
        assert!(
            cvar.value <= var.value,
            "{method:?}: CVaR {} vs VaR {}",
            cvar.value,
            var.value
        );
    }
}

#[test]
fn test_var_confidence_must_be_strictly_inside_unit_interval() {
    let engine = ForecastEngine::new(noisy_dataset(4, 8));
    for bad in [0.0, 1.0, 1.5, -0.1] {
        assert!(engine
            .value_at_risk(&full_weight_spec(), bad, VarMethod::Pooled)
            .is_err());
        assert!(engine
            .conditional_value_at_risk(&full_weight_spec(), bad, VarMethod::Cumulative)
            .is_err());
    }
}

#[test]
fn test_sharpe_fails_on_zero_volatility() {
    // Constant returns on every path and period: volatility is exactly zero.
    let engine = ForecastEngine::new(dataset_from_grid(vec![vec![0.05; 4], vec![0.05; 4]]));
    let result = engine.sharpe_ratio(&full_weight_spec(), 0.0, &StatParams::default());
    assert!(result.is_err());
}

#[test]
fn test_sharpe_value() {
    let engine = ForecastEngine::new(dataset_from_grid(vec![vec![0.0; 2], vec![0.2; 2]]));
    let report = engine
        .sharpe_ratio(&full_weight_spec(), 0.01, &StatParams::default())
        .unwrap();

    let cagr = 1.2f64.sqrt() - 1.0;
    let vol = ((0.0f64 - 0.1).powi(2) + (0.2f64 - 0.1).powi(2)).sqrt(); // ddof = 1
    assert_relative_eq!(report.value, (cagr - 0.01) / vol, epsilon = 1e-12);
}

#[test]
fn test_tracking_error_of_self_is_zero_and_information_ratio_fails() {
    let engine = ForecastEngine::new(noisy_dataset(8, 10));
    let spec = full_weight_spec();

    let te = engine
        .tracking_error(&spec, &[1.0], &StatParams::default())
        .unwrap();
    assert_relative_eq!(te.value, 0.0);

    // Zero tracking error makes the information ratio undefined.
    assert!(engine
        .information_ratio(&spec, &[1.0], &StatParams::default())
        .is_err());
}

#[test]
fn test_downside_deviation_zero_when_above_mar() {
    let engine = ForecastEngine::new(dataset_from_grid(vec![vec![0.05; 3], vec![0.08; 3]]));
    let report = engine
        .downside_deviation(&full_weight_spec(), 0.0, &StatParams::default())
        .unwrap();
    assert_relative_eq!(report.value, 0.0);
}

#[test]
fn test_single_period_series_does_not_crash() {
    let engine = ForecastEngine::new(dataset_from_grid(vec![vec![0.1, -0.1, 0.05, 0.02]]));
    let spec = full_weight_spec();
    let params = StatParams::default();

    // Volatility is defined as 0.0 for one period.
    let vol = engine.annualised_volatility(&spec, &params).unwrap();
    assert_relative_eq!(vol.value, 0.0);

    // Return, drawdown and tail statistics still produce values.
    assert!(engine.annualised_return(&spec, &params).is_ok());
    assert!(engine
        .maximum_drawdown(&spec, Aggregation::Median)
        .is_ok());
    assert!(engine
        .value_at_risk(&spec, 0.75, VarMethod::Pooled)
        .is_ok());
}

#[test]
fn test_projection_scale_invariance() {
    let engine = ForecastEngine::new(noisy_dataset(6, 12));
    let spec = full_weight_spec();
    let percentiles = [1.0, 5.0, 25.0, 50.0, 75.0, 95.0, 99.0];

    let base = engine.project(&spec, 1.0, &percentiles).unwrap();
    let scaled = engine.project(&spec, 250_000.0, &percentiles).unwrap();

    assert_eq!(base.points.len(), 7); // period 0 through 6
    for (a, b) in base.points.iter().zip(&scaled.points) {
        assert_eq!(a.period, b.period);
        for (ba, bb) in a.bands.iter().zip(&b.bands) {
            assert_relative_eq!(ba.value * 250_000.0, bb.value, max_relative = 1e-9);
        }
    }
}

#[test]
fn test_projection_period_zero_pinned_to_initial_value() {
    let engine = ForecastEngine::new(noisy_dataset(5, 9));
    let report = engine
        .project(&full_weight_spec(), 10_000.0, &[5.0, 50.0, 95.0])
        .unwrap();
    for band in &report.points[0].bands {
        assert_relative_eq!(band.value, 10_000.0);
    }
}

#[test]
fn test_calmar_and_sortino_report_methods() {
    let engine = ForecastEngine::new(noisy_dataset(10, 20));
    let spec = full_weight_spec();
    let params = StatParams::default();

    let sortino = engine.sortino_ratio(&spec, 0.0, 0.0, &params).unwrap();
    assert!(sortino.method.contains("Sortino"));

    let calmar = engine.calmar_ratio(&spec, 0.0, &params).unwrap();
    assert!(calmar.method.contains("Calmar"));
    assert!(calmar.value.is_finite());
}

//! Integration tests for per-asset metrics and correlation matrices.

use approx::assert_relative_eq;
use montestat::{
    CategoryFilter, CorrelationMethod, ForecastEngine, PortfolioSpec, ReturnCube,
    SimulationDataset, StatParams,
};

fn synthetic_dataset() -> SimulationDataset {
    let assets = 5;
    let periods = 8;
    let paths = 16;
    let mut nested = Vec::with_capacity(assets);
    for a in 0..assets {
        let mut asset = Vec::with_capacity(periods);
        for t in 0..periods {
            let mut row = Vec::with_capacity(paths);
            for s in 0..paths {
                let x = (a * 17 + t * 3 + s) as f64;
                row.push(0.02 + 0.09 * (x * 0.53).sin() + 0.01 * ((a + 1) as f64 * x * 0.11).cos());
            }
            asset.push(row);
        }
        nested.push(asset);
    }
    SimulationDataset::new(
        ReturnCube::from_nested(nested).unwrap(),
        (0..assets).map(|a| format!("Asset {a}")).collect(),
        vec![
            "equity".into(),
            "equity".into(),
            "bond".into(),
            "bond".into(),
            "cash".into(),
        ],
    )
    .unwrap()
}

#[test]
fn test_correlation_symmetric_unit_diagonal_for_every_method() {
    let engine = ForecastEngine::new(synthetic_dataset());
    for method in [
        CorrelationMethod::Pooled,
        CorrelationMethod::PerPeriod,
        CorrelationMethod::PerPath,
    ] {
        let report = engine
            .asset_metrics(None, method, &StatParams::default())
            .unwrap();
        let matrix = &report.correlation;
        let n = matrix.len();
        assert_eq!(n, 5);
        for i in 0..n {
            assert_relative_eq!(matrix[i][i], 1.0);
            for j in 0..n {
                assert_relative_eq!(matrix[i][j], matrix[j][i]);
                assert!(matrix[i][j].abs() <= 1.0 + 1e-12);
            }
        }
    }
}

#[test]
fn test_asset_metrics_match_unit_weight_portfolio() {
    let ds = synthetic_dataset();
    let engine = ForecastEngine::new(ds);
    let params = StatParams::default();

    let report = engine
        .asset_metrics(None, CorrelationMethod::Pooled, &params)
        .unwrap();

    // Asset 2 as a 100%-weight portfolio must reproduce its table row.
    let spec = PortfolioSpec::new(vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    let portfolio_return = engine.annualised_return(&spec, &params).unwrap();
    let portfolio_vol = engine.annualised_volatility(&spec, &params).unwrap();

    let row = report.metrics.iter().find(|m| m.id == 2).unwrap();
    assert_relative_eq!(row.annualised_return, portfolio_return.value, epsilon = 1e-12);
    assert_relative_eq!(
        row.annualised_volatility,
        portfolio_vol.value,
        epsilon = 1e-12
    );
    assert_eq!(row.category, "bond");
}

#[test]
fn test_category_filter_restricts_metrics_and_matrix() {
    let engine = ForecastEngine::new(synthetic_dataset());
    let filter = CategoryFilter::include(["equity"]);
    let report = engine
        .asset_metrics(Some(&filter), CorrelationMethod::PerPeriod, &StatParams::default())
        .unwrap();

    assert_eq!(report.n_assets_used, 2);
    assert_eq!(report.metrics.len(), 2);
    assert_eq!(report.correlation.len(), 2);
    assert!(report.metrics.iter().all(|m| m.category == "equity"));
}

#[test]
fn test_contradictory_filter_rejected() {
    let engine = ForecastEngine::new(synthetic_dataset());
    let filter = CategoryFilter {
        include: vec!["bond".into()],
        exclude: vec!["bond".into()],
    };
    assert!(engine
        .asset_metrics(Some(&filter), CorrelationMethod::Pooled, &StatParams::default())
        .is_err());
}

#[test]
fn test_asset_listing_sorted() {
    let engine = ForecastEngine::new(synthetic_dataset());
    let assets = engine.assets();
    assert_eq!(assets.len(), 5);
    for pair in assets.windows(2) {
        assert!(pair[0].name <= pair[1].name);
    }
}

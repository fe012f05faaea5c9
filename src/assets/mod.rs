//! Per-asset metrics and the asset correlation matrix.

pub mod correlation;

pub use correlation::correlation_matrix;

use rayon::prelude::*;
use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::{Aggregation, ReturnSeries};
use crate::dataset::SimulationDataset;
use crate::stats;

/// Annualised return and volatility for a single asset, computed as a
/// unit-weight single-asset portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetMetric {
    /// Index on the cube's asset axis.
    pub id: usize,
    pub name: String,
    pub category: String,
    pub annualised_return: f64,
    pub annualised_volatility: f64,
}

/// Per-asset return/volatility table for the selected assets.
///
/// Each asset runs through the portfolio-level return and volatility
/// definitions with a weight of 1.0 on itself.
pub fn asset_metrics(
    dataset: &SimulationDataset,
    selected: &[usize],
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<Vec<AssetMetric>> {
    let cube = dataset.cube();
    selected
        .par_iter()
        .map(|&asset| {
            let mut data = Vec::with_capacity(cube.periods() * cube.paths());
            for t in 0..cube.periods() {
                data.extend_from_slice(cube.path_slice(asset, t));
            }
            let series = ReturnSeries::new(cube.periods(), cube.paths(), data)?;
            Ok(AssetMetric {
                id: asset,
                name: dataset.asset_names()[asset].clone(),
                category: dataset.asset_categories()[asset].clone(),
                annualised_return: stats::annualised_return(
                    &series,
                    periods_per_year,
                    aggregation,
                ),
                annualised_volatility: stats::annualised_volatility(
                    &series,
                    periods_per_year,
                    aggregation,
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ReturnCube;
    use approx::assert_relative_eq;

    fn sample_dataset() -> SimulationDataset {
        let cube = ReturnCube::from_nested(vec![
            vec![vec![0.1, 0.1], vec![0.2, 0.2]],
            vec![vec![0.02, 0.02], vec![0.02, 0.02]],
        ])
        .unwrap();
        SimulationDataset::new(
            cube,
            vec!["Equity".into(), "Cash".into()],
            vec!["equity".into(), "cash".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_asset_metrics_match_single_asset_portfolio() {
        let ds = sample_dataset();
        let metrics = asset_metrics(&ds, &[0, 1], 1.0, Aggregation::Mean).unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].name, "Equity");
        // CAGR of (1.1 * 1.2)^(1/2) - 1 on every path.
        assert_relative_eq!(
            metrics[0].annualised_return,
            (1.1f64 * 1.2).sqrt() - 1.0,
            epsilon = 1e-12
        );
        // Constant 2% per period: zero volatility.
        assert_relative_eq!(metrics[1].annualised_volatility, 0.0);
        assert_relative_eq!(metrics[1].annualised_return, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_selection_restricts_table() {
        let ds = sample_dataset();
        let metrics = asset_metrics(&ds, &[1], 1.0, Aggregation::Mean).unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].id, 1);
    }
}

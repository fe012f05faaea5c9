//! Asset correlation matrices: pooled, per-period, and per-path.

use rayon::prelude::*;

use crate::core::types::CorrelationMethod;
use crate::dataset::ReturnCube;

/// Clamp bound applied before the Fisher z-transform; atanh(±1) is infinite.
const FISHER_CLAMP: f64 = 0.999_999;

/// Pearson correlation of two equal-length samples.
///
/// A zero-variance sample has no defined correlation and contributes 0.0.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if x.is_empty() {
        return 0.0;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Average correlations through the Fisher z-transform: atanh each value,
/// arithmetic-mean the transforms, tanh back. Avoids the bias of averaging
/// bounded coefficients directly.
fn fisher_average(correlations: &[f64]) -> f64 {
    if correlations.is_empty() {
        return 0.0;
    }
    let z_sum: f64 = correlations
        .iter()
        .map(|r| r.clamp(-FISHER_CLAMP, FISHER_CLAMP).atanh())
        .sum();
    (z_sum / correlations.len() as f64).tanh()
}

/// One asset's observations for the pooled method: all (period, path)
/// returns flattened, period-major.
fn pooled_observations(cube: &ReturnCube, asset: usize) -> Vec<f64> {
    let mut flat = Vec::with_capacity(cube.periods() * cube.paths());
    for t in 0..cube.periods() {
        flat.extend_from_slice(cube.path_slice(asset, t));
    }
    flat
}

/// Pairwise correlation for one asset pair under the selected method.
fn pair_correlation(
    cube: &ReturnCube,
    asset_a: usize,
    asset_b: usize,
    method: CorrelationMethod,
) -> f64 {
    match method {
        CorrelationMethod::Pooled => pearson(
            &pooled_observations(cube, asset_a),
            &pooled_observations(cube, asset_b),
        ),
        CorrelationMethod::PerPeriod => {
            let slices: Vec<f64> = (0..cube.periods())
                .map(|t| pearson(cube.path_slice(asset_a, t), cube.path_slice(asset_b, t)))
                .collect();
            fisher_average(&slices)
        }
        CorrelationMethod::PerPath => {
            let slices: Vec<f64> = (0..cube.paths())
                .map(|s| {
                    let a: Vec<f64> = cube.asset_path_iter(asset_a, s).collect();
                    let b: Vec<f64> = cube.asset_path_iter(asset_b, s).collect();
                    pearson(&a, &b)
                })
                .collect();
            fisher_average(&slices)
        }
    }
}

/// Correlation matrix over the selected assets.
///
/// Symmetric with a unit diagonal by construction; off-diagonal entries lie
/// in [-1, 1]. Row/column order follows `selected`.
pub fn correlation_matrix(
    cube: &ReturnCube,
    selected: &[usize],
    method: CorrelationMethod,
) -> Vec<Vec<f64>> {
    let n = selected.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let values: Vec<f64> = pairs
        .par_iter()
        .map(|&(i, j)| pair_correlation(cube, selected[i], selected[j], method))
        .collect();

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
    }
    for (&(i, j), &value) in pairs.iter().zip(&values) {
        matrix[i][j] = value;
        matrix[j][i] = value;
    }
    matrix
}

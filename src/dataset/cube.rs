//! Three-dimensional return cube storage.

use crate::core::error::{ForecastError, Result};

/// Immutable cube of simple period returns, indexed by (asset, period, path).
///
/// Storage is a single flat buffer, asset-major then period-major, so the
/// paths of one (asset, period) cell are contiguous.
#[derive(Debug, Clone)]
pub struct ReturnCube {
    assets: usize,
    periods: usize,
    paths: usize,
    data: Vec<f64>,
}

impl ReturnCube {
    /// Create a cube from flat data with the given shape.
    pub fn new(assets: usize, periods: usize, paths: usize, data: Vec<f64>) -> Result<Self> {
        let expected = assets * periods * paths;
        if data.len() != expected {
            return Err(ForecastError::shape_mismatch(expected, data.len()));
        }
        Ok(Self {
            assets,
            periods,
            paths,
            data,
        })
    }

    /// Create a cube from nested `[asset][period][path]` vectors.
    ///
    /// Every asset must carry the same number of periods, and every period
    /// the same number of paths.
    pub fn from_nested(nested: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let assets = nested.len();
        let periods = nested.first().map_or(0, |a| a.len());
        let paths = nested
            .first()
            .and_then(|a| a.first())
            .map_or(0, |t| t.len());

        let mut data = Vec::with_capacity(assets * periods * paths);
        for asset in &nested {
            if asset.len() != periods {
                return Err(ForecastError::shape_mismatch(periods, asset.len()));
            }
            for period in asset {
                if period.len() != paths {
                    return Err(ForecastError::shape_mismatch(paths, period.len()));
                }
                data.extend_from_slice(period);
            }
        }
        Self::new(assets, periods, paths, data)
    }

    /// Number of assets.
    #[inline]
    pub fn assets(&self) -> usize {
        self.assets
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

    /// Return for (asset, period, path).
    #[inline]
    pub fn get(&self, asset: usize, period: usize, path: usize) -> f64 {
        self.data[(asset * self.periods + period) * self.paths + path]
    }

    /// All paths' returns for one (asset, period) cell.
    #[inline]
    pub fn path_slice(&self, asset: usize, period: usize) -> &[f64] {
        let start = (asset * self.periods + period) * self.paths;
        &self.data[start..start + self.paths]
    }

    /// One asset's returns across all periods for one path.
    pub fn asset_path_iter(&self, asset: usize, path: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.periods).map(move |t| self.get(asset, t, path))
    }
}

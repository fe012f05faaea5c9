//! Simulation dataset: the return cube plus asset metadata.
//!
//! Loaded once at process startup and read-only afterwards; any number of
//! computations may run against it concurrently without locking.

pub mod cube;

pub use cube::ReturnCube;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::core::error::{ForecastError, Result};
use crate::core::types::CategoryFilter;

/// One asset's identity as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetInfo {
    /// Index on the cube's asset axis.
    pub id: usize,
    pub name: String,
    pub category: String,
}

/// Immutable holder of the return cube, asset names, and category map.
#[derive(Debug, Clone)]
pub struct SimulationDataset {
    cube: ReturnCube,
    asset_names: Vec<String>,
    asset_categories: Vec<String>,
}

impl SimulationDataset {
    /// Create a dataset from a cube and aligned metadata.
    ///
    /// Names and categories must match the cube's asset axis length, and
    /// names must be unique.
    pub fn new(
        cube: ReturnCube,
        asset_names: Vec<String>,
        asset_categories: Vec<String>,
    ) -> Result<Self> {
        if asset_names.len() != cube.assets() {
            return Err(ForecastError::shape_mismatch(cube.assets(), asset_names.len()));
        }
        if asset_categories.len() != cube.assets() {
            return Err(ForecastError::shape_mismatch(
                cube.assets(),
                asset_categories.len(),
            ));
        }
        let unique: HashSet<&str> = asset_names.iter().map(String::as_str).collect();
        if unique.len() != asset_names.len() {
            return Err(ForecastError::invalid_parameter(
                "asset names must be unique",
            ));
        }

        debug!(
            assets = cube.assets(),
            periods = cube.periods(),
            paths = cube.paths(),
            "simulation dataset initialised"
        );

        Ok(Self {
            cube,
            asset_names,
            asset_categories,
        })
    }

    /// The return cube.
    #[inline]
    pub fn cube(&self) -> &ReturnCube {
        &self.cube
    }

    /// Ordered asset names, aligned to the cube's asset axis.
    #[inline]
    pub fn asset_names(&self) -> &[String] {
        &self.asset_names
    }

    /// Per-asset category labels, aligned to the cube's asset axis.
    #[inline]
    pub fn asset_categories(&self) -> &[String] {
        &self.asset_categories
    }

    /// Number of assets.
    #[inline]
    pub fn n_assets(&self) -> usize {
        self.cube.assets()
    }

    /// Asset listing sorted alphabetically by name.
    pub fn assets(&self) -> Vec<AssetInfo> {
        let mut assets: Vec<AssetInfo> = self
            .asset_names
            .iter()
            .zip(self.asset_categories.iter())
            .enumerate()
            .map(|(id, (name, category))| AssetInfo {
                id,
                name: name.clone(),
                category: category.clone(),
            })
            .collect();
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        assets
    }

    /// Distinct category labels, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .asset_categories
            .iter()
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();
        categories
    }

    /// Resolve a category filter to the surviving asset indices, sorted.
    ///
    /// An empty `include` list means every category is included; `exclude`
    /// is subtracted afterwards. Fails when include and exclude share a
    /// category, or when no asset survives.
    pub fn filter_assets(&self, filter: &CategoryFilter) -> Result<Vec<usize>> {
        let include: HashSet<&str> = filter.include.iter().map(String::as_str).collect();
        let exclude: HashSet<&str> = filter.exclude.iter().map(String::as_str).collect();

        if let Some(shared) = include.intersection(&exclude).next() {
            return Err(ForecastError::invalid_category_filter(format!(
                "category '{shared}' appears in both include and exclude"
            )));
        }

        let selected: Vec<usize> = self
            .asset_categories
            .iter()
            .enumerate()
            .filter(|(_, category)| {
                let category = category.as_str();
                (include.is_empty() || include.contains(category))
                    && !exclude.contains(category)
            })
            .map(|(i, _)| i)
            .collect();

        if selected.is_empty() {
            return Err(ForecastError::invalid_category_filter(
                "filter eliminates every asset",
            ));
        }
        Ok(selected)
    }
}

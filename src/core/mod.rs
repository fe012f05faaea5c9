//! Core types and utilities for montestat.

pub mod error;
pub mod types;

pub use error::{ForecastError, Result};
pub use types::*;

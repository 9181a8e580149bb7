//! Grid snapshot handed to export and persistence collaborators
//!
//! A snapshot is the grid as a plain nested array of cell records plus the
//! statistics and legend summary derived from it. Derived parts are always
//! recomputed from the grid when a snapshot is read back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::metrics::{compute_stats, summarize, GridSummary, Statistics};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub grid: Grid,
    pub statistics: Statistics,
    /// Statistics rounded to one decimal, for display
    pub statistics_display: Statistics,
    pub summary: GridSummary,
}

impl GridSnapshot {
    pub fn from_grid(grid: &Grid) -> Self {
        let statistics = compute_stats(grid);
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            grid: grid.clone(),
            statistics,
            statistics_display: statistics.rounded(),
            summary: summarize(grid),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize grid snapshot")
    }

    /// Read a snapshot; only the grid is trusted, everything else is derived
    /// again from it.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct GridOnly {
            grid: Grid,
        }

        let parsed: GridOnly =
            serde_json::from_str(json).context("Failed to parse grid snapshot JSON")?;
        Ok(Self::from_grid(&parsed.grid))
    }
}

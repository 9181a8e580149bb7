//! Grid summary for legends and report headers

use serde::{Deserialize, Serialize};

use super::classification::{classify, Bucket};
use crate::grid::{CellKind, Grid};

/// Cell count of one legend bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: Bucket,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    pub total_cells: usize,
    pub populated_cells: usize,
    pub fire_points: usize,
    /// One entry per bucket, in legend order (empty buckets included)
    pub buckets: Vec<BucketCount>,
}

impl GridSummary {
    pub fn count(&self, bucket: Bucket) -> usize {
        self.buckets
            .iter()
            .find(|b| b.bucket == bucket)
            .map_or(0, |b| b.count)
    }
}

pub fn summarize(grid: &Grid) -> GridSummary {
    let mut counts = [0usize; 13];
    let mut populated = 0;
    let mut fire = 0;

    for cell in grid.iter() {
        counts[classify(cell).rank()] += 1;
        if cell.is_populated() {
            populated += 1;
            if cell.kind == CellKind::Fire {
                fire += 1;
            }
        }
    }

    GridSummary {
        total_cells: grid.rows() * grid.cols(),
        populated_cells: populated,
        fire_points: fire,
        buckets: Bucket::all()
            .into_iter()
            .map(|bucket| BucketCount {
                bucket,
                count: counts[bucket.rank()],
            })
            .collect(),
    }
}

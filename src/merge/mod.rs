//! Merge/Aggregation Engine
//!
//! Two loads project saved surveys onto the active grid through the
//! column remapper:
//! - Load First: top-aligned, replaces the whole grid
//! - Load Second: bottom-aligned, sums onto whatever the grid already holds
//!
//! The stateful wrapper that remembers loaded sources and replays them on
//! resize lives in [`session`].

pub mod remap;
pub mod session;

pub use remap::{remap_column, remapped_value, RowAlignment};
pub use session::SessionState;

use chrono::{DateTime, Utc};

use crate::grid::{Dimensions, Grid};
use crate::source::SourceReport;

/// What a projection did, for logging and callers that care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectionSummary {
    /// Cells that received a source value on an empty base
    pub placed: usize,
    /// Cells where source and existing values were added together
    pub summed: usize,
}

/// Combine an existing cell value with an incoming source value.
///
/// Both positive → sum; otherwise whichever is nonzero; both zero → 0.
#[inline]
pub fn combine(existing: f64, incoming: f64) -> f64 {
    if existing > 0.0 && incoming > 0.0 {
        existing + incoming
    } else if existing != 0.0 {
        existing
    } else {
        incoming
    }
}

/// Load First: build a fresh grid of `dims` from a top-aligned projection.
///
/// Cells whose remapped source value is > 0 are set and stamped with `now`;
/// all others stay unset. Prior grid state plays no part.
pub fn project_first(
    source: &SourceReport,
    dims: Dimensions,
    now: DateTime<Utc>,
) -> (Grid, ProjectionSummary) {
    let mut grid = Grid::empty(dims);
    let mut summary = ProjectionSummary::default();
    let target_rows = dims.rows();

    for cell in grid.iter_mut() {
        let incoming =
            remapped_value(&source.grid, RowAlignment::Top, cell.row, cell.col, target_rows);
        if let Some(value) = incoming.filter(|v| *v > 0.0) {
            cell.set_value(value, now);
            summary.placed += 1;
        }
    }

    tracing::debug!(
        "Load First {:?}: {} cells placed on {}x{} grid",
        source.id,
        summary.placed,
        dims.rows(),
        dims.cols()
    );

    (grid, summary)
}

/// Load Second: fold a bottom-aligned projection onto `grid` in place.
///
/// Where the remapped source has a value, the cell becomes
/// [`combine`]`(existing, incoming)` and is stamped with `now` if the result
/// is > 0. Cell annotations are kept.
pub fn fold_second(
    grid: &mut Grid,
    source: &SourceReport,
    now: DateTime<Utc>,
) -> ProjectionSummary {
    let mut summary = ProjectionSummary::default();
    let target_rows = grid.rows();

    for cell in grid.iter_mut() {
        let Some(incoming) =
            remapped_value(&source.grid, RowAlignment::Bottom, cell.row, cell.col, target_rows)
        else {
            continue;
        };

        let existing = cell.merge_base();
        let combined = combine(existing, incoming);
        if combined > 0.0 {
            if existing > 0.0 && incoming > 0.0 {
                summary.summed += 1;
            } else if existing == 0.0 {
                summary.placed += 1;
            }
            cell.set_value(combined, now);
        }
    }

    tracing::debug!(
        "Load Second {:?}: {} cells placed, {} summed",
        source.id,
        summary.placed,
        summary.summed
    );

    summary
}

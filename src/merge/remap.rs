//! Column Remapper
//!
//! Projects a saved survey's columns onto the active grid's column space.
//! The first two target columns are mirrored from source columns 2 and 1;
//! every later target column `c` reads source column `c - 2`:
//!
//! | target col | source col |
//! |------------|------------|
//! | 0          | 2          |
//! | 1          | 1          |
//! | c >= 2     | c - 2      |
//!
//! Row indexing depends on which load is running (see [`RowAlignment`]).

use crate::source::SourceGrid;

/// Source column feeding `target_col`
#[inline]
pub fn remap_column(target_col: usize) -> usize {
    match target_col {
        0 => 2,
        1 => 1,
        c => c - 2,
    }
}

/// How target rows line up with source rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAlignment {
    /// Target row r reads source row r (Load First)
    Top,
    /// Target row r reads source row (target_rows - 1 - r) (Load Second)
    Bottom,
}

impl RowAlignment {
    #[inline]
    pub fn source_row(self, target_row: usize, target_rows: usize) -> usize {
        match self {
            RowAlignment::Top => target_row,
            RowAlignment::Bottom => target_rows - 1 - target_row,
        }
    }
}

/// Source value landing on target cell (row, col), or None when the remapped
/// position falls outside the source grid.
pub fn remapped_value(
    source: &SourceGrid,
    alignment: RowAlignment,
    target_row: usize,
    target_col: usize,
    target_rows: usize,
) -> Option<f64> {
    let row = alignment.source_row(target_row, target_rows);
    source.value_at(row, remap_column(target_col))
}

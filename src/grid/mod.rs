//! Survey grid: a rectangular rows × cols matrix of cells
//!
//! Rows are pole-distance samples (meters from the reference pole), columns
//! are road-width samples (meters across the road). A grid has no identity
//! beyond its dimensions and contents.

pub mod cell;

pub use cell::{Cell, CellKind, GeoPoint, Reading};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};

/// Validated grid dimensions (both > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    rows: usize,
    cols: usize,
}

#[derive(Deserialize)]
struct RawDimensions {
    rows: usize,
    cols: usize,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = SurveyError;

    fn try_from(raw: RawDimensions) -> Result<Self> {
        Dimensions::new(raw.rows, raw.cols)
    }
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SurveyError::InvalidDimension { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Rectangular matrix of cells.
///
/// Serializes as a plain nested array of cell records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Grid {
    dims: Dimensions,
    cells: Vec<Vec<Cell>>,
}

/// Build an empty grid: every cell unset, value 0, kind normal.
///
/// Fails with `InvalidDimension` when either side is 0.
pub fn create_grid(rows: usize, cols: usize) -> Result<Grid> {
    Ok(Grid::empty(Dimensions::new(rows, cols)?))
}

impl Grid {
    /// Empty grid of already-validated dimensions
    pub fn empty(dims: Dimensions) -> Self {
        let cells = (0..dims.rows)
            .map(|r| (0..dims.cols).map(|c| Cell::empty(r, c)).collect())
            .collect();
        Self { dims, cells }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(row)?.get_mut(col)
    }

    fn cell_mut_checked(&mut self, row: usize, col: usize) -> Result<&mut Cell> {
        let (rows, cols) = (self.rows(), self.cols());
        self.get_mut(row, col)
            .ok_or(SurveyError::CellOutOfBounds { row, col, rows, cols })
    }

    /// Row slices, top (row 0) first
    pub fn row_slices(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// All cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut().flatten()
    }

    /// Number of cells that carry a timestamp
    pub fn populated_count(&self) -> usize {
        self.iter().filter(|c| c.is_populated()).count()
    }

    /// Record a field reading at (row, col)
    pub fn record(
        &mut self,
        row: usize,
        col: usize,
        reading: Reading,
        now: DateTime<Utc>,
    ) -> Result<&Cell> {
        let cell = self.cell_mut_checked(row, col)?;
        cell.record(reading, now);
        Ok(cell)
    }

    /// Reset one cell to the unset state
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.cell_mut_checked(row, col)?.clear();
        Ok(())
    }

    /// Copy this grid onto new dimensions, keeping the top-left overlap.
    ///
    /// Cells outside `min(old, new)` on either axis are dropped. Never fails.
    pub fn copy_overlap(&self, dims: Dimensions) -> Grid {
        let mut resized = Grid::empty(dims);
        let rows = self.rows().min(dims.rows);
        let cols = self.cols().min(dims.cols);

        for r in 0..rows {
            resized.cells[r][..cols].clone_from_slice(&self.cells[r][..cols]);
        }

        resized
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = SurveyError;

    /// Rebuild a grid from a persisted nested array.
    ///
    /// Cell coordinates are re-derived from position.
    fn try_from(mut cells: Vec<Vec<Cell>>) -> Result<Self> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        let dims = Dimensions::new(rows, cols)?;

        for (r, row) in cells.iter_mut().enumerate() {
            if row.len() != cols {
                return Err(SurveyError::MalformedSourceData(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    cols
                )));
            }
            for (c, cell) in row.iter_mut().enumerate() {
                cell.row = r;
                cell.col = c;
            }
        }

        Ok(Self { dims, cells })
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_create_grid_is_empty() {
        let grid = create_grid(4, 3).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.iter().count(), 12);
        assert!(grid.iter().all(|c| *c == Cell::empty(c.row, c.col)));
        assert_eq!(grid.get(3, 2).map(|c| (c.row, c.col)), Some((3, 2)));
    }

    #[test]
    fn test_create_grid_rejects_zero() {
        assert_eq!(
            create_grid(0, 3),
            Err(SurveyError::InvalidDimension { rows: 0, cols: 3 })
        );
        assert!(create_grid(3, 0).is_err());
    }

    #[test]
    fn test_record_out_of_bounds() {
        let mut grid = create_grid(2, 2).unwrap();
        let err = grid.record(2, 0, Reading::lux(5.0), at()).unwrap_err();
        assert_eq!(
            err,
            SurveyError::CellOutOfBounds { row: 2, col: 0, rows: 2, cols: 2 }
        );
        assert!(grid.clear_cell(0, 5).is_err());
    }

    #[test]
    fn test_record_then_clear() {
        let mut grid = create_grid(2, 2).unwrap();
        grid.record(1, 0, Reading::lux(9.0), at()).unwrap();
        assert_eq!(grid.populated_count(), 1);
        grid.clear_cell(1, 0).unwrap();
        assert_eq!(grid.populated_count(), 0);
    }

    #[test]
    fn test_copy_overlap_shrink_and_grow() {
        let mut grid = create_grid(3, 3).unwrap();
        grid.record(0, 0, Reading::lux(1.0), at()).unwrap();
        grid.record(2, 2, Reading::lux(9.0), at()).unwrap();

        let smaller = grid.copy_overlap(Dimensions::new(2, 2).unwrap());
        assert_eq!(smaller.get(0, 0).unwrap().measurement(), Some(1.0));
        assert_eq!(smaller.populated_count(), 1);

        let larger = smaller.copy_overlap(Dimensions::new(4, 5).unwrap());
        assert_eq!(larger.get(0, 0).unwrap().measurement(), Some(1.0));
        assert_eq!(larger.populated_count(), 1);
        assert_eq!(larger.get(3, 4).unwrap(), &Cell::empty(3, 4));
    }

    #[test]
    fn test_json_roundtrip_reindexes_cells() {
        let json = r#"[
            [{"row": 9, "col": 9, "value": 4, "timestamp": "2024-05-01T20:00:00Z"}, {}],
            [{}, {"value": "7", "timestamp": "2024-05-01T20:00:00Z"}]
        ]"#;
        let grid: Grid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.rows(), 2);
        let first = grid.get(0, 0).unwrap();
        assert_eq!((first.row, first.col), (0, 0));
        assert_eq!(grid.get(1, 1).unwrap().measurement(), Some(7.0));

        let back: Grid = serde_json::from_str(&serde_json::to_string(&grid).unwrap()).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_json_rejects_ragged_and_empty() {
        assert!(serde_json::from_str::<Grid>("[[{}], [{}, {}]]").is_err());
        assert!(serde_json::from_str::<Grid>("[]").is_err());
    }
}

//! Editing session: the grid plus the sources loaded into it
//!
//! `SessionState` is a plain value. The host application owns it, persists
//! it for recovery if it wants to, and hands it back; nothing here touches
//! ambient storage.
//!
//! Every mutating operation has a `*_at` form taking the capture instant
//! explicitly, and a convenience form stamping `Utc::now()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{fold_second, project_first};
use crate::error::{Result, SurveyError};
use crate::grid::{Cell, Dimensions, Grid, Reading};
use crate::metrics::{compute_stats, Statistics};
use crate::source::SourceReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSessionState")]
pub struct SessionState {
    dimensions: Dimensions,
    grid: Option<Grid>,
    loaded_first: Option<SourceReport>,
    loaded_second: Option<SourceReport>,
}

/// Persisted session as read back, before the grid is checked against the
/// dimensions
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSessionState {
    dimensions: Dimensions,
    #[serde(default)]
    grid: Option<Grid>,
    #[serde(default)]
    loaded_first: Option<SourceReport>,
    #[serde(default)]
    loaded_second: Option<SourceReport>,
}

impl TryFrom<RawSessionState> for SessionState {
    type Error = SurveyError;

    fn try_from(raw: RawSessionState) -> Result<Self> {
        if let Some(grid) = &raw.grid {
            if grid.dimensions() != raw.dimensions {
                return Err(SurveyError::DimensionMismatch {
                    rows: raw.dimensions.rows(),
                    cols: raw.dimensions.cols(),
                    grid_rows: grid.rows(),
                    grid_cols: grid.cols(),
                });
            }
        }

        Ok(Self {
            dimensions: raw.dimensions,
            grid: raw.grid,
            loaded_first: raw.loaded_first,
            loaded_second: raw.loaded_second,
        })
    }
}

impl SessionState {
    /// New session with target dimensions and no grid yet
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            dimensions: Dimensions::new(rows, cols)?,
            grid: None,
            loaded_first: None,
            loaded_second: None,
        })
    }

    /// Resume editing an existing grid with no loaded sources
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            dimensions: grid.dimensions(),
            grid: Some(grid),
            loaded_first: None,
            loaded_second: None,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn loaded_first(&self) -> Option<&SourceReport> {
        self.loaded_first.as_ref()
    }

    pub fn loaded_second(&self) -> Option<&SourceReport> {
        self.loaded_second.as_ref()
    }

    /// Statistics of the current grid (all zeros when there is none)
    pub fn statistics(&self) -> Statistics {
        self.grid
            .as_ref()
            .map(compute_stats)
            .unwrap_or_default()
    }

    fn grid_or_empty(&mut self) -> &mut Grid {
        let dims = self.dimensions;
        self.grid.get_or_insert_with(|| Grid::empty(dims))
    }

    /// Load First, stamped now
    pub fn apply_first(&mut self, report: SourceReport) -> &Grid {
        self.apply_first_at(report, Utc::now())
    }

    /// Load First: replace the grid with a top-aligned projection of `report`
    /// and remember it for replay.
    pub fn apply_first_at(&mut self, report: SourceReport, now: DateTime<Utc>) -> &Grid {
        let (grid, _) = project_first(&report, self.dimensions, now);
        self.loaded_first = Some(report);
        self.grid.insert(grid)
    }

    /// Load Second, stamped now
    pub fn apply_second(&mut self, report: SourceReport) -> &Grid {
        self.apply_second_at(report, Utc::now())
    }

    /// Load Second: sum a bottom-aligned projection of `report` onto the
    /// current grid (an empty one if none exists yet) and remember it.
    ///
    /// Manual edits made since the last load are part of the base being
    /// summed onto. A later resize replays onto a clean base instead.
    pub fn apply_second_at(&mut self, report: SourceReport, now: DateTime<Utc>) -> &Grid {
        fold_second(self.grid_or_empty(), &report, now);
        self.loaded_second = Some(report);
        self.grid_or_empty()
    }

    /// Forget both sources and start over with an empty grid.
    ///
    /// Manual edits are discarded as well.
    pub fn reset(&mut self) -> &Grid {
        self.loaded_first = None;
        self.loaded_second = None;
        self.grid.insert(Grid::empty(self.dimensions))
    }

    /// Dimension change, stamped now
    pub fn on_dimensions_changed(&mut self, rows: usize, cols: usize) -> Result<&Grid> {
        self.on_dimensions_changed_at(rows, cols, Utc::now())
    }

    /// Rebuild the grid for new target dimensions.
    ///
    /// - With loaded sources: fresh grid, replay Load First then Load Second.
    /// - Without sources and with different dimensions: keep the top-left
    ///   overlap of the old grid, drop the rest.
    /// - Without sources and with identical dimensions: keep the grid as is.
    ///
    /// On `InvalidDimension` the session is left untouched.
    pub fn on_dimensions_changed_at(
        &mut self,
        rows: usize,
        cols: usize,
        now: DateTime<Utc>,
    ) -> Result<&Grid> {
        let dims = Dimensions::new(rows, cols)?;
        let previous = self.grid.take();
        self.dimensions = dims;

        let grid = if self.loaded_first.is_some() || self.loaded_second.is_some() {
            tracing::info!(
                "Replaying loaded sources onto {}x{} grid (first: {}, second: {})",
                rows,
                cols,
                self.loaded_first.is_some(),
                self.loaded_second.is_some()
            );
            self.replay(now)
        } else {
            match previous {
                Some(old) if old.dimensions() == dims => old,
                Some(old) => {
                    let kept = old.copy_overlap(dims);
                    let dropped = old.populated_count() - kept.populated_count();
                    if dropped > 0 {
                        tracing::debug!(
                            "Resize {}x{} -> {}x{} dropped {} populated cells outside overlap",
                            old.rows(),
                            old.cols(),
                            rows,
                            cols,
                            dropped
                        );
                    }
                    kept
                }
                None => Grid::empty(dims),
            }
        };

        Ok(&*self.grid.insert(grid))
    }

    /// Clean base, then First, then Second
    fn replay(&self, now: DateTime<Utc>) -> Grid {
        let mut grid = match &self.loaded_first {
            Some(first) => project_first(first, self.dimensions, now).0,
            None => Grid::empty(self.dimensions),
        };
        if let Some(second) = &self.loaded_second {
            fold_second(&mut grid, second, now);
        }
        grid
    }

    /// Direct edit, stamped now
    pub fn record(&mut self, row: usize, col: usize, reading: Reading) -> Result<&Cell> {
        self.record_at(row, col, reading, Utc::now())
    }

    /// Record a reading into the current grid (creating it if needed)
    pub fn record_at(
        &mut self,
        row: usize,
        col: usize,
        reading: Reading,
        now: DateTime<Utc>,
    ) -> Result<&Cell> {
        self.grid_or_empty().record(row, col, reading, now)
    }

    /// Clear one cell of the current grid
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid_or_empty().clear_cell(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceGrid;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 21, 0, 0).unwrap()
    }

    fn report(rows: Vec<Vec<f64>>) -> SourceReport {
        SourceReport::new(SourceGrid::from_rows(rows))
    }

    fn value(session: &SessionState, row: usize, col: usize) -> f64 {
        session
            .grid()
            .and_then(|g| g.get(row, col))
            .and_then(Cell::measurement)
            .unwrap_or(0.0)
    }

    #[test]
    fn test_new_session_has_no_grid() {
        let session = SessionState::new(3, 3).unwrap();
        assert!(session.grid().is_none());
        assert_eq!(session.statistics(), Statistics::default());
        assert!(SessionState::new(0, 3).is_err());
    }

    #[test]
    fn test_apply_first_replaces_manual_edits() {
        let mut session = SessionState::new(2, 3).unwrap();
        session.record_at(1, 1, Reading::lux(99.0), at()).unwrap();
        session.apply_first_at(report(vec![vec![1.0, 2.0, 3.0]]), at());

        assert_eq!(value(&session, 0, 0), 3.0);
        assert_eq!(value(&session, 1, 1), 0.0);
        assert!(session.loaded_first().is_some());
    }

    #[test]
    fn test_apply_second_creates_grid_when_missing() {
        let mut session = SessionState::new(2, 3).unwrap();
        session.apply_second_at(report(vec![vec![1.0, 2.0, 3.0]]), at());
        // 2 rows, bottom-aligned: target row 1 reads source row 0
        assert_eq!(value(&session, 1, 0), 3.0);
        assert_eq!(value(&session, 0, 0), 0.0);
        assert!(session.loaded_second().is_some());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionState::new(2, 2).unwrap();
        session.apply_first_at(report(vec![vec![5.0, 5.0, 5.0]]), at());
        session.record_at(1, 1, Reading::lux(4.0), at()).unwrap();

        let grid = session.reset();
        assert_eq!(grid.populated_count(), 0);
        assert!(session.loaded_first().is_none());
        assert!(session.loaded_second().is_none());
    }

    #[test]
    fn test_resize_replays_sources() {
        let mut session = SessionState::new(2, 3).unwrap();
        session.apply_first_at(report(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]), at());
        session.apply_second_at(report(vec![vec![10.0, 10.0, 10.0]]), at());

        let grid = session.on_dimensions_changed_at(3, 4, at()).unwrap();
        assert_eq!(grid.rows(), 3);
        // Row 2 of 3 reads second-source row 0 (bottom-aligned) and has no first data
        assert_eq!(value(&session, 2, 0), 10.0);
        // Row 0: first-source row 0 remapped, no second data (second has 1 row)
        assert_eq!(value(&session, 0, 0), 3.0);
        assert_eq!(value(&session, 0, 3), 2.0);
    }

    #[test]
    fn test_resize_without_sources_keeps_overlap() {
        let mut session = SessionState::new(3, 3).unwrap();
        session.record_at(0, 0, Reading::lux(7.0), at()).unwrap();
        session.record_at(2, 2, Reading::lux(8.0), at()).unwrap();

        session.on_dimensions_changed_at(2, 2, at()).unwrap();
        assert_eq!(value(&session, 0, 0), 7.0);
        assert_eq!(session.grid().unwrap().populated_count(), 1);
    }

    #[test]
    fn test_resize_same_dimensions_is_identity() {
        let mut session = SessionState::new(2, 2).unwrap();
        session.record_at(1, 1, Reading::fire(12.0), at()).unwrap();
        let before = session.grid().cloned();

        session.on_dimensions_changed_at(2, 2, at()).unwrap();
        assert_eq!(session.grid().cloned(), before);
    }

    #[test]
    fn test_invalid_resize_leaves_session_untouched() {
        let mut session = SessionState::new(2, 2).unwrap();
        session.record_at(0, 0, Reading::lux(1.0), at()).unwrap();
        let before = session.clone();

        let err = session.on_dimensions_changed_at(0, 5, at()).unwrap_err();
        assert_eq!(err, SurveyError::InvalidDimension { rows: 0, cols: 5 });
        assert_eq!(session, before);
    }

    #[test]
    fn test_session_json_roundtrip() {
        let mut session = SessionState::new(2, 3).unwrap();
        session.apply_first_at(report(vec![vec![1.0, 2.0, 3.0]]), at());

        let json = serde_json::to_string(&session).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_session_json_rejects_grid_of_other_size() {
        let mut session = SessionState::new(3, 3).unwrap();
        session.apply_first_at(report(vec![vec![1.0, 2.0, 3.0]]), at());

        let mut json = serde_json::to_value(&session).unwrap();
        json["dimensions"] = serde_json::json!({"rows": 5, "cols": 5});

        let err = serde_json::from_value::<SessionState>(json).unwrap_err();
        assert!(err.to_string().contains("Grid is 3x3 but session dimensions are 5x5"));
    }

    #[test]
    fn test_session_json_without_grid() {
        let back: SessionState =
            serde_json::from_str(r#"{"dimensions": {"rows": 2, "cols": 4}}"#).unwrap();
        assert_eq!(back, SessionState::new(2, 4).unwrap());
    }
}

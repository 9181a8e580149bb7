//! Error taxonomy for the survey grid engine.
//!
//! Only genuinely invalid input surfaces as an error. Value coercion
//! failures degrade to 0 and a malformed source grid contributes nothing
//! once it reaches the merge engine.

/// Result type for grid engine operations
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Error type for grid engine operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurveyError {
    #[error("Invalid grid dimension: {rows}x{cols} (rows and cols must be > 0)")]
    InvalidDimension { rows: usize, cols: usize },

    #[error("Malformed source data: {0}")]
    MalformedSourceData(String),

    #[error("No lighting standard for road type '{0}'")]
    UnknownRoadStandard(String),

    #[error("Grid is {grid_rows}x{grid_cols} but session dimensions are {rows}x{cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        grid_rows: usize,
        grid_cols: usize,
    },

    #[error("Cell ({row}, {col}) outside {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

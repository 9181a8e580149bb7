//! Lux Grid Engine
//!
//! Street-lighting survey grids: reconcile previously saved surveys into a
//! working grid, then summarize it for compliance and presentation.
//!
//! Module layout:
//! - `grid/`: Cell model and grid factory
//! - `source`: Loose source report records → normalized lux rows
//! - `merge/`: Column remapping, Load First / Load Second, resize replay
//! - `metrics/`: Statistics, lux bucket classification, legend summary
//! - `compliance/`: Road standards table and pass/fail evaluation
//! - `snapshot`: Grid + derived data handed to export and persistence
//! - `store`: Persistence seam for loading sources and saving grids

pub mod compliance;
pub mod error;
pub mod grid;
pub mod merge;
pub mod metrics;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use compliance::{assess, check, evaluate, ComplianceStatus, RoadStandard, RoadType, StandardsTable, Verdict};
pub use error::{Result, SurveyError};
pub use grid::{create_grid, Cell, CellKind, Dimensions, Grid, Reading};
pub use merge::{combine, fold_second, project_first, remap_column, SessionState};
pub use metrics::{classify, classify_value, compute_stats, summarize, Bucket, GridSummary, Statistics};
pub use snapshot::GridSnapshot;
pub use source::{SourceGrid, SourceReport};
pub use store::{InMemoryReportStore, ReportStore, StoreError};

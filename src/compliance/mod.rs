//! Road lighting compliance
//!
//! - `standards`: road type → thresholds table (built-in or JSON config)
//! - `evaluator`: statistics vs standard → pass/fail verdict

pub mod evaluator;
pub mod standards;

pub use evaluator::{assess, check, evaluate, Assessment, ComplianceStatus, Verdict};
pub use standards::{RoadStandard, RoadType, StandardsTable, STANDARDS_PATH_ENV};

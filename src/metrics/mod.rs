//! Derived figures over a grid
//!
//! - `statistics`: L-min / L-max / L-avg / uniformity ratio
//! - `classification`: per-cell display bucket ladder
//! - `summary`: populated / fire / per-bucket counts for legends

pub mod classification;
pub mod statistics;
pub mod summary;

// Re-export metric functions
pub use classification::{classify, classify_value, Bucket, LUX_LADDER};
pub use statistics::{compute_stats, round1, stats_from_values, Statistics};
pub use summary::{summarize, BucketCount, GridSummary};

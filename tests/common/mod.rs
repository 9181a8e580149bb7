// Shared helpers for integration tests
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use lux_grid_engine::{Grid, SourceGrid, SourceReport};

/// Route engine logs to the test harness. Set RUST_LOG=lux_grid_engine=debug
/// to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn survey_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 14, 19, 30, 0).unwrap()
}

pub fn report(rows: Vec<Vec<f64>>) -> SourceReport {
    SourceReport::new(SourceGrid::from_rows(rows))
}

/// Usable measurement of every cell, unset cells as 0
pub fn values(grid: &Grid) -> Vec<Vec<f64>> {
    grid.row_slices()
        .iter()
        .map(|row| row.iter().map(|c| c.measurement().unwrap_or(0.0)).collect())
        .collect()
}

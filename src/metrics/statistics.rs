//! Statistics Engine
//!
//! L-min, L-max, L-avg and uniformity ratio (avg / min) over every
//! populated cell with a finite value > 0. Recomputed in full on each call;
//! grids are at most a few thousand cells.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Illuminance summary of a grid.
///
/// Fields hold raw values; use [`Statistics::rounded`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub uniformity_ratio: f64,
    pub sample_count: usize,
}

impl Statistics {
    /// Same figures rounded to one decimal place
    pub fn rounded(&self) -> Statistics {
        Statistics {
            min: round1(self.min),
            max: round1(self.max),
            avg: round1(self.avg),
            uniformity_ratio: round1(self.uniformity_ratio),
            sample_count: self.sample_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

/// Round to one decimal place (half away from zero)
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Statistics over all usable measurements of `grid`
pub fn compute_stats(grid: &Grid) -> Statistics {
    stats_from_values(grid.iter().filter_map(|c| c.measurement()))
}

/// Statistics over raw lux values; non-finite and non-positive values are
/// skipped.
pub fn stats_from_values<I>(values: I) -> Statistics
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;

    for v in values.into_iter().filter(|v| v.is_finite() && *v > 0.0) {
        min = min.min(v);
        max = max.max(v);
        sum += v;
        count += 1;
    }

    if count == 0 {
        return Statistics::default();
    }

    let avg = sum / count as f64;
    let uniformity_ratio = if min > 0.0 { avg / min } else { 0.0 };

    Statistics {
        min,
        max,
        avg,
        uniformity_ratio,
        sample_count: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{create_grid, Reading};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_stats_example_20_18_16() {
        let stats = stats_from_values([20.0, 18.0, 16.0]);
        assert_relative_eq!(stats.min, 16.0);
        assert_relative_eq!(stats.max, 20.0);
        assert_relative_eq!(stats.avg, 18.0);
        assert_relative_eq!(stats.uniformity_ratio, 1.125);
        assert_eq!(stats.sample_count, 3);
    }

    #[test]
    fn test_stats_empty_grid_all_zero() {
        let grid = create_grid(5, 5).unwrap();
        assert_eq!(compute_stats(&grid), Statistics::default());
        assert!(compute_stats(&grid).is_empty());
    }

    #[test]
    fn test_stats_skip_unset_and_non_positive() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let mut grid = create_grid(2, 3).unwrap();
        grid.record(0, 0, Reading::lux(10.0), now).unwrap();
        grid.record(0, 1, Reading::lux(0.0), now).unwrap();
        grid.record(0, 2, Reading::lux(f64::NAN), now).unwrap();
        grid.record(1, 0, Reading::fire(30.0), now).unwrap();
        // Unset cell holding a stray value must be ignored
        grid.get_mut(1, 1).unwrap().value = 500.0;

        let stats = compute_stats(&grid);
        assert_eq!(stats.sample_count, 2);
        assert_relative_eq!(stats.min, 10.0);
        assert_relative_eq!(stats.max, 30.0);
        assert_relative_eq!(stats.avg, 20.0);
        assert_relative_eq!(stats.uniformity_ratio, 2.0);
    }

    #[test]
    fn test_stats_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let mut grid = create_grid(2, 2).unwrap();
        grid.record(0, 0, Reading::lux(3.3), now).unwrap();
        grid.record(1, 1, Reading::lux(7.1), now).unwrap();
        assert_eq!(compute_stats(&grid), compute_stats(&grid));
    }

    #[test]
    fn test_rounded_keeps_raw_available() {
        let stats = stats_from_values([7.0, 3.0, 3.0]);
        assert_relative_eq!(stats.avg, 13.0 / 3.0);
        assert_relative_eq!(stats.uniformity_ratio, 13.0 / 9.0);

        let shown = stats.rounded();
        assert_eq!(shown.avg, 4.3);
        assert_eq!(shown.uniformity_ratio, 1.4);
        assert_eq!(shown.sample_count, 3);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(1.24), 1.2);
        assert_eq!(round1(0.0), 0.0);
    }
}

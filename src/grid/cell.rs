//! Cell model - one sampling point of the survey grid.
//!
//! A cell is "populated" exactly when it carries a timestamp. An unset cell
//! always holds `value == 0`; this is enforced on construction, on clearing
//! and when a cell is read back from a persisted snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::normalization::deserialize_lux;

/// What a populated cell represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Ordinary lux measurement
    #[default]
    Normal,
    /// Flagged anomalous point ("titik api"). Older records say "api".
    #[serde(alias = "api")]
    Fire,
}

/// GPS fix captured when the cell was recorded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

/// One sampling point: row = pole-distance index (m), col = road-width index (m)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CellRecord")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// Illuminance in lux. Meaningless unless `timestamp` is set.
    pub value: f64,
    pub kind: CellKind,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub location: Option<GeoPoint>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Everything a field officer enters for one cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reading {
    pub value: f64,
    pub kind: CellKind,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub location: Option<GeoPoint>,
}

impl Reading {
    /// Plain measurement with no annotation
    pub fn lux(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Flagged fire point
    pub fn fire(value: f64) -> Self {
        Self {
            value,
            kind: CellKind::Fire,
            ..Self::default()
        }
    }
}

impl Cell {
    /// Unset cell at (row, col)
    pub fn empty(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            value: 0.0,
            kind: CellKind::Normal,
            description: None,
            photo: None,
            location: None,
            timestamp: None,
        }
    }

    /// Has this cell ever been recorded?
    #[inline]
    pub fn is_populated(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Usable measurement: populated, finite and strictly positive
    #[inline]
    pub fn measurement(&self) -> Option<f64> {
        if self.is_populated() && self.value.is_finite() && self.value > 0.0 {
            Some(self.value)
        } else {
            None
        }
    }

    /// Value to merge against; unset cells count as 0
    #[inline]
    pub(crate) fn merge_base(&self) -> f64 {
        self.measurement().unwrap_or(0.0)
    }

    /// Overwrite with a reading taken at `now`
    pub fn record(&mut self, reading: Reading, now: DateTime<Utc>) {
        self.value = reading.value;
        self.kind = reading.kind;
        self.description = reading.description;
        self.photo = reading.photo;
        self.location = reading.location;
        self.timestamp = Some(now);
    }

    /// Set only the lux value, keeping annotations
    pub(crate) fn set_value(&mut self, value: f64, now: DateTime<Utc>) {
        self.value = value;
        self.timestamp = Some(now);
    }

    /// Back to the unset state (position is kept)
    pub fn clear(&mut self) {
        *self = Cell::empty(self.row, self.col);
    }
}

/// Wire shape accepted when reading a persisted cell.
///
/// Every field is optional and `value` may arrive as a string.
#[derive(Deserialize)]
struct CellRecord {
    #[serde(default)]
    row: usize,
    #[serde(default)]
    col: usize,
    #[serde(default, deserialize_with = "deserialize_lux")]
    value: f64,
    #[serde(default)]
    kind: CellKind,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    photo: Option<String>,
    #[serde(default)]
    location: Option<GeoPoint>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

impl From<CellRecord> for Cell {
    fn from(record: CellRecord) -> Self {
        let value = if record.timestamp.is_some() {
            record.value
        } else {
            0.0
        };

        Cell {
            row: record.row,
            col: record.col,
            value,
            kind: record.kind,
            description: record.description,
            photo: record.photo,
            location: record.location,
            timestamp: record.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_cell_has_no_measurement() {
        let cell = Cell::empty(2, 3);
        assert!(!cell.is_populated());
        assert_eq!(cell.measurement(), None);
        assert_eq!(cell.value, 0.0);
        assert_eq!(cell.kind, CellKind::Normal);
    }

    #[test]
    fn test_unset_cell_ignores_stray_value() {
        let mut cell = Cell::empty(0, 0);
        cell.value = 42.0;
        assert_eq!(cell.measurement(), None);
        assert_eq!(cell.merge_base(), 0.0);
    }

    #[test]
    fn test_record_and_clear() {
        let mut cell = Cell::empty(1, 1);
        cell.record(
            Reading {
                value: 12.0,
                kind: CellKind::Fire,
                description: Some("lampu mati".to_string()),
                photo: Some("photos/a.jpg".to_string()),
                location: Some(GeoPoint { lat: -6.2, lon: 106.8 }),
            },
            at(),
        );
        assert_eq!(cell.measurement(), Some(12.0));
        assert_eq!(cell.kind, CellKind::Fire);

        cell.clear();
        assert_eq!(cell, Cell::empty(1, 1));
    }

    #[test]
    fn test_deserialize_forces_zero_when_unset() {
        let cell: Cell = serde_json::from_value(json!({
            "row": 0, "col": 1, "value": 15, "timestamp": null
        }))
        .unwrap();
        assert_eq!(cell.value, 0.0);
        assert!(!cell.is_populated());
    }

    #[test]
    fn test_deserialize_legacy_shapes() {
        let cell: Cell = serde_json::from_value(json!({
            "row": 3, "col": 0, "value": "17.5", "kind": "api",
            "location": {"lat": -7.25, "lng": 112.75},
            "timestamp": "2024-05-01T19:30:00Z"
        }))
        .unwrap();
        assert_eq!(cell.value, 17.5);
        assert_eq!(cell.kind, CellKind::Fire);
        assert_eq!(cell.location, Some(GeoPoint { lat: -7.25, lon: 112.75 }));
        assert_eq!(cell.timestamp, Some(at()));
    }

    #[test]
    fn test_non_numeric_string_value_is_excluded() {
        let cell: Cell = serde_json::from_value(json!({
            "value": "rusak", "timestamp": "2024-05-01T19:30:00Z"
        }))
        .unwrap();
        assert!(cell.is_populated());
        assert!(cell.value.is_nan());
        assert_eq!(cell.measurement(), None);
    }
}

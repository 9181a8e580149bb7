//! Source reports - previously saved surveys loaded for merging
//!
//! A source report arrives from the persistence layer as a loose JSON record.
//! Its grid may be a nested array or a JSON-encoded string of one, and each
//! cell may be a number, a numeric string or a legacy object. Everything is
//! normalized here so the merge engine only sees `f64`s.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SurveyError};
use crate::utils::{coerce_lux, lenient_f64};

/// How many layers of string-encoded JSON are unwrapped before giving up
const MAX_DECODE_DEPTH: usize = 3;

/// Record keys that may carry each field, in lookup order
const ID_KEYS: &[&str] = &["id", "reportId"];
const GRID_KEYS: &[&str] = &["grid", "sourceGrid", "gridData"];
const LAMP_POWER_KEYS: &[&str] = &["lampPower", "dayaLampu", "lamp_power"];
const POLE_HEIGHT_KEYS: &[&str] = &["poleHeight", "tinggiTiang", "pole_height"];
const SURVEYOR_KEYS: &[&str] = &["surveyor", "surveyorName", "namaPetugas", "petugas"];

/// Normalized lux values of a saved grid. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SourceGrid {
    rows: Vec<Vec<f64>>,
}

impl SourceGrid {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Parse a raw grid, failing with `MalformedSourceData` when it is not
    /// an array of rows even after unwrapping string-encoded JSON.
    ///
    /// Rows that are not arrays become empty rows; cells that cannot be read
    /// become 0.
    pub fn parse(raw: &Value) -> Result<Self> {
        let mut decoded;
        let mut current = raw;

        for _ in 0..MAX_DECODE_DEPTH {
            let Value::String(encoded) = current else {
                break;
            };
            decoded = serde_json::from_str::<Value>(encoded).map_err(|e| {
                SurveyError::MalformedSourceData(format!("grid string is not JSON: {}", e))
            })?;
            current = &decoded;
        }

        let Value::Array(raw_rows) = current else {
            return Err(SurveyError::MalformedSourceData(format!(
                "expected array of rows, found {}",
                json_type_name(current)
            )));
        };

        let rows = raw_rows
            .iter()
            .map(|row| match row {
                Value::Array(cells) => cells.iter().map(coerce_lux).collect(),
                _ => Vec::new(),
            })
            .collect();

        Ok(Self { rows })
    }

    /// Parse a raw grid, treating malformed input as an empty grid.
    pub fn parse_lenient(raw: &Value) -> Self {
        match Self::parse(raw) {
            Ok(grid) => grid,
            Err(e) => {
                tracing::warn!("Source grid ignored: {}", e);
                Self::default()
            }
        }
    }

    /// Value at (row, col), or None when either index is out of range
    #[inline]
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row)?.get(col).copied()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A previously saved survey, read-only input to the merge engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", rename_all = "camelCase")]
pub struct SourceReport {
    pub id: Option<String>,
    /// Lamp power in watts
    pub lamp_power: Option<f64>,
    /// Pole height in meters
    pub pole_height: Option<f64>,
    pub surveyor: Option<String>,
    pub grid: SourceGrid,
}

impl SourceReport {
    /// Report with a grid and no metadata
    pub fn new(grid: SourceGrid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Read a persisted report record. Never fails; missing or malformed
    /// parts come back empty.
    pub fn from_record(record: &Value) -> Self {
        let Value::Object(map) = record else {
            tracing::warn!(
                "Source report ignored: expected object, found {}",
                json_type_name(record)
            );
            return Self::default();
        };

        let grid = match lookup(map, GRID_KEYS) {
            Some(raw) => SourceGrid::parse_lenient(raw),
            None => {
                tracing::warn!("Source report has no grid field");
                SourceGrid::default()
            }
        };

        Self {
            id: lookup(map, ID_KEYS).and_then(string_field),
            lamp_power: lenient_f64(lookup(map, LAMP_POWER_KEYS)),
            pole_height: lenient_f64(lookup(map, POLE_HEIGHT_KEYS)),
            surveyor: lookup(map, SURVEYOR_KEYS).and_then(string_field),
            grid,
        }
    }
}

impl From<Value> for SourceReport {
    fn from(record: Value) -> Self {
        Self::from_record(&record)
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
}

fn string_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

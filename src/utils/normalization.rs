//! Value Normalization
//!
//! Converts the heterogeneous legacy shapes a saved survey cell can take
//! into a single lux number. Applied once, at the ingestion boundary, so the
//! merge engine only ever sees clean `f64`s.
//!
//! Accepted shapes:
//! - plain JSON number
//! - numeric string, read with `parseFloat` rules (leading numeric prefix)
//! - object carrying the number under one of [`LEGACY_VALUE_FIELDS`]
//!
//! Anything else, or anything that yields NaN, becomes 0.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Field names older survey records used for the lux reading, in lookup order.
pub const LEGACY_VALUE_FIELDS: &[&str] = &["value", "lux", "nilai", "luxValue", "val"];

/// Parse the longest numeric prefix of `s`, the way `parseFloat` does.
///
/// Leading whitespace is skipped; trailing garbage is ignored.
/// Returns None when no digits are found at all.
///
/// # Examples
/// ```
/// use lux_grid_engine::utils::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("  12.5 lux"), Some(12.5));
/// assert_eq!(parse_float_prefix("3e2x"), Some(300.0));
/// assert_eq!(parse_float_prefix("abc"), None);
/// ```
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - (end + 1);
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it ("5e" parses as 5)
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Normalize a raw source cell into a lux value.
///
/// Never fails: malformed input, NaN and infinities all map to 0.
pub fn coerce_lux(raw: &Value) -> f64 {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        Value::Object(map) => LEGACY_VALUE_FIELDS
            .iter()
            .find_map(|field| map.get(*field).filter(|v| !v.is_null()))
            .and_then(|inner| match inner {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => parse_float_prefix(s),
                _ => None,
            }),
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Read an optional numeric metadata field (lamp power, pole height).
///
/// Null or missing → None. Unparseable strings → None.
pub fn lenient_f64(raw: Option<&Value>) -> Option<f64> {
    let value = match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// Serde adapter for a cell's `value` field in persisted snapshots.
///
/// Numbers pass through, strings are read with `parseFloat` rules. A string
/// with no numeric prefix becomes NaN so statistics exclude it instead of
/// counting it as zero. Null becomes 0.
pub fn deserialize_lux<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float_prefix(&s).unwrap_or(f64::NAN),
        Value::Null => 0.0,
        _ => f64::NAN,
    })
}

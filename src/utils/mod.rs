//! Utility modules for the survey grid engine
//!
//! Contains shared functionality used across ingestion and snapshots:
//! - Normalization: legacy value shapes → lux numbers

pub mod normalization;

// Re-export commonly used functions
pub use normalization::{coerce_lux, lenient_f64, parse_float_prefix, LEGACY_VALUE_FIELDS};

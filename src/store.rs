//! Persistence seam for source reports and saved grids.
//!
//! The engine itself never performs I/O; a host application implements
//! [`ReportStore`] over its document store. [`InMemoryReportStore`] keeps raw
//! JSON records in memory, which is what tests and local tooling use.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::snapshot::GridSnapshot;
use crate::source::SourceReport;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Request/response contract with the persistence collaborator
pub trait ReportStore {
    /// Fetch a previously saved survey for merging
    fn load_source_report(&self, id: &str) -> StoreResult<SourceReport>;

    /// Persist the current grid of a report
    fn save_grid(&mut self, id: &str, snapshot: &GridSnapshot) -> StoreResult<()>;
}

/// In-memory store of raw report records keyed by id
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportStore {
    records: FxHashMap<String, Value>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a raw report record
    pub fn insert_record(&mut self, id: impl Into<String>, record: Value) {
        self.records.insert(id.into(), record);
    }

    pub fn record(&self, id: &str) -> Option<&Value> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ReportStore for InMemoryReportStore {
    fn load_source_report(&self, id: &str) -> StoreResult<SourceReport> {
        let record = self
            .records
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut report = SourceReport::from_record(record);
        if report.id.is_none() {
            report.id = Some(id.to_string());
        }
        Ok(report)
    }

    /// Writes the grid into the record's `grid` field, keeping any other
    /// metadata already stored for `id`.
    fn save_grid(&mut self, id: &str, snapshot: &GridSnapshot) -> StoreResult<()> {
        let grid = serde_json::to_value(&snapshot.grid)
            .map_err(|e| StoreError::Backend(format!("grid serialization failed: {}", e)))?;

        let record = self
            .records
            .entry(id.to_string())
            .or_insert_with(|| Value::Object(Default::default()));

        match record {
            Value::Object(map) => {
                map.insert("id".to_string(), Value::String(id.to_string()));
                map.insert("grid".to_string(), grid);
            }
            other => {
                return Err(StoreError::Backend(format!(
                    "record '{}' is not an object: {}",
                    id, other
                )))
            }
        }

        tracing::debug!(
            "Saved grid for report {} ({} populated cells)",
            id,
            snapshot.summary.populated_cells
        );
        Ok(())
    }
}

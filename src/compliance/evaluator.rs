//! Compliance Evaluator
//!
//! Compares grid statistics against a road standard. Comparisons use the
//! raw (unrounded) statistics and both bounds are inclusive.

use serde::{Deserialize, Serialize};

use super::standards::{RoadStandard, StandardsTable};
use crate::error::Result;
use crate::metrics::Statistics;

/// Pass/fail per criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// avg >= avgMin
    pub avg_ok: bool,
    /// uniformityRatio <= uniformityRatioMax
    pub ratio_ok: bool,
    pub overall_ok: bool,
}

pub fn evaluate(stats: &Statistics, standard: &RoadStandard) -> Verdict {
    let avg_ok = stats.avg >= standard.avg_min;
    let ratio_ok = stats.uniformity_ratio <= standard.uniformity_ratio_max;
    Verdict {
        avg_ok,
        ratio_ok,
        overall_ok: avg_ok && ratio_ok,
    }
}

/// Evaluation against a named road type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub standard: RoadStandard,
    pub statistics: Statistics,
    pub verdict: Verdict,
}

/// Look up `road_type` and evaluate. Unknown road types are an error, never
/// a default verdict.
pub fn assess(stats: &Statistics, road_type: &str, table: &StandardsTable) -> Result<Assessment> {
    let standard = *table.get(road_type)?;
    Ok(Assessment {
        standard,
        statistics: *stats,
        verdict: evaluate(stats, &standard),
    })
}

/// Presentation-ready compliance result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ComplianceStatus {
    #[serde(rename_all = "camelCase")]
    Evaluated {
        road_type: String,
        #[serde(flatten)]
        assessment: Assessment,
    },
    #[serde(rename_all = "camelCase")]
    NotApplicable {
        road_type: String,
        reason: String,
    },
}

impl ComplianceStatus {
    /// None when no standard applies
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            ComplianceStatus::Evaluated { assessment, .. } => Some(assessment.verdict),
            ComplianceStatus::NotApplicable { .. } => None,
        }
    }
}

/// Like [`assess`], but folds an unknown road type into `NotApplicable`
pub fn check(stats: &Statistics, road_type: &str, table: &StandardsTable) -> ComplianceStatus {
    let road_type_key = road_type.trim().to_string();
    match assess(stats, road_type, table) {
        Ok(assessment) => ComplianceStatus::Evaluated {
            road_type: road_type_key,
            assessment,
        },
        Err(e) => {
            tracing::debug!("Compliance not applicable: {}", e);
            ComplianceStatus::NotApplicable {
                road_type: road_type_key,
                reason: e.to_string(),
            }
        }
    }
}

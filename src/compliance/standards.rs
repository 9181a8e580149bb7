//! Road lighting standards lookup table
//!
//! Static configuration: road classification → minimum average illuminance
//! and maximum uniformity ratio. Built-in defaults can be replaced by a JSON
//! file of the form
//!
//! ```json
//! {
//!   "arterial": { "avgMin": 17.0, "uniformityRatioMax": 2.99 },
//!   "collector": { "avgMin": 12.0, "uniformityRatioMax": 3.99 }
//! }
//! ```

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::SurveyError;

/// Environment variable naming a JSON standards file
pub const STANDARDS_PATH_ENV: &str = "LUX_ROAD_STANDARDS";

/// Road classifications with a built-in standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadType {
    Arterial,
    Collector,
    Local,
    Environmental,
}

impl RoadType {
    pub fn key(self) -> &'static str {
        match self {
            RoadType::Arterial => "arterial",
            RoadType::Collector => "collector",
            RoadType::Local => "local",
            RoadType::Environmental => "environmental",
        }
    }

    pub fn all() -> [RoadType; 4] {
        [
            RoadType::Arterial,
            RoadType::Collector,
            RoadType::Local,
            RoadType::Environmental,
        ]
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RoadType {
    type Err = SurveyError;

    /// Case-insensitive; Indonesian names (arteri, kolektor, lokal,
    /// lingkungan) are accepted too.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "arterial" | "arteri" => Ok(RoadType::Arterial),
            "collector" | "kolektor" => Ok(RoadType::Collector),
            "local" | "lokal" => Ok(RoadType::Local),
            "environmental" | "lingkungan" => Ok(RoadType::Environmental),
            _ => Err(SurveyError::UnknownRoadStandard(s.trim().to_string())),
        }
    }
}

/// Acceptance thresholds for one road classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadStandard {
    /// Minimum acceptable average illuminance (lux)
    pub avg_min: f64,
    /// Maximum acceptable uniformity ratio (avg / min)
    pub uniformity_ratio_max: f64,
}

impl RoadStandard {
    pub const fn new(avg_min: f64, uniformity_ratio_max: f64) -> Self {
        Self {
            avg_min,
            uniformity_ratio_max,
        }
    }

    /// Built-in standard for a road type
    pub fn builtin(road_type: RoadType) -> Self {
        match road_type {
            RoadType::Arterial => Self::new(17.0, 2.99),
            RoadType::Collector => Self::new(12.0, 3.99),
            RoadType::Local => Self::new(6.0, 5.99),
            RoadType::Environmental => Self::new(3.0, 5.99),
        }
    }
}

/// Road type key → standard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StandardsTable {
    standards: FxHashMap<String, RoadStandard>,
}

impl Default for StandardsTable {
    fn default() -> Self {
        let standards = RoadType::all()
            .into_iter()
            .map(|rt| (rt.key().to_string(), RoadStandard::builtin(rt)))
            .collect();
        Self { standards }
    }
}

impl StandardsTable {
    /// Load a standards table from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read road standards file: {:?}", path))?;

        Self::from_json(&contents)
            .with_context(|| format!("Invalid road standards file: {:?}", path))
    }

    /// Parse and validate a standards table from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FxHashMap<String, RoadStandard> =
            serde_json::from_str(json).context("Failed to parse road standards JSON")?;

        if raw.is_empty() {
            anyhow::bail!("Road standards table is empty");
        }

        let mut standards = FxHashMap::default();
        for (key, standard) in raw {
            if !(standard.avg_min.is_finite() && standard.avg_min >= 0.0) {
                anyhow::bail!("Road type '{}': avgMin must be >= 0", key);
            }
            if !(standard.uniformity_ratio_max.is_finite() && standard.uniformity_ratio_max > 0.0) {
                anyhow::bail!("Road type '{}': uniformityRatioMax must be > 0", key);
            }
            if standards.insert(normalize_key(&key), standard).is_some() {
                anyhow::bail!("Road type '{}' is listed more than once (keys are case-insensitive)", key);
            }
        }

        Ok(Self { standards })
    }

    /// Table from the file named by `LUX_ROAD_STANDARDS`, or the built-in
    /// defaults when the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        match std::env::var(STANDARDS_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("Loading road standards from {}", path);
                Self::load(Path::new(path.trim()))
            }
            _ => {
                tracing::debug!("{} not set - using built-in road standards", STANDARDS_PATH_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Standard for a road type key (case-insensitive, Indonesian names
    /// accepted for the built-in types)
    pub fn get(&self, road_type: &str) -> std::result::Result<&RoadStandard, SurveyError> {
        let key = normalize_key(road_type);
        if let Some(standard) = self.standards.get(&key) {
            return Ok(standard);
        }

        // Fall back to the canonical key of a known alias
        road_type
            .parse::<RoadType>()
            .ok()
            .and_then(|rt| self.standards.get(rt.key()))
            .ok_or_else(|| SurveyError::UnknownRoadStandard(road_type.trim().to_string()))
    }

    pub fn len(&self) -> usize {
        self.standards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

//! Classification ladder for display and export colouring.
//!
//! Priority: unset cell → Zero; fire point → Fire; otherwise the lux value
//! walks a threshold ladder where ties resolve upward (`>=`).

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, CellKind};

/// Display bucket of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Fire,
    Zero,
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
    Level6,
    Level7,
    Level8,
    Level9,
    Level10,
    Level11,
}

/// Lower bounds (inclusive) of Level2..Level11, highest first.
/// Anything > 0 below the last step is Level1.
pub const LUX_LADDER: &[(f64, Bucket)] = &[
    (80.0, Bucket::Level11),
    (70.0, Bucket::Level10),
    (60.0, Bucket::Level9),
    (50.0, Bucket::Level8),
    (40.0, Bucket::Level7),
    (30.0, Bucket::Level6),
    (20.0, Bucket::Level5),
    (10.0, Bucket::Level4),
    (5.0, Bucket::Level3),
    (0.5, Bucket::Level2),
];

impl Bucket {
    /// Legend order: fire, zero, level1 .. level11
    pub fn all() -> [Bucket; 13] {
        [
            Bucket::Fire,
            Bucket::Zero,
            Bucket::Level1,
            Bucket::Level2,
            Bucket::Level3,
            Bucket::Level4,
            Bucket::Level5,
            Bucket::Level6,
            Bucket::Level7,
            Bucket::Level8,
            Bucket::Level9,
            Bucket::Level10,
            Bucket::Level11,
        ]
    }

    /// Position in legend order
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Stable wire label
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Fire => "fire",
            Bucket::Zero => "zero",
            Bucket::Level1 => "level1",
            Bucket::Level2 => "level2",
            Bucket::Level3 => "level3",
            Bucket::Level4 => "level4",
            Bucket::Level5 => "level5",
            Bucket::Level6 => "level6",
            Bucket::Level7 => "level7",
            Bucket::Level8 => "level8",
            Bucket::Level9 => "level9",
            Bucket::Level10 => "level10",
            Bucket::Level11 => "level11",
        }
    }

    /// Human-readable range for legends
    pub fn range_label(self) -> &'static str {
        match self {
            Bucket::Fire => "Titik api",
            Bucket::Zero => "No data",
            Bucket::Level1 => "0 - 0.5 lux",
            Bucket::Level2 => "0.5 - 5 lux",
            Bucket::Level3 => "5 - 10 lux",
            Bucket::Level4 => "10 - 20 lux",
            Bucket::Level5 => "20 - 30 lux",
            Bucket::Level6 => "30 - 40 lux",
            Bucket::Level7 => "40 - 50 lux",
            Bucket::Level8 => "50 - 60 lux",
            Bucket::Level9 => "60 - 70 lux",
            Bucket::Level10 => "70 - 80 lux",
            Bucket::Level11 => ">= 80 lux",
        }
    }
}

/// Bucket for a lux value alone (no fire / unset handling)
pub fn classify_value(value: f64) -> Bucket {
    if let Some((_, bucket)) = LUX_LADDER.iter().find(|(lower, _)| value >= *lower) {
        return *bucket;
    }
    if value > 0.0 {
        Bucket::Level1
    } else {
        Bucket::Zero
    }
}

/// Bucket for a cell
pub fn classify(cell: &Cell) -> Bucket {
    if !cell.is_populated() {
        Bucket::Zero
    } else if cell.kind == CellKind::Fire {
        Bucket::Fire
    } else {
        classify_value(cell.value)
    }
}

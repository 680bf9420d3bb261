//! KPI configuration: FTE normalization and alert thresholds.

use serde::{Deserialize, Serialize};

/// Warning/critical bounds for a single metric. `None` disables the bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default)]
    pub warning: Option<f64>,
    #[serde(default)]
    pub critical: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Hours that constitute one FTE-day when deriving FTE equivalents.
    pub hours_per_fte_day: f64,
    /// TAT standard used for the "% over standard" column.
    pub tat_standard_hours: f64,
    /// TAT average breaches these from below (avg >= warning is a warning).
    pub tat_thresholds: Thresholds,
    /// Cytogenetics volume breaches these from above (total <= warning is a
    /// warning).
    pub cyto_volume_thresholds: Thresholds,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            hours_per_fte_day: 8.0,
            tat_standard_hours: 48.0,
            tat_thresholds: Thresholds {
                warning: Some(48.0),
                critical: Some(72.0),
            },
            cyto_volume_thresholds: Thresholds::default(),
        }
    }
}

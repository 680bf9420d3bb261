//! Period-level KPI metrics with threshold statuses.

use serde::{Deserialize, Serialize};

use crate::period::Period;

/// Traffic-light status against configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    Ok,
    Warning,
    Critical,
    /// No contributing samples.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMetric {
    pub total: usize,
    pub status: KpiStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TatMetric {
    pub count: usize,
    pub min_hours: Option<f64>,
    pub avg_hours: Option<f64>,
    pub max_hours: Option<f64>,
    pub status: KpiStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentChange {
    pub mom: Option<f64>,
    pub yoy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestsPerFte {
    pub tests: usize,
    pub total_hours: Option<f64>,
    pub fte_equivalents: Option<f64>,
    pub hours_per_fte_day: f64,
    pub value: Option<f64>,
}

/// Everything the reporting layer needs for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub period: Period,
    pub cytogenetics_total_volume: VolumeMetric,
    pub total_volume: usize,
    pub tat: TatMetric,
    pub percent_change: PercentChange,
    pub tests_per_fte: TestsPerFte,
}

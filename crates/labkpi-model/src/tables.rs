//! Derived aggregate rows consumed by the reporting layer.
//!
//! All rates and averages are `Option<f64>`: `None` means "no contributing
//! samples" and must render distinctly from a true zero.

use serde::{Deserialize, Serialize};

/// One calendar month of the dashboard table (12 per year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyKpiRow {
    /// 0-based month index.
    pub month_index: u32,
    pub month_name: String,
    /// Distinct case count.
    pub total: usize,
    pub yoy: Option<f64>,
    pub mom: Option<f64>,
    pub abnormal_cases: usize,
    pub percent_abnormal: Option<f64>,
    pub failures: usize,
    pub stat_cases: usize,
    /// Row-level mean of the TAT column.
    pub avg_tat: Option<f64>,
    /// Mean, across STAT cases, of each case's own per-case mean TAT.
    pub stat_avg_tat: Option<f64>,
    pub tat_over_std_pct: Option<f64>,
}

/// One calendar day of a custom-range table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyKpiRow {
    pub date: String,
    pub total: usize,
    pub abnormal_cases: usize,
    pub failures: usize,
    pub stat_cases: usize,
    pub avg_tat: Option<f64>,
    pub stat_avg_tat: Option<f64>,
    pub tat_over_std_pct: Option<f64>,
}

/// Per-technician evaluation row. A case with two technicians counts once
/// toward each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianKpi {
    pub name: String,
    pub cases: usize,
    pub abnormal: usize,
    pub failures: usize,
    pub abn_pct: Option<f64>,
    pub fail_pct: Option<f64>,
    /// Mean of per-case mean TATs (two-level averaging).
    pub avg_tat: Option<f64>,
}

/// Unique-case count attributed to one reviewer or QC performer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCases {
    pub name: String,
    pub cases: usize,
}

/// Per-staff workload summary over the selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub staff_id: String,
    pub staff_name: String,
    pub days_worked: usize,
    pub total_hours: f64,
    pub remote_hours: f64,
    pub in_lab_hours: f64,
    pub fte_equivalents: Option<f64>,
    pub remote_pct: Option<f64>,
}

//! Data model for the lab KPI ingestion and aggregation pipeline.

pub mod config;
pub mod error;
pub mod metrics;
pub mod period;
pub mod records;
pub mod tables;

pub use config::{KpiConfig, Thresholds};
pub use error::{KpiError, Result};
pub use metrics::{KpiStatus, PercentChange, PeriodMetrics, TatMetric, TestsPerFte, VolumeMetric};
pub use period::Period;
pub use records::{ProductivityRecord, TestRecord, normalize_case_no};
pub use tables::{
    DailyKpiRow, EmployeeSummary, MonthlyKpiRow, PersonCases, TechnicianKpi,
};

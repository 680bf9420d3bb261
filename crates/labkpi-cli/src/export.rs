//! CSV export of the derived tables and period metrics.
//!
//! Missing rates and averages are written as empty fields, keeping "no
//! samples" distinct from a true zero in downstream spreadsheets.

use std::path::Path;

use anyhow::Result;

use labkpi_model::{
    DailyKpiRow, EmployeeSummary, KpiStatus, MonthlyKpiRow, PeriodMetrics, PersonCases,
    TechnicianKpi,
};

fn opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn pct(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

fn status(value: KpiStatus) -> &'static str {
    match value {
        KpiStatus::Ok => "ok",
        KpiStatus::Warning => "warning",
        KpiStatus::Critical => "critical",
        KpiStatus::Unknown => "unknown",
    }
}

pub fn write_monthly_csv(path: &Path, rows: &[MonthlyKpiRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "month",
        "total",
        "yoy_percent",
        "mom_percent",
        "abnormal_cases",
        "percent_abnormal",
        "failures",
        "stat_cases",
        "avg_tat_hours",
        "stat_avg_tat_hours",
        "tat_over_std_percent",
    ])?;
    for row in rows {
        writer.write_record([
            row.month_name.clone(),
            row.total.to_string(),
            pct(row.yoy),
            pct(row.mom),
            row.abnormal_cases.to_string(),
            pct(row.percent_abnormal),
            row.failures.to_string(),
            row.stat_cases.to_string(),
            opt(row.avg_tat),
            opt(row.stat_avg_tat),
            pct(row.tat_over_std_pct),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_daily_csv(path: &Path, rows: &[DailyKpiRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "date",
        "total",
        "abnormal_cases",
        "failures",
        "stat_cases",
        "avg_tat_hours",
        "stat_avg_tat_hours",
        "tat_over_std_percent",
    ])?;
    for row in rows {
        writer.write_record([
            row.date.clone(),
            row.total.to_string(),
            row.abnormal_cases.to_string(),
            row.failures.to_string(),
            row.stat_cases.to_string(),
            opt(row.avg_tat),
            opt(row.stat_avg_tat),
            pct(row.tat_over_std_pct),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_technicians_csv(path: &Path, rows: &[TechnicianKpi]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "name",
        "cases",
        "abnormal",
        "failures",
        "abnormal_percent",
        "failure_percent",
        "avg_tat_hours",
    ])?;
    for row in rows {
        writer.write_record([
            row.name.clone(),
            row.cases.to_string(),
            row.abnormal.to_string(),
            row.failures.to_string(),
            pct(row.abn_pct),
            pct(row.fail_pct),
            opt(row.avg_tat),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_person_cases_csv(path: &Path, rows: &[PersonCases]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["name", "cases"])?;
    for row in rows {
        writer.write_record([row.name.clone(), row.cases.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_employees_csv(path: &Path, rows: &[EmployeeSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "staff_id",
        "staff_name",
        "days_worked",
        "total_hours",
        "fte_equivalents",
        "remote_hours",
        "in_lab_hours",
        "remote_pct",
    ])?;
    for row in rows {
        writer.write_record([
            row.staff_id.clone(),
            row.staff_name.clone(),
            row.days_worked.to_string(),
            format!("{:.2}", row.total_hours),
            opt(row.fte_equivalents),
            format!("{:.2}", row.remote_hours),
            format!("{:.2}", row.in_lab_hours),
            pct(row.remote_pct),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Single-row export matching the dashboard's period metric set.
pub fn write_metrics_csv(path: &Path, metrics: &PeriodMetrics) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "period_start",
        "period_end",
        "cyto_total",
        "total_volume",
        "tat_min_hours",
        "tat_avg_hours",
        "tat_max_hours",
        "tat_count",
        "tat_status",
        "mom_percent",
        "yoy_percent",
        "tests_per_fte",
        "total_hours",
        "fte_equivalents",
        "hours_per_fte_day",
    ])?;
    writer.write_record([
        metrics.period.start_date.clone(),
        metrics.period.end_date.clone(),
        metrics.cytogenetics_total_volume.total.to_string(),
        metrics.total_volume.to_string(),
        opt(metrics.tat.min_hours),
        opt(metrics.tat.avg_hours),
        opt(metrics.tat.max_hours),
        metrics.tat.count.to_string(),
        status(metrics.tat.status).to_string(),
        pct(metrics.percent_change.mom),
        pct(metrics.percent_change.yoy),
        opt(metrics.tests_per_fte.value),
        opt(metrics.tests_per_fte.total_hours),
        opt(metrics.tests_per_fte.fte_equivalents),
        format!("{:.1}", metrics.tests_per_fte.hours_per_fte_day),
    ])?;
    writer.flush()?;
    Ok(())
}

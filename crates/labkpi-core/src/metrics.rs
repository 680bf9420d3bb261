//! Period-level KPI metrics with threshold statuses.

use chrono::{Months, NaiveDate, NaiveDateTime};

use labkpi_ingest::coerce::parse_datetime_text;
use labkpi_model::{
    KpiConfig, KpiError, KpiStatus, PercentChange, Period, PeriodMetrics, ProductivityRecord,
    Result, TatMetric, TestRecord, TestsPerFte, Thresholds, VolumeMetric,
};

/// Computes the full metric set for one period.
///
/// Records are placed in the period by resulted-at, falling back to
/// received-at. MoM/YoY compare the same period shifted back one month and
/// twelve months respectively, with end-of-month days clamped.
pub fn compute_period_metrics(
    config: &KpiConfig,
    period: &Period,
    tests: &[TestRecord],
    productivity: &[ProductivityRecord],
) -> Result<PeriodMetrics> {
    period.validate()?;
    let (start, end) = period_bounds(period)?;

    let in_period: Vec<&TestRecord> = tests
        .iter()
        .filter(|t| timestamp(t).is_some_and(|ts| ts >= start && ts <= end))
        .collect();

    let total_volume = in_period.len();
    let cyto_total = in_period.iter().filter(|t| t.is_cyto()).count();

    let tat_values: Vec<f64> = in_period.iter().filter_map(|t| tat_hours(t)).collect();
    let tat = tat_metric(&tat_values, &config.tat_thresholds);

    let volume_status = volume_status(cyto_total, &config.cyto_volume_thresholds);
    if volume_status == KpiStatus::Critical {
        tracing::error!(total = cyto_total, "cytogenetics volume critically low");
    } else if volume_status == KpiStatus::Warning {
        tracing::warn!(total = cyto_total, "cytogenetics volume below warning threshold");
    }

    let prev_month = shifted_count(tests, start, end, 1);
    let prev_year = shifted_count(tests, start, end, 12);
    let percent_change = PercentChange {
        mom: pct_change(total_volume, prev_month),
        yoy: pct_change(total_volume, prev_year),
    };

    let tests_per_fte = tests_per_fte(config, period, total_volume, productivity);

    Ok(PeriodMetrics {
        period: period.clone(),
        cytogenetics_total_volume: VolumeMetric {
            total: cyto_total,
            status: volume_status,
        },
        total_volume,
        tat,
        percent_change,
        tests_per_fte,
    })
}

fn period_bounds(period: &Period) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let start = NaiveDate::parse_from_str(&period.start_date, "%Y-%m-%d")
        .map_err(|e| KpiError::InvalidPeriod(e.to_string()))?;
    let end = NaiveDate::parse_from_str(&period.end_date, "%Y-%m-%d")
        .map_err(|e| KpiError::InvalidPeriod(e.to_string()))?;
    bounds_from_dates(start, end)
}

fn bounds_from_dates(start: NaiveDate, end: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let end_of_day = end
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| KpiError::InvalidPeriod("bad end date".to_string()))?;
    Ok((start.and_hms_opt(0, 0, 0).unwrap_or_default(), end_of_day))
}

/// Period placement timestamp: resulted-at, else received-at.
fn timestamp(record: &TestRecord) -> Option<NaiveDateTime> {
    record
        .resulted_at
        .as_deref()
        .and_then(parse_datetime_text)
        .or_else(|| record.received_at.as_deref().and_then(parse_datetime_text))
}

/// TAT for the period view: the lifecycle-timestamp difference when both
/// bounds parse, else the directly-supplied hours column.
fn tat_hours(record: &TestRecord) -> Option<f64> {
    let derived = (|| {
        let start = parse_datetime_text(record.received_at.as_deref()?)?;
        let end = parse_datetime_text(record.resulted_at.as_deref()?)?;
        (end >= start).then(|| (end - start).num_seconds() as f64 / 3600.0)
    })();
    derived.or_else(|| record.positive_tat())
}

fn tat_metric(values: &[f64], thresholds: &Thresholds) -> TatMetric {
    if values.is_empty() {
        return TatMetric {
            count: 0,
            min_hours: None,
            avg_hours: None,
            max_hours: None,
            status: KpiStatus::Unknown,
        };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let status = match thresholds {
        Thresholds {
            critical: Some(c), ..
        } if avg >= *c => KpiStatus::Critical,
        Thresholds {
            warning: Some(w), ..
        } if avg >= *w => KpiStatus::Warning,
        _ => KpiStatus::Ok,
    };
    if status == KpiStatus::Critical {
        tracing::error!(avg_hours = avg, "average TAT critically high");
    } else if status == KpiStatus::Warning {
        tracing::warn!(avg_hours = avg, "average TAT above warning threshold");
    }
    TatMetric {
        count: values.len(),
        min_hours: Some(min),
        avg_hours: Some(avg),
        max_hours: Some(max),
        status,
    }
}

/// Volume breaches its thresholds from above: a low count is the problem.
fn volume_status(value: usize, thresholds: &Thresholds) -> KpiStatus {
    let value = value as f64;
    if thresholds.critical.is_some_and(|c| value <= c) {
        KpiStatus::Critical
    } else if thresholds.warning.is_some_and(|w| value <= w) {
        KpiStatus::Warning
    } else {
        KpiStatus::Ok
    }
}

/// Count of tests placed in the period shifted back by `months`.
fn shifted_count(
    tests: &[TestRecord],
    start: NaiveDateTime,
    end: NaiveDateTime,
    months: u32,
) -> Option<usize> {
    let shift = Months::new(months);
    let start = start.date().checked_sub_months(shift)?;
    let end = end.date().checked_sub_months(shift)?;
    let (start, end) = bounds_from_dates(start, end).ok()?;
    Some(
        tests
            .iter()
            .filter(|t| timestamp(t).is_some_and(|ts| ts >= start && ts <= end))
            .count(),
    )
}

fn pct_change(current: usize, previous: Option<usize>) -> Option<f64> {
    let previous = previous?;
    (previous > 0).then(|| (current as f64 - previous as f64) * 100.0 / previous as f64)
}

fn tests_per_fte(
    config: &KpiConfig,
    period: &Period,
    total_volume: usize,
    productivity: &[ProductivityRecord],
) -> TestsPerFte {
    let total_hours = (!productivity.is_empty()).then(|| {
        productivity
            .iter()
            .filter(|r| period.contains_date(&r.date))
            .map(record_hours)
            .sum::<f64>()
    });
    let fte_equivalents = total_hours
        .filter(|h| *h > 0.0 && config.hours_per_fte_day > 0.0)
        .map(|h| h / config.hours_per_fte_day);
    let value = fte_equivalents
        .filter(|f| *f > 0.0)
        .map(|f| total_volume as f64 / f);
    TestsPerFte {
        tests: total_volume,
        total_hours,
        fte_equivalents,
        hours_per_fte_day: config.hours_per_fte_day,
        value,
    }
}

/// Hours preference order: worked, then remote + in-lab, then total.
fn record_hours(record: &ProductivityRecord) -> f64 {
    if let Some(hours) = record.hours_worked {
        return hours;
    }
    let remote = record.remote_hours.unwrap_or(0.0);
    let in_lab = record.in_lab_hours.unwrap_or(0.0);
    if remote != 0.0 || in_lab != 0.0 {
        return remote + in_lab;
    }
    record.total_hours.unwrap_or(0.0)
}

//! Daily table over a custom inclusive date range.

use std::collections::HashMap;

use chrono::NaiveDate;

use labkpi_model::{DailyKpiRow, Period, TestRecord};

use crate::bucket::CaseBucket;
use crate::case::strict_iso_date;

/// Enumerates `YYYY-MM-DD` strings from start to end inclusive. Invalid or
/// inverted bounds yield an empty list.
pub fn enumerate_dates(start: &str, end: &str) -> Vec<String> {
    let (Some(start), Some(end)) = (parse(start), parse(end)) else {
        return Vec::new();
    };
    if start > end {
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

fn parse(value: &str) -> Option<NaiveDate> {
    strict_iso_date(value)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Builds one row per day of the range, bucketing records by exact
/// `work_date`. Same case semantics as the monthly table, minus the
/// year-over-year dimension.
pub fn daily_table(tests: &[TestRecord], range: &Period, tat_standard_hours: f64) -> Vec<DailyKpiRow> {
    let days = enumerate_dates(&range.start_date, &range.end_date);
    if days.is_empty() {
        return Vec::new();
    }
    let index: HashMap<&str, usize> = days
        .iter()
        .enumerate()
        .map(|(i, d)| (d.as_str(), i))
        .collect();

    let mut buckets: Vec<CaseBucket> = days.iter().map(|_| CaseBucket::default()).collect();
    for (idx, record) in tests.iter().enumerate() {
        if !record.is_cyto() {
            continue;
        }
        let Some(day) = record.work_date.as_deref().and_then(strict_iso_date) else {
            continue;
        };
        if let Some(&i) = index.get(day) {
            buckets[i].observe(record, idx);
        }
    }

    days.into_iter()
        .zip(buckets)
        .map(|(date, bucket)| {
            let stats = bucket.summarize(tat_standard_hours);
            DailyKpiRow {
                date,
                total: stats.total,
                abnormal_cases: stats.abnormal_cases,
                failures: stats.failures,
                stat_cases: stats.stat_cases,
                avg_tat: stats.avg_tat,
                stat_avg_tat: stats.stat_avg_tat,
                tat_over_std_pct: stats.tat_over_std_pct,
            }
        })
        .collect()
}

//! Monthly dashboard table with year-over-year and month-over-month change.

use std::collections::HashSet;

use labkpi_model::{MonthlyKpiRow, TestRecord};

use crate::bucket::CaseBucket;
use crate::case::{case_key, parse_year_month};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Builds the 12-row monthly table for `year`.
///
/// Records are bucketed strictly by their `work_date` string; rows without
/// a strict `YYYY-MM-DD` work date are excluded rather than falling back
/// to received/resulted timestamps, which may be timezone-shifted.
pub fn monthly_table(
    tests: &[TestRecord],
    year: i32,
    tat_standard_hours: f64,
) -> Vec<MonthlyKpiRow> {
    let mut this_year: [CaseBucket; 12] = Default::default();
    let mut prev_year: [HashSet<String>; 12] = Default::default();

    for (idx, record) in tests.iter().enumerate() {
        if !record.is_cyto() {
            continue;
        }
        let Some((y, m)) = record.work_date.as_deref().and_then(parse_year_month) else {
            continue;
        };
        if y == year {
            this_year[m as usize].observe(record, idx);
        } else if y == year - 1 {
            prev_year[m as usize].insert(case_key(record, idx));
        }
    }

    let this_year_counts: Vec<usize> = this_year.iter().map(CaseBucket::case_count).collect();
    let dec_prev_year = prev_year[11].len();

    (0..12)
        .map(|m| {
            let stats = this_year[m].summarize(tat_standard_hours);
            let prev_year_count = prev_year[m].len();
            let prev_month_count = if m == 0 {
                dec_prev_year
            } else {
                this_year_counts[m - 1]
            };
            MonthlyKpiRow {
                month_index: m as u32,
                month_name: MONTH_NAMES[m].to_string(),
                total: stats.total,
                yoy: percent_change(stats.total, prev_year_count),
                mom: percent_change(stats.total, prev_month_count),
                abnormal_cases: stats.abnormal_cases,
                percent_abnormal: (stats.total > 0)
                    .then(|| stats.abnormal_cases as f64 * 100.0 / stats.total as f64),
                failures: stats.failures,
                stat_cases: stats.stat_cases,
                avg_tat: stats.avg_tat,
                stat_avg_tat: stats.stat_avg_tat,
                tat_over_std_pct: stats.tat_over_std_pct,
            }
        })
        .collect()
}

/// `None` when the denominator is zero, never a division by zero.
pub fn percent_change(current: usize, previous: usize) -> Option<f64> {
    (previous > 0).then(|| (current as f64 - previous as f64) * 100.0 / previous as f64)
}

//! One aggregation bucket (a month or a calendar day).

use std::collections::HashMap;

use labkpi_model::TestRecord;

use crate::case::{CaseAggregate, case_key};

/// Accumulates case aggregates and the row-level TAT list for one bucket.
/// Row-level and case-level TAT averages are kept distinct on purpose.
#[derive(Debug, Default)]
pub struct CaseBucket {
    cases: HashMap<String, CaseAggregate>,
    row_tats: Vec<f64>,
}

/// Derived numbers for one bucket, shared by the monthly and daily tables.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub total: usize,
    pub abnormal_cases: usize,
    pub failures: usize,
    pub stat_cases: usize,
    pub avg_tat: Option<f64>,
    pub stat_avg_tat: Option<f64>,
    pub tat_over_std_pct: Option<f64>,
}

impl CaseBucket {
    pub fn observe(&mut self, record: &TestRecord, row_index: usize) {
        if let Some(tat) = record.positive_tat() {
            self.row_tats.push(tat);
        }
        self.cases
            .entry(case_key(record, row_index))
            .or_default()
            .observe(record);
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn summarize(&self, tat_standard_hours: f64) -> BucketStats {
        let mut abnormal_cases = 0;
        let mut failures = 0;
        let mut stat_cases = 0;
        let mut stat_tat_sum = 0.0;
        let mut stat_tat_n = 0usize;
        for agg in self.cases.values() {
            if agg.abn {
                abnormal_cases += 1;
            }
            if agg.fail {
                failures += 1;
            }
            if agg.prio0 {
                stat_cases += 1;
                if let Some(mean) = agg.mean_tat() {
                    stat_tat_sum += mean;
                    stat_tat_n += 1;
                }
            }
        }

        let tat_n = self.row_tats.len();
        let tat_sum: f64 = self.row_tats.iter().sum();
        let over_std = self
            .row_tats
            .iter()
            .filter(|t| **t > tat_standard_hours)
            .count();

        BucketStats {
            total: self.cases.len(),
            abnormal_cases,
            failures,
            stat_cases,
            avg_tat: (tat_n > 0).then(|| tat_sum / tat_n as f64),
            stat_avg_tat: (stat_tat_n > 0).then(|| stat_tat_sum / stat_tat_n as f64),
            tat_over_std_pct: (tat_n > 0).then(|| over_std as f64 * 100.0 / tat_n as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_case_number_collapses_to_one_case() {
        let mut bucket = CaseBucket::default();
        let mut first = TestRecord::new("CYTO");
        first.case_no = Some("C100".to_string());
        first.abn_norm = Some('A');
        let mut second = TestRecord::new("CYTO");
        second.case_no = Some("C100".to_string());

        bucket.observe(&first, 0);
        bucket.observe(&second, 1);
        let stats = bucket.summarize(48.0);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.abnormal_cases, 1);
    }

    #[test]
    fn unkeyed_rows_are_singletons() {
        let mut bucket = CaseBucket::default();
        bucket.observe(&TestRecord::new("CYTO"), 0);
        bucket.observe(&TestRecord::new("CYTO"), 1);
        assert_eq!(bucket.case_count(), 2);
    }

    #[test]
    fn row_level_and_case_level_averages_differ() {
        // C1 has rows 2h and 4h, C2 one row of 9h. Row-level mean is 5h;
        // the STAT average uses per-case means.
        let mut bucket = CaseBucket::default();
        for (case, tat, prio) in [("C1", 2.0, Some(0.0)), ("C1", 4.0, None), ("C2", 9.0, None)] {
            let mut record = TestRecord::new("CYTO");
            record.case_no = Some(case.to_string());
            record.tat_hours = Some(tat);
            record.priority = prio;
            bucket.observe(&record, 0);
        }
        let stats = bucket.summarize(8.0);
        assert_eq!(stats.avg_tat, Some(5.0));
        assert_eq!(stats.stat_cases, 1);
        assert_eq!(stats.stat_avg_tat, Some(3.0));
        // One of three rows exceeds the 8h standard.
        let pct = stats.tat_over_std_pct.unwrap();
        assert!((pct - 100.0 / 3.0).abs() < 1e-9);
    }
}

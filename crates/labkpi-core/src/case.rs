//! Per-case accumulation shared by the monthly and daily tables.

use labkpi_model::TestRecord;

use crate::flags::detect_flags;

/// OR-accumulated state for all rows sharing one case key within a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaseAggregate {
    pub abn: bool,
    pub fail: bool,
    pub stat: bool,
    pub prio0: bool,
    pub tat_sum: f64,
    pub tat_n: usize,
}

impl CaseAggregate {
    /// Folds one lifecycle row into the case.
    pub fn observe(&mut self, record: &TestRecord) {
        match record.abn_norm.map(|c| c.to_ascii_uppercase()) {
            Some('A') => self.abn = true,
            Some('F') => self.fail = true,
            _ => {}
        }
        if detect_flags(record).stat {
            self.stat = true;
        }
        if record.is_priority_stat() {
            self.prio0 = true;
        }
        if let Some(tat) = record.positive_tat() {
            self.tat_sum += tat;
            self.tat_n += 1;
        }
    }

    /// Per-case mean TAT over this case's TAT-bearing rows.
    pub fn mean_tat(&self) -> Option<f64> {
        (self.tat_n > 0).then(|| self.tat_sum / self.tat_n as f64)
    }
}

/// Deduplication key: the normalized case number, or a synthetic per-row
/// key so un-numbered rows count as singleton cases without ever merging.
pub fn case_key(record: &TestRecord, row_index: usize) -> String {
    record
        .case_no
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| format!("__row_{row_index}"))
}

/// Year and 0-based month of a strict `YYYY-MM-DD` string. Anything looser
/// (timestamps, slash dates) is rejected so bucketing never drifts.
pub fn parse_year_month(work_date: &str) -> Option<(i32, u32)> {
    strict_iso_date(work_date)?;
    let year = work_date[0..4].parse().ok()?;
    let month: u32 = work_date[5..7].parse().ok()?;
    (1..=12).contains(&month).then_some((year, month - 1))
}

/// True only for exactly `YYYY-MM-DD`.
pub fn strict_iso_date(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());
    digits_ok.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_or_accumulate_across_rows() {
        let mut agg = CaseAggregate::default();
        let mut first = TestRecord::new("CYTO");
        first.abn_norm = Some('A');
        first.tat_hours = Some(6.0);
        let mut second = TestRecord::new("CYTO");
        second.priority = Some(0.0);
        second.tat_hours = Some(10.0);

        agg.observe(&first);
        agg.observe(&second);
        assert!(agg.abn);
        assert!(!agg.fail);
        assert!(agg.prio0);
        assert_eq!(agg.mean_tat(), Some(8.0));
    }

    #[test]
    fn non_positive_tat_is_excluded() {
        let mut agg = CaseAggregate::default();
        let mut record = TestRecord::new("CYTO");
        record.tat_hours = Some(0.0);
        agg.observe(&record);
        assert_eq!(agg.mean_tat(), None);
    }

    #[test]
    fn synthetic_keys_never_collide_with_real_cases() {
        let mut record = TestRecord::new("CYTO");
        assert_eq!(case_key(&record, 3), "__row_3");
        record.case_no = Some("C100".to_string());
        assert_eq!(case_key(&record, 3), "C100");
    }

    #[test]
    fn strict_date_parsing() {
        assert_eq!(parse_year_month("2024-06-01"), Some((2024, 5)));
        assert_eq!(parse_year_month("2024-6-1"), None);
        assert_eq!(parse_year_month("2024-06-01T10:00:00"), None);
        assert_eq!(parse_year_month("06/01/2024"), None);
    }
}

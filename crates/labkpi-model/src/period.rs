//! Caller-selected reporting period.

use serde::{Deserialize, Serialize};

use crate::error::{KpiError, Result};

/// Inclusive date range as `YYYY-MM-DD` strings. Used to filter
/// productivity records; test records are bucketed by their own work date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start_date: String,
    pub end_date: String,
}

fn parse_iso_date(value: &str) -> Option<(i32, u32, u32)> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[5..7].parse().ok()?;
    let day = value[8..10].parse().ok()?;
    if (1..=12).contains(&month) && (1..=31).contains(&day) {
        Some((year, month, day))
    } else {
        None
    }
}

impl Period {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Validates both bounds and their ordering.
    pub fn validate(&self) -> Result<()> {
        let start = parse_iso_date(&self.start_date)
            .ok_or_else(|| KpiError::InvalidPeriod(format!("bad start_date {}", self.start_date)))?;
        let end = parse_iso_date(&self.end_date)
            .ok_or_else(|| KpiError::InvalidPeriod(format!("bad end_date {}", self.end_date)))?;
        if end < start {
            return Err(KpiError::InvalidPeriod(
                "end_date must be on/after start_date".to_string(),
            ));
        }
        Ok(())
    }

    /// Inclusive containment test on an ISO date string. The end bound is
    /// treated as end-of-day, so lexicographic comparison on date-only
    /// strings is exact.
    pub fn contains_date(&self, iso_date: &str) -> bool {
        !iso_date.is_empty()
            && iso_date >= self.start_date.as_str()
            && iso_date <= self.end_date.as_str()
    }

    /// Year of the period start, used to drive the monthly dashboard table.
    pub fn start_year(&self) -> Option<i32> {
        parse_iso_date(&self.start_date).map(|(y, _, _)| y)
    }
}

//! Canonical record shapes produced by the ingestion pipeline.
//!
//! Both record types round-trip losslessly through JSON: absent optionals
//! are omitted on serialization and default to `None` on deserialization,
//! so a record edited as text re-ingests identically.

use serde::{Deserialize, Serialize};

/// One case-handling event. A single case may span several source rows,
/// each representing one stage of its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Fixed domain tag, e.g. "CYTO".
    pub category: String,
    /// Normalized case identifier (uppercased, trimmed). Rows without one
    /// are counted as synthetic singleton cases, never merged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_no: Option<String>,
    /// Single-letter classification flag: 'A' abnormal, 'F' failure,
    /// 'N' normal, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abn_norm: Option<char>,
    /// Turnaround time in hours; always positive when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tat_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulted_at: Option<String>,
    /// ISO date (`YYYY-MM-DD`) the case is attributed to. This is the
    /// authoritative grouping key; received/resulted timestamps are never
    /// used for bucketing because they may be null or timezone-shifted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_techs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc_people: Option<Vec<String>>,
    /// Numeric order priority. Exactly 0 marks a medically-STAT case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    /// Free-text result/interpretation, scanned for abnormal/failure/STAT
    /// markers as a secondary signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TestRecord {
    /// A bare record carrying only the category tag.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            case_no: None,
            abn_norm: None,
            tat_hours: None,
            received_at: None,
            resulted_at: None,
            work_date: None,
            analyzed_by: None,
            analyzed_techs: None,
            reviewed_by: None,
            reviewers: None,
            qc_by: None,
            qc_people: None,
            priority: None,
            result: None,
            status: None,
            notes: None,
        }
    }

    /// True when the record belongs to the cytogenetics category under any
    /// of its recognized spellings.
    pub fn is_cyto(&self) -> bool {
        matches!(
            self.category.trim().to_uppercase().as_str(),
            "CYTO" | "CYTOGENETICS" | "KARYOTYPE" | "KARYOTYPING"
        )
    }

    /// Positive, finite TAT hours, or `None`.
    pub fn positive_tat(&self) -> Option<f64> {
        self.tat_hours.filter(|t| t.is_finite() && *t > 0.0)
    }

    /// True when the priority column flags a medical-STAT case (exact 0).
    pub fn is_priority_stat(&self) -> bool {
        self.priority == Some(0.0)
    }
}

/// One staff-day of work from a productivity export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityRecord {
    /// ISO date (`YYYY-MM-DD`); empty when the source row had no usable
    /// date even after forward-fill.
    pub date: String,
    /// Stable identifier; falls back to the staff name when the export has
    /// no id column.
    pub staff_id: String,
    pub staff_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_lab_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<f64>,
}

/// Uppercases and trims a case number for deduplication. Returns `None`
/// for blank input.
pub fn normalize_case_no(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

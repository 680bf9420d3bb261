//! Aggregation engine for canonical lab records.
//!
//! Groups test records by unique case per month, day, and staff member,
//! and derives period-level metrics with threshold statuses. Everything
//! here is a pure transformation over in-memory data; each call recomputes
//! from scratch.

pub mod bucket;
pub mod case;
pub mod daily;
pub mod employees;
pub mod flags;
pub mod metrics;
pub mod monthly;
pub mod staff;

pub use bucket::{BucketStats, CaseBucket};
pub use case::{CaseAggregate, case_key, parse_year_month, strict_iso_date};
pub use daily::{daily_table, enumerate_dates};
pub use employees::aggregate_employees;
pub use flags::{RecordFlags, detect_flags};
pub use metrics::compute_period_metrics;
pub use monthly::{monthly_table, percent_change};
pub use staff::{qc_counts, reviewer_counts, technician_kpis};

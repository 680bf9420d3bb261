//! Staff workload summaries from productivity records.

use std::collections::{BTreeMap, HashSet};

use labkpi_model::{EmployeeSummary, ProductivityRecord};

#[derive(Default)]
struct StaffAggregate {
    staff_name: String,
    total_hours: f64,
    remote_hours: f64,
    in_lab_hours: f64,
    dates: HashSet<String>,
}

/// Groups productivity records by staff id, summing hours and tracking
/// distinct worked dates. Sorted descending by total hours.
pub fn aggregate_employees(
    records: &[ProductivityRecord],
    hours_per_fte_day: f64,
) -> Vec<EmployeeSummary> {
    let mut by_staff: BTreeMap<String, StaffAggregate> = BTreeMap::new();
    for record in records {
        let staff_id = if record.staff_id.trim().is_empty() {
            "UNKNOWN".to_string()
        } else {
            record.staff_id.clone()
        };
        let agg = by_staff.entry(staff_id).or_default();
        if agg.staff_name.is_empty() {
            agg.staff_name = record.staff_name.clone();
        }
        agg.total_hours += record.hours_worked.or(record.total_hours).unwrap_or(0.0);
        agg.remote_hours += record.remote_hours.unwrap_or(0.0);
        agg.in_lab_hours += record.in_lab_hours.unwrap_or(0.0);
        if !record.date.is_empty() {
            agg.dates.insert(record.date.clone());
        }
    }

    let mut rows: Vec<EmployeeSummary> = by_staff
        .into_iter()
        .map(|(staff_id, agg)| EmployeeSummary {
            staff_id,
            staff_name: agg.staff_name,
            days_worked: agg.dates.len(),
            total_hours: agg.total_hours,
            remote_hours: agg.remote_hours,
            in_lab_hours: agg.in_lab_hours,
            fte_equivalents: (hours_per_fte_day != 0.0)
                .then(|| agg.total_hours / hours_per_fte_day),
            remote_pct: (agg.total_hours > 0.0)
                .then(|| agg.remote_hours * 100.0 / agg.total_hours),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_hours
            .total_cmp(&a.total_hours)
            .then_with(|| a.staff_id.cmp(&b.staff_id))
    });
    rows
}

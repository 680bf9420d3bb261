//! Row mapping for staff productivity exports.

use labkpi_model::{Period, ProductivityRecord, Result};

use crate::coerce::{parse_hours, to_iso_date_only};
use crate::columns::ProductivityColumns;
use crate::grid::{Cell, cell_at};
use crate::fill::forward_fill;

/// Maps capped, blank-filtered grid rows into productivity records,
/// keeping only rows whose (forward-filled) date falls inside the period.
pub fn map_productivity_rows(
    headers: &[String],
    rows: &[Vec<Cell>],
    period: &Period,
) -> Result<Vec<ProductivityRecord>> {
    let columns = ProductivityColumns::locate(headers, rows)?;

    let dates = forward_fill(
        rows.iter()
            .map(|row| to_iso_date_only(cell_at(row, columns.date))),
    );

    let records = rows
        .iter()
        .zip(dates)
        .filter_map(|(row, date)| {
            let date = date.unwrap_or_default();
            if !period.contains_date(&date) {
                return None;
            }
            Some(map_row(&columns, row, date))
        })
        .collect();
    Ok(records)
}

fn map_row(columns: &ProductivityColumns, row: &[Cell], date: String) -> ProductivityRecord {
    let staff_name = text_field(row, columns.staff_name);
    let staff_id_raw = text_field(row, columns.staff_id);

    let remote_hours = columns.remote.and_then(|idx| parse_hours(cell_at(row, idx)));
    let in_lab_hours = columns.in_lab.and_then(|idx| parse_hours(cell_at(row, idx)));
    let mut hours_worked = columns.hours.and_then(|idx| parse_hours(cell_at(row, idx)));

    // total = remote + in-lab when either side is present; hours_worked
    // defaults to the derived total.
    let total_hours = match (remote_hours, in_lab_hours) {
        (None, None) => None,
        (remote, in_lab) => Some(remote.unwrap_or(0.0) + in_lab.unwrap_or(0.0)),
    };
    if hours_worked.is_none() {
        hours_worked = total_hours;
    }

    let staff_id = if !staff_id_raw.is_empty() {
        staff_id_raw
    } else {
        staff_name.clone()
    };

    ProductivityRecord {
        date,
        staff_id,
        staff_name,
        hours_worked,
        remote_hours,
        in_lab_hours,
        total_hours,
    }
}

fn text_field(row: &[Cell], idx: Option<usize>) -> String {
    idx.map(|i| cell_at(row, i).text().trim().to_string())
        .unwrap_or_default()
}

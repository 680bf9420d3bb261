//! Row mapping for tests/case exports.

use labkpi_model::{TestRecord, normalize_case_no};

use crate::coerce::{parse_priority, parse_tat_hours, to_iso_date_only, to_iso_datetime};
use crate::columns::TestColumns;
use crate::fill::forward_fill;
use crate::grid::{Cell, cell_at};
use crate::names::{extract_names, is_likely_person_name};

/// Spreadsheet column P, the conventional reviewer position when the
/// header row does not name one.
const REVIEWER_FALLBACK_COL: usize = 15;
/// Spreadsheet column R for the QC performer.
const QC_FALLBACK_COL: usize = 17;

/// Maps capped, blank-filtered grid rows into canonical test records.
///
/// Rows flagged incomplete (no end timestamp and a falsy "1-case" flag)
/// are skipped before the work-date forward-fill runs, so a skipped row's
/// date never propagates into later rows.
pub fn map_test_rows(columns: &TestColumns, rows: &[Vec<Cell>]) -> Vec<TestRecord> {
    let kept: Vec<&Vec<Cell>> = rows
        .iter()
        .filter(|row| {
            let ended = end_timestamp(columns, row);
            if ended.is_some() {
                return true;
            }
            let flag = columns
                .one_case
                .map(|idx| cell_at(row, idx).text().to_lowercase())
                .unwrap_or_default();
            !matches!(flag.as_str(), "false" | "0" | "no")
        })
        .collect();

    let work_dates = forward_fill(kept.iter().map(|row| {
        columns
            .work_date
            .and_then(|idx| to_iso_date_only(cell_at(row, idx)))
    }));

    kept.iter()
        .zip(work_dates)
        .map(|(row, work_date)| map_row(columns, row, work_date))
        .collect()
}

fn map_row(columns: &TestColumns, row: &[Cell], work_date: Option<String>) -> TestRecord {
    let mut record = TestRecord::new("CYTO");
    record.work_date = work_date;
    record.resulted_at = end_timestamp(columns, row);
    record.received_at = start_timestamp(columns, row);
    record.case_no = columns
        .case_no
        .and_then(|idx| normalize_case_no(&cell_at(row, idx).text()));
    record.abn_norm = columns.abn_norm.and_then(|idx| {
        cell_at(row, idx)
            .text()
            .trim()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
    });
    record.tat_hours = columns.tat.and_then(|idx| parse_tat_hours(cell_at(row, idx)));
    record.priority = columns.priority.and_then(|idx| parse_priority(cell_at(row, idx)));

    let analyzed = columns
        .analyzed_any
        .map(|idx| cell_at(row, idx).text().trim().to_string())
        .filter(|s| !s.is_empty());
    record.analyzed_techs = analyzed
        .as_deref()
        .map(extract_names)
        .filter(|names| !names.is_empty());
    record.analyzed_by = analyzed;

    let reviewed = role_cell(row, columns.reviewed_by, REVIEWER_FALLBACK_COL);
    record.reviewers = reviewed.as_deref().map(filtered_names).filter(|n| !n.is_empty());
    record.reviewed_by = reviewed;

    let qc = role_cell(row, columns.qc_by, QC_FALLBACK_COL);
    record.qc_people = qc.as_deref().map(filtered_names).filter(|n| !n.is_empty());
    record.qc_by = qc;

    record
}

/// Case end timestamp: reviewed-by adjacent date-time, then the "1-case"
/// adjacent date-time, then the analyzed-by adjacent date-time.
fn end_timestamp(columns: &TestColumns, row: &[Cell]) -> Option<String> {
    let idx = columns
        .reviewed_datetime
        .or(columns.one_case_datetime)
        .or(columns.analyzed_datetime)?;
    to_iso_datetime(cell_at(row, idx))
}

/// Case start timestamp: triage date-time, then analyzed-by adjacent.
fn start_timestamp(columns: &TestColumns, row: &[Cell]) -> Option<String> {
    let idx = columns.triage.or(columns.analyzed_datetime)?;
    to_iso_datetime(cell_at(row, idx))
}

/// Header-located role cell with the positional fallback applied when the
/// lookup failed or the cell is empty and the row is wide enough.
fn role_cell(row: &[Cell], idx: Option<usize>, fallback: usize) -> Option<String> {
    let mut value = idx
        .map(|i| cell_at(row, i).text().trim().to_string())
        .unwrap_or_default();
    if value.is_empty() && row.len() > fallback {
        value = cell_at(row, fallback).text().trim().to_string();
    }
    (!value.is_empty()).then_some(value)
}

fn filtered_names(raw: &str) -> Vec<String> {
    extract_names(raw)
        .into_iter()
        .filter(|name| is_likely_person_name(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::normalize_header;

    fn columns(headers: &[&str]) -> TestColumns {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        TestColumns::locate(&normalized)
    }

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text((*c).to_string())
                }
            })
            .collect()
    }

    const HEADERS: &[&str] = &[
        "Worksheet Date",
        "Triage Date/Time (Job Creation)",
        "Case #",
        "Abn/Norm",
        "TAT",
        "Prty",
        "Analyzed by",
        "Analyzed Date/Time",
        "Reviewed by",
        "Reviewed Date/Time",
        "Do QC",
    ];

    #[test]
    fn maps_a_complete_row() {
        let cols = columns(HEADERS);
        let rows = vec![text_row(&[
            "2024-06-01",
            "2024-06-01 08:00",
            "c100",
            "abnormal",
            "5:30",
            "0",
            "Smith, J. / Doe, A.",
            "2024-06-01 10:00",
            "Lee",
            "2024-06-01 13:30",
            "Kay",
        ])];
        let records = map_test_rows(&cols, &rows);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.category, "CYTO");
        assert_eq!(r.case_no.as_deref(), Some("C100"));
        assert_eq!(r.abn_norm, Some('A'));
        assert_eq!(r.tat_hours, Some(5.5));
        assert_eq!(r.priority, Some(0.0));
        assert!(r.is_priority_stat());
        assert_eq!(r.work_date.as_deref(), Some("2024-06-01"));
        assert_eq!(r.received_at.as_deref(), Some("2024-06-01T08:00:00"));
        assert_eq!(r.resulted_at.as_deref(), Some("2024-06-01T13:30:00"));
        assert_eq!(
            r.analyzed_techs.as_deref(),
            Some(["Smith, J.".to_string(), "Doe, A.".to_string()].as_slice())
        );
        assert_eq!(r.reviewers.as_deref(), Some(["Lee".to_string()].as_slice()));
        assert_eq!(r.qc_people.as_deref(), Some(["Kay".to_string()].as_slice()));
    }

    #[test]
    fn work_date_forward_fills_blanks() {
        let cols = columns(HEADERS);
        let rows = vec![
            text_row(&["2024-01-05", "", "C1"]),
            text_row(&["", "", "C2"]),
            text_row(&["", "", "C3"]),
            text_row(&["2024-01-06", "", "C4"]),
        ];
        let dates: Vec<Option<String>> = map_test_rows(&cols, &rows)
            .into_iter()
            .map(|r| r.work_date)
            .collect();
        assert_eq!(
            dates,
            vec![
                Some("2024-01-05".to_string()),
                Some("2024-01-05".to_string()),
                Some("2024-01-05".to_string()),
                Some("2024-01-06".to_string()),
            ]
        );
    }

    #[test]
    fn incomplete_one_case_rows_are_skipped() {
        let cols = columns(&["Date", "1-Case", "Completed Date/Time", "Case #"]);
        let rows = vec![
            text_row(&["2024-06-01", "TRUE", "2024-06-01 10:00", "C1"]),
            text_row(&["2024-06-02", "FALSE", "", "C2"]),
            text_row(&["2024-06-03", "no", "", "C3"]),
            text_row(&["", "TRUE", "2024-06-04 09:00", "C4"]),
        ];
        let records = map_test_rows(&cols, &rows);
        let cases: Vec<Option<String>> = records.iter().map(|r| r.case_no.clone()).collect();
        assert_eq!(
            cases,
            vec![Some("C1".to_string()), Some("C4".to_string())]
        );
        // The skipped rows' dates must not leak through the forward-fill.
        assert_eq!(records[1].work_date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn numeric_case_numbers_keep_their_digits() {
        let cols = columns(&["Date", "Case #", "TAT"]);
        let rows = vec![vec![
            Cell::Text("2024-06-01".to_string()),
            Cell::Number(100.0),
            Cell::Number(8.0),
        ]];
        let records = map_test_rows(&cols, &rows);
        assert_eq!(records[0].case_no.as_deref(), Some("100"));
        assert_eq!(records[0].tat_hours, Some(8.0));
    }

    #[test]
    fn reviewer_and_qc_positional_fallback() {
        let cols = columns(&["Date", "Case #", "TAT"]);
        let mut row = vec![Cell::Empty; 18];
        row[0] = Cell::Text("2024-06-01".to_string());
        row[1] = Cell::Text("C9".to_string());
        row[15] = Cell::Text("Lee / Tech".to_string());
        row[17] = Cell::Text("Kay".to_string());
        let records = map_test_rows(&cols, &[row]);
        let r = &records[0];
        assert_eq!(r.reviewed_by.as_deref(), Some("Lee / Tech"));
        // The label token is filtered out of the name list but kept in the
        // raw text.
        assert_eq!(r.reviewers.as_deref(), Some(["Lee".to_string()].as_slice()));
        assert_eq!(r.qc_people.as_deref(), Some(["Kay".to_string()].as_slice()));
    }
}

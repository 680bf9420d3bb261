//! Top-level ingestion entry point: bytes in, canonical records out.

use labkpi_model::{KpiError, Period, ProductivityRecord, Result, TestRecord};

use crate::columns::TestColumns;
use crate::delimited::parse_delimited;
use crate::grid::{Grid, row_is_blank};
use crate::header::{detect_header_row, normalize_header};
use crate::map_productivity::map_productivity_rows;
use crate::map_tests::map_test_rows;
use crate::workbook::read_first_sheet;

/// Hard cap on data rows, applied before blank-row filtering.
pub const MAX_DATA_ROWS: usize = 947;

/// Classified result of one upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedUpload {
    Tests(Vec<TestRecord>),
    Productivity(Vec<ProductivityRecord>),
}

/// Ingests one uploaded file.
///
/// `extension` is the caller's lowercase file-extension hint; binary
/// workbook extensions go through the sheet extractor, everything else is
/// treated as delimited text. The period filters productivity records
/// only; test records are bucketed by their own work date downstream.
///
/// Failures are all-or-nothing: any structural error clears the attempt
/// so the caller never sees half-mapped data.
pub fn ingest_upload(bytes: &[u8], extension: &str, period: &Period) -> Result<ParsedUpload> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    let grid = match extension.as_str() {
        "xlsx" | "xls" => read_first_sheet(bytes)?,
        _ => {
            let text = String::from_utf8_lossy(bytes);
            Grid::from_text_rows(parse_delimited(&text).rows)
        }
    };

    let header_row = detect_header_row(&grid.rows);
    let headers: Vec<String> = grid
        .rows
        .get(header_row)
        .map(|row| row.iter().map(|c| normalize_header(&c.text())).collect())
        .unwrap_or_default();
    let data: Vec<_> = grid
        .rows
        .into_iter()
        .skip(header_row + 1)
        .take(MAX_DATA_ROWS)
        .filter(|row| !row_is_blank(row))
        .collect();
    if headers.iter().all(String::is_empty) || data.is_empty() {
        return Err(KpiError::EmptyFile);
    }

    let columns = TestColumns::locate(&headers);
    if columns.looks_like_tests() {
        let tests = map_test_rows(&columns, &data);
        tracing::info!(rows = data.len(), records = tests.len(), "mapped tests export");
        if !tests.is_empty() {
            return Ok(ParsedUpload::Tests(tests));
        }
    }

    match map_productivity_rows(&headers, &data, period) {
        Ok(records) => {
            tracing::info!(
                rows = data.len(),
                records = records.len(),
                "mapped productivity export"
            );
            Ok(ParsedUpload::Productivity(records))
        }
        // A file that looked like a tests export but mapped to nothing
        // should not surface a misleading date-column complaint.
        Err(KpiError::MissingDateColumn { .. }) if columns.looks_like_tests() => {
            Err(KpiError::NoRecords)
        }
        Err(error) => Err(error),
    }
}

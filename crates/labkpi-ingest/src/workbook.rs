//! First-sheet grid extraction from binary workbooks.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use labkpi_model::{KpiError, Result};

use crate::grid::{Cell, Grid};

/// Reads the first sheet of an XLSX/XLS workbook into the shared grid.
///
/// Date-typed cells are materialized as date objects rather than display
/// strings so downstream coercion sees the same shape for text and binary
/// sources.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Grid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|error| KpiError::Workbook(error.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(KpiError::EmptyFile)?
        .map_err(|error| KpiError::Workbook(error.to_string()))?;

    let mut rows = Vec::with_capacity(range.height());
    for sheet_row in range.rows() {
        rows.push(sheet_row.iter().map(convert_cell).collect());
    }
    tracing::debug!(rows = rows.len(), "extracted workbook grid");
    Ok(Grid { rows })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::Date(naive),
            // Out-of-range serials fall back to the raw number; the
            // coercion layer applies the Excel epoch itself.
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

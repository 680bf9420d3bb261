//! Spreadsheet ingestion and normalization.
//!
//! Turns messy CSV/TSV/XLSX exports into canonical test and productivity
//! records: delimiter sniffing, quote-aware parsing, heuristic header and
//! column detection, multi-format date/duration coercion, person-name
//! extraction, and forward-fill of sparse date columns.

pub mod coerce;
pub mod columns;
pub mod delimited;
pub mod fill;
pub mod grid;
pub mod header;
pub mod map_productivity;
pub mod map_tests;
pub mod names;
pub mod upload;
pub mod workbook;

pub use coerce::{
    excel_serial_to_datetime, is_date_like, parse_hours, parse_priority, parse_tat_hours,
    to_iso_date_only, to_iso_datetime,
};
pub use columns::{ProductivityColumns, TestColumns};
pub use delimited::{DelimitedText, detect_delimiter, parse_delimited};
pub use fill::forward_fill;
pub use grid::{Cell, Grid, cell_at, row_is_blank};
pub use header::{detect_header_row, find_index_containing, guess_date_index, index_of_header, normalize_header};
pub use map_productivity::map_productivity_rows;
pub use map_tests::map_test_rows;
pub use names::{extract_names, is_likely_person_name};
pub use upload::{MAX_DATA_ROWS, ParsedUpload, ingest_upload};
pub use workbook::read_first_sheet;

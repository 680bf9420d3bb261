//! Header normalization, header-row location and column lookup.

use crate::coerce::is_date_like;
use crate::grid::Cell;

/// Rows probed when locating the header row.
const HEADER_PROBE_ROWS: usize = 10;
/// Rows sampled when guessing a date column by content.
const DATE_GUESS_SAMPLE_ROWS: usize = 50;
/// Minimum fraction of sampled cells that must look like dates.
const DATE_GUESS_MIN_RATIO: f64 = 0.3;

/// Collapses a header to its canonical alphanumeric form: lowercased with
/// everything outside `[a-z0-9]` removed, so "Reviewed By:" and
/// "reviewed_by" become the same token.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| {
            let lower = c.to_ascii_lowercase();
            lower.is_ascii_alphanumeric().then_some(lower)
        })
        .collect()
}

/// Domain keywords (normalized) that identify a header row in either a
/// tests or a productivity export.
const HEADER_KEYWORDS: &[&str] = &[
    "date",
    "workdate",
    "dateworked",
    "receiveddate",
    "collecteddate",
    "resulteddate",
    "signedoutdate",
    "dos",
    "servicedate",
    "workday",
    "day",
    "worksheetdate",
    "triage",
    "case",
    "analyzed",
    "reviewed",
    "datetime",
];

/// Scans the first ten rows for one whose cells match a domain keyword
/// (exact or substring, after normalization). First match wins; defaults
/// to row 0.
pub fn detect_header_row(rows: &[Vec<Cell>]) -> usize {
    for (idx, row) in rows.iter().take(HEADER_PROBE_ROWS).enumerate() {
        let normalized: Vec<String> = row.iter().map(|c| normalize_header(&c.text())).collect();
        let matches = HEADER_KEYWORDS.iter().any(|keyword| {
            normalized
                .iter()
                .any(|h| !h.is_empty() && h.contains(keyword))
        });
        if matches {
            return idx;
        }
    }
    0
}

/// Exact match of any normalized variant spelling, first hit wins.
pub fn index_of_header(headers: &[String], variants: &[&str]) -> Option<usize> {
    for variant in variants {
        let key = normalize_header(variant);
        if let Some(idx) = headers.iter().position(|h| *h == key) {
            return Some(idx);
        }
    }
    None
}

/// First header containing any normalized token as a substring. Used when
/// exact variants are insufficient (e.g. distinguishing "Do QC" from "QC").
pub fn find_index_containing(headers: &[String], tokens: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = tokens.iter().map(|t| normalize_header(t)).collect();
    headers.iter().position(|h| {
        !h.is_empty()
            && normalized
                .iter()
                .any(|t| !t.is_empty() && h.contains(t.as_str()))
    })
}

/// Content-based date-column fallback: samples up to 50 rows, scores each
/// column by date-like cells, and picks the best column if it clears the
/// 30% threshold.
pub fn guess_date_index(rows: &[Vec<Cell>]) -> Option<usize> {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if cols == 0 {
        return None;
    }
    let sample = rows.len().min(DATE_GUESS_SAMPLE_ROWS);
    let mut scores = vec![0usize; cols];
    for row in rows.iter().take(sample) {
        for (col, cell) in row.iter().enumerate() {
            if is_date_like(cell) {
                scores[col] += 1;
            }
        }
    }
    let (best, &score) = scores
        .iter()
        .enumerate()
        .max_by_key(|(_, score)| **score)?;
    if score == 0 || sample == 0 {
        return None;
    }
    let ratio = score as f64 / sample as f64;
    (ratio >= DATE_GUESS_MIN_RATIO).then_some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::Text((*c).to_string())).collect()
    }

    #[test]
    fn normalization_collapses_punctuation() {
        assert_eq!(normalize_header("Reviewed By:"), "reviewedby");
        assert_eq!(normalize_header("reviewed_by"), "reviewedby");
        assert_eq!(normalize_header("Date/Time (Job Creation)"), "datetimejobcreation");
        assert_eq!(normalize_header("  "), "");
    }

    #[test]
    fn header_row_found_past_title_rows() {
        let rows = vec![
            text_row(&["Cytogenetics monthly export", ""]),
            text_row(&["", ""]),
            text_row(&["Worksheet Date", "Case #", "Analyzed by"]),
            text_row(&["2024-06-01", "C100", "Smith"]),
        ];
        assert_eq!(detect_header_row(&rows), 2);
    }

    #[test]
    fn header_row_defaults_to_zero() {
        let rows = vec![text_row(&["alpha", "beta"]), text_row(&["1", "2"])];
        assert_eq!(detect_header_row(&rows), 0);
    }

    #[test]
    fn exact_and_substring_lookup() {
        let headers: Vec<String> = ["Case #", "Abn/Norm", "Do QC", "TAT"]
            .iter()
            .map(|h| normalize_header(h))
            .collect();
        assert_eq!(index_of_header(&headers, &["case", "case#", "caseno"]), Some(0));
        assert_eq!(index_of_header(&headers, &["abn/norm", "abnnorm"]), Some(1));
        assert_eq!(index_of_header(&headers, &["priority"]), None);
        assert_eq!(find_index_containing(&headers, &["do qc", "qc by"]), Some(2));
        assert_eq!(find_index_containing(&headers, &["missing"]), None);
    }

    #[test]
    fn date_column_guess_respects_threshold() {
        let rows: Vec<Vec<Cell>> = (0..10)
            .map(|i| {
                text_row(&[
                    "note",
                    if i < 4 { "2024-06-01" } else { "" },
                    "x",
                ])
            })
            .collect();
        assert_eq!(guess_date_index(&rows), Some(1));

        let sparse: Vec<Vec<Cell>> = (0..10)
            .map(|i| text_row(&["note", if i < 2 { "2024-06-01" } else { "" }]))
            .collect();
        assert_eq!(guess_date_index(&sparse), None);
        assert_eq!(guess_date_index(&[]), None);
    }
}

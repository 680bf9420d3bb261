//! Shared grid abstraction over text and binary spreadsheet sources.

use std::borrow::Cow;

use chrono::NaiveDateTime;

/// One raw cell. Text sources only ever produce `Text`/`Empty`; workbook
/// sources additionally carry typed numbers and date-typed cells so the
/// coercion layer can treat both uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// String view of the cell as it would appear in a text export.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s),
            // Float Display already omits a fractional part of zero, so
            // 100.0 prints "100" and 10.5 prints "10.5".
            Cell::Number(n) => Cow::Owned(format!("{n}")),
            Cell::Date(dt) => Cow::Owned(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// Row/column grid produced by parsing; consumed once and discarded after
/// mapping.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_text_rows(rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::Text).collect())
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// True when every cell in the row is blank.
pub fn row_is_blank(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

/// Cell at `col` within `row`, treating short rows as padded with blanks.
pub fn cell_at<'a>(row: &'a [Cell], col: usize) -> &'a Cell {
    row.get(col).unwrap_or(&Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn blank_detection() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".to_string()).is_blank());
        assert!(!Cell::Text("x".to_string()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert!(row_is_blank(&[Cell::Empty, Cell::Text(String::new())]));
        assert!(!row_is_blank(&[Cell::Empty, Cell::Number(1.0)]));
    }

    #[test]
    fn number_text_keeps_integer_digits() {
        assert_eq!(Cell::Number(10.0).text(), "10");
        assert_eq!(Cell::Number(100.0).text(), "100");
        assert_eq!(Cell::Number(0.0).text(), "0");
        assert_eq!(Cell::Number(10.5).text(), "10.5");
    }

    #[test]
    fn date_text_is_iso() {
        let dt = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(Cell::Date(dt).text(), "2024-06-01T09:30:00");
    }
}

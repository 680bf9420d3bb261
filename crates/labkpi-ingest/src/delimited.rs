//! Quote-aware delimited-text parsing with delimiter sniffing.

/// Number of leading characters sampled for delimiter detection.
const SNIFF_SAMPLE_LEN: usize = 4096;

#[derive(Debug, Clone)]
pub struct DelimitedText {
    pub rows: Vec<Vec<String>>,
    pub delimiter: char,
}

/// Picks the delimiter by counting tab/comma/semicolon occurrences in the
/// leading sample. Tab wins ties.
pub fn detect_delimiter(text: &str) -> char {
    let sample: String = text.chars().take(SNIFF_SAMPLE_LEN).collect();
    let mut tabs = 0usize;
    let mut commas = 0usize;
    let mut semis = 0usize;
    for ch in sample.chars() {
        match ch {
            '\t' => tabs += 1,
            ',' => commas += 1,
            ';' => semis += 1,
            _ => {}
        }
    }
    let mut delimiter = '\t';
    let mut max = tabs;
    if commas > max {
        delimiter = ',';
        max = commas;
    }
    if semis > max {
        delimiter = ';';
    }
    delimiter
}

/// Parses delimited text into rows of trimmed fields.
///
/// Single left-to-right scan with RFC 4180 quoting: a `"` toggles quote
/// state unless doubled (which emits one literal quote); fields end at an
/// unquoted delimiter, records at an unquoted newline. Embedded newlines
/// inside quoted fields are preserved. A trailing record without a final
/// newline is still emitted, and a fully blank line becomes a one-cell
/// empty row for later filtering.
pub fn parse_delimited(text: &str) -> DelimitedText {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let delimiter = detect_delimiter(&normalized);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = normalized.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            row.push(std::mem::take(&mut field));
        } else if ch == '\n' && !in_quotes {
            row.push(std::mem::take(&mut field));
            rows.push(std::mem::take(&mut row));
        } else {
            field.push(ch);
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(|cell| clean_field(&cell)).collect())
        .collect();
    DelimitedText { rows, delimiter }
}

/// Strips one stray wrapping quote pair left by malformed input, then trims.
/// Only a quote on both ends is treated as a wrapper; a lone leading or
/// trailing quote is legitimate content (e.g. an escaped quote at the end
/// of a field) and stays.
fn clean_field(raw: &str) -> String {
    let s = raw
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw);
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_beats_tab_on_count() {
        assert_eq!(detect_delimiter("a,b,c,d,e,f\nx\ty"), ',');
    }

    #[test]
    fn tab_wins_ties() {
        assert_eq!(detect_delimiter("a\tb,c"), '\t');
        assert_eq!(detect_delimiter("plain text"), '\t');
    }

    #[test]
    fn semicolon_detected() {
        assert_eq!(detect_delimiter("a;b;c;d\n1;2;3;4"), ';');
    }

    #[test]
    fn quoted_field_with_embedded_delimiter() {
        let parsed = parse_delimited("a,\"b,c\",d\n");
        assert_eq!(parsed.rows, vec![vec!["a", "b,c", "d"]]);
        assert_eq!(parsed.delimiter, ',');
    }

    #[test]
    fn escaped_quotes_emit_literal() {
        let parsed = parse_delimited("a,\"say \"\"hi\"\"\",b\n");
        assert_eq!(parsed.rows, vec![vec!["a", "say \"hi\"", "b"]]);
    }

    #[test]
    fn field_ending_in_escaped_quote_keeps_it() {
        let parsed = parse_delimited("x,\"ends with \"\"quote\"\"\"\n");
        assert_eq!(parsed.rows, vec![vec!["x", "ends with \"quote\""]]);
    }

    #[test]
    fn stray_wrap_stripped_lone_quote_kept() {
        assert_eq!(clean_field("\"wrapped\""), "wrapped");
        assert_eq!(clean_field("say \"hi\""), "say \"hi\"");
        assert_eq!(clean_field("\"leading only"), "\"leading only");
    }

    #[test]
    fn embedded_newline_inside_quotes() {
        let parsed = parse_delimited("a,\"line1\nline2\",c\nd,e,f\n");
        assert_eq!(
            parsed.rows,
            vec![vec!["a", "line1\nline2", "c"], vec!["d", "e", "f"]]
        );
    }

    #[test]
    fn trailing_record_without_newline() {
        let parsed = parse_delimited("a,b\nc,d");
        assert_eq!(parsed.rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn blank_line_becomes_one_cell_empty_row() {
        let parsed = parse_delimited("a,b\n\nc,d\n");
        assert_eq!(
            parsed.rows,
            vec![vec!["a", "b"], vec![""], vec!["c", "d"]]
        );
    }

    #[test]
    fn crlf_normalized() {
        let parsed = parse_delimited("a,b\r\nc,d\r\n");
        assert_eq!(parsed.rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }
}

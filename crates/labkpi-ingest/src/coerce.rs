//! Heterogeneous cell-value coercion to canonical dates and hours.
//!
//! Every function here recovers locally: unparseable input yields `None`,
//! never an error, so a single bad cell can't abort its row.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::grid::Cell;

/// Plausible Excel date-serial range (roughly 1954..2064).
const SERIAL_MIN: f64 = 20_000.0;
const SERIAL_MAX: f64 = 60_000.0;

/// Converts an Excel date serial to a datetime. The epoch is 1899-12-30,
/// absorbing the historical 1900 leap-year bug.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::milliseconds(millis as i64))
}

/// True when the cell plausibly carries a date: a date-typed cell, a
/// number in the serial range, or a string in ISO, `M/D/YY(YY)`,
/// `YYYYMMDD`, or long month-name form.
pub fn is_date_like(cell: &Cell) -> bool {
    match cell {
        Cell::Date(_) => true,
        Cell::Number(n) => *n > SERIAL_MIN && *n < SERIAL_MAX,
        Cell::Text(s) => {
            let s = s.trim();
            !s.is_empty()
                && (has_iso_date_prefix(s)
                    || is_slash_date(s)
                    || is_compact_date(s)
                    || has_month_name_date(s))
        }
        Cell::Empty => false,
    }
}

/// Canonical `YYYY-MM-DD`, or `None` when the cell has no parseable date.
pub fn to_iso_date_only(cell: &Cell) -> Option<String> {
    coerce_datetime(cell).map(|dt| dt.date().format("%Y-%m-%d").to_string())
}

/// Canonical `YYYY-MM-DDTHH:MM:SS`, or `None`.
pub fn to_iso_datetime(cell: &Cell) -> Option<String> {
    coerce_datetime(cell).map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn coerce_datetime(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Date(dt) => Some(*dt),
        Cell::Number(n) => excel_serial_to_datetime(*n),
        Cell::Text(s) => parse_datetime_text(s),
        Cell::Empty => None,
    }
}

/// Parses a free-form date or datetime string.
pub fn parse_datetime_text(raw: &str) -> Option<NaiveDateTime> {
    let mut s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s = s.strip_suffix('Z').unwrap_or(s).trim_end();
    if is_compact_date(s) {
        return NaiveDate::parse_from_str(s, "%Y%m%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN));
    }
    try_parse_datetime(s).or_else(|| try_parse_date(s).map(|d| d.and_time(NaiveTime::MIN)))
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m/%d/%y %H:%M",
    ];
    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    None
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y", // US: 1/15/2024
        "%m/%d/%y", // US short year: 1/15/24
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%d-%b-%Y", // 15-Jan-2024
        "%d %b %Y", // 15 Jan 2024
    ];
    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }
    None
}

/// Converts a TAT cell to hours. Numeric cells are hours directly
/// (non-positive is invalid); `H:MM` strings convert to `H + MM/60`;
/// other numeric-looking strings parse directly.
pub fn parse_tat_hours(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => {
            if n.is_finite() && *n > 0.0 {
                Some(*n)
            } else {
                None
            }
        }
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Some((h, m)) = split_hh_mm(s) {
                return Some(h + m / 60.0);
            }
            let n: f64 = s.replace(',', "").parse().ok()?;
            if n > 0.0 { Some(n) } else { None }
        }
        _ => None,
    }
}

/// Generic hours coercion over free-text expressions: `H:MM(:SS)`, `Nh`,
/// `Nm`, `N h M m`, `NhMM`, and bare decimals (comma decimal separators
/// normalized to dot). `None` distinguishes "absent" from zero.
pub fn parse_hours(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => n.is_finite().then_some(*n),
        Cell::Text(s) => parse_hours_text(s),
        _ => None,
    }
}

fn parse_hours_text(raw: &str) -> Option<f64> {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }
    if let Some(v) = parse_clock(&s) {
        return Some(v);
    }
    if let Some(v) = parse_unit_expression(&s) {
        return Some(v);
    }
    // Bare number: commas are thousands separators, an optional trailing
    // hour word is ignored.
    let no_separators = s.replace(',', "");
    let stripped = strip_trailing_hour_unit(&no_separators);
    stripped.trim().parse::<f64>().ok()
}

/// `H:MM` with 1-2 digit hours and exactly 2-digit minutes.
fn split_hh_mm(s: &str) -> Option<(f64, f64)> {
    let (h, m) = s.split_once(':')?;
    if !(1..=2).contains(&h.len()) || m.len() != 2 {
        return None;
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((h.parse().ok()?, m.parse().ok()?))
}

/// `H:MM` or `H:MM:SS` with 1-2 digit components.
fn parse_clock(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    let mut components = [0f64; 3];
    for (idx, part) in parts.iter().enumerate() {
        if !(1..=2).contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        components[idx] = part.parse().ok()?;
    }
    Some(components[0] + components[1] / 60.0 + components[2] / 3600.0)
}

/// Leading decimal number (dot or comma decimal separator) and the rest.
fn split_number_prefix(s: &str) -> Option<(f64, &str)> {
    let bytes = s.as_bytes();
    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'.' || bytes[end] == b',') {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if frac > end + 1 {
            end = frac;
        }
    }
    let value = s[..end].replace(',', ".").parse().ok()?;
    Some((value, &s[end..]))
}

fn split_alpha_prefix(s: &str) -> (&str, &str) {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_alphabetic())
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

fn is_hour_unit(unit: &str) -> bool {
    matches!(unit, "h" | "hr" | "hrs" | "hour" | "hours")
}

fn is_minute_unit(unit: &str) -> bool {
    matches!(unit, "m" | "min" | "mins" | "minute" | "minutes")
}

/// `Nh`, `Nm`, `N h M m`, and `NhMM` expressions (already lowercased).
fn parse_unit_expression(s: &str) -> Option<f64> {
    let (first, rest) = split_number_prefix(s)?;
    let rest = rest.trim_start();
    let (unit, rest) = split_alpha_prefix(rest);
    if is_hour_unit(unit) {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Some(first);
        }
        // 2h30 shorthand: minutes glued to the hour unit.
        if unit == "h" && rest.len() <= 2 && rest.bytes().all(|b| b.is_ascii_digit()) {
            let minutes: f64 = rest.parse().ok()?;
            return Some(first + minutes / 60.0);
        }
        let (minutes, tail) = split_number_prefix(rest)?;
        let tail = tail.trim_start();
        let (minute_unit, tail) = split_alpha_prefix(tail);
        if is_minute_unit(minute_unit) && tail.trim().is_empty() {
            return Some(first + minutes / 60.0);
        }
        return None;
    }
    if is_minute_unit(unit) && rest.trim().is_empty() {
        return Some(first / 60.0);
    }
    None
}

fn strip_trailing_hour_unit(s: &str) -> &str {
    let trimmed = s.trim_end();
    for unit in ["hours", "hour", "hrs", "hr", "h"] {
        if let Some(head) = trimmed.strip_suffix(unit) {
            let head_trimmed = head.trim_end();
            // Only strip a real unit suffix, not the tail of a word.
            if head_trimmed
                .bytes()
                .last()
                .is_none_or(|b| b.is_ascii_digit() || b == b'.')
            {
                return head_trimmed;
            }
        }
    }
    trimmed
}

/// Numeric priority after stripping everything but digits, `.` and `-`.
pub fn parse_priority(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => n.is_finite().then_some(*n),
        Cell::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse().ok()
            }
        }
        _ => None,
    }
}

fn has_iso_date_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 8 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return false;
    }
    let month = count_digits(bytes, 5);
    if !(1..=2).contains(&month) || bytes.get(5 + month) != Some(&b'-') {
        return false;
    }
    count_digits(bytes, 6 + month) >= 1
}

fn is_slash_date(s: &str) -> bool {
    let parts: Vec<&str> = s.split('/').collect();
    parts.len() == 3
        && (1..=2).contains(&parts[0].len())
        && (1..=2).contains(&parts[1].len())
        && (2..=4).contains(&parts[2].len())
        && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit()))
}

fn is_compact_date(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Long-form month-name date anywhere in the string: "January 15, 2024".
fn has_month_name_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_alphabetic() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        if !(3..=9).contains(&(i - start)) {
            continue;
        }
        let mut j = i;
        let spaces = count_whitespace(bytes, j);
        if spaces == 0 {
            continue;
        }
        j += spaces;
        let day = count_digits(bytes, j);
        if !(1..=2).contains(&day) {
            continue;
        }
        j += day;
        if bytes.get(j) != Some(&b',') {
            continue;
        }
        j += 1;
        j += count_whitespace(bytes, j);
        if count_digits(bytes, j) >= 4 {
            return true;
        }
    }
    false
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

fn count_whitespace(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn excel_serial_round_trip() {
        assert_eq!(
            to_iso_date_only(&Cell::Number(44927.0)).as_deref(),
            Some("2023-01-01")
        );
        // 25569 is the Unix epoch in Excel serial days.
        assert_eq!(
            to_iso_date_only(&Cell::Number(25569.0)).as_deref(),
            Some("1970-01-01")
        );
        // Fractional serials carry the time of day.
        assert_eq!(
            to_iso_datetime(&Cell::Number(44927.5)).as_deref(),
            Some("2023-01-01T12:00:00")
        );
    }

    #[test]
    fn date_likeness() {
        assert!(is_date_like(&text("2024-06-01")));
        assert!(is_date_like(&text("2024-6-1 extra")));
        assert!(is_date_like(&text("6/1/24")));
        assert!(is_date_like(&text("12/31/2024")));
        assert!(is_date_like(&text("20240601")));
        assert!(is_date_like(&text("January 15, 2024")));
        assert!(is_date_like(&Cell::Number(45000.0)));
        assert!(!is_date_like(&Cell::Number(947.0)));
        assert!(!is_date_like(&text("Smith, J.")));
        assert!(!is_date_like(&text("")));
        assert!(!is_date_like(&Cell::Empty));
    }

    #[test]
    fn iso_coercion_of_strings() {
        assert_eq!(
            to_iso_date_only(&text("6/1/2024")).as_deref(),
            Some("2024-06-01")
        );
        assert_eq!(
            to_iso_date_only(&text("20240601")).as_deref(),
            Some("2024-06-01")
        );
        assert_eq!(
            to_iso_datetime(&text("2024-06-01 09:30")).as_deref(),
            Some("2024-06-01T09:30:00")
        );
        assert_eq!(
            to_iso_datetime(&text("2024-06-01T09:30:00Z")).as_deref(),
            Some("2024-06-01T09:30:00")
        );
        assert_eq!(to_iso_date_only(&text("not a date")), None);
        assert_eq!(to_iso_date_only(&Cell::Empty), None);
    }

    #[test]
    fn tat_hours_parsing() {
        assert_eq!(parse_tat_hours(&Cell::Number(2.2)), Some(2.2));
        assert_eq!(parse_tat_hours(&Cell::Number(0.0)), None);
        assert_eq!(parse_tat_hours(&Cell::Number(-3.0)), None);
        assert_eq!(parse_tat_hours(&text("1:30")), Some(1.5));
        assert_eq!(parse_tat_hours(&text("8.25")), Some(8.25));
        assert_eq!(parse_tat_hours(&text("n/a")), None);
        assert_eq!(parse_tat_hours(&Cell::Empty), None);
    }

    #[test]
    fn hour_expression_grammar() {
        assert_eq!(parse_hours(&text("7:30")), Some(7.5));
        let with_seconds = parse_hours(&text("1:30:36")).unwrap();
        assert!((with_seconds - 1.51).abs() < 1e-9);
        assert_eq!(parse_hours(&text("8h")), Some(8.0));
        assert_eq!(parse_hours(&text("1,5h")), Some(1.5));
        assert_eq!(parse_hours(&text("90m")), Some(1.5));
        assert_eq!(parse_hours(&text("1 h 30 min")), Some(1.5));
        assert_eq!(parse_hours(&text("2h30")), Some(2.5));
        assert_eq!(parse_hours(&text("7.5")), Some(7.5));
        assert_eq!(parse_hours(&text("8 hours")), Some(8.0));
        assert_eq!(parse_hours(&text("1,234")), Some(1234.0));
        assert_eq!(parse_hours(&text("")), None);
        assert_eq!(parse_hours(&text("off")), None);
        assert_eq!(parse_hours(&Cell::Number(6.0)), Some(6.0));
    }

    #[test]
    fn priority_strips_noise() {
        assert_eq!(parse_priority(&text("P-1")), Some(-1.0));
        assert_eq!(parse_priority(&text("0")), Some(0.0));
        assert_eq!(parse_priority(&text("prio 2")), Some(2.0));
        assert_eq!(parse_priority(&text("routine")), None);
        assert_eq!(parse_priority(&Cell::Number(0.0)), Some(0.0));
    }
}

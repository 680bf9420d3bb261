//! Person-name extraction from multi-person cells.

/// Splits a cell like "Smith, J. / Doe, A. and Lee" into individual names.
///
/// Separators are `/`, `;`, `&`, and the standalone word "and"
/// (case-insensitive). Duplicates are dropped case-insensitively while the
/// first-seen order and original casing are kept.
pub fn extract_names(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '/' || ch == ';' || ch == '&' {
            parts.push(std::mem::take(&mut current));
            i += 1;
        } else if is_standalone_and(&chars, i) {
            parts.push(std::mem::take(&mut current));
            i += 3;
        } else {
            current.push(ch);
            i += 1;
        }
    }
    parts.push(current);

    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for part in parts {
        let name = part.trim();
        if name.is_empty() {
            continue;
        }
        let key = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(name.to_string());
        }
    }
    out
}

/// Word "and" at `i` bounded by non-letters on both sides.
fn is_standalone_and(chars: &[char], i: usize) -> bool {
    if i + 3 > chars.len() {
        return false;
    }
    let word: String = chars[i..i + 3].iter().collect::<String>().to_lowercase();
    if word != "and" {
        return false;
    }
    let before_ok = i == 0 || !chars[i - 1].is_alphabetic();
    let after_ok = i + 3 == chars.len() || !chars[i + 3].is_alphabetic();
    before_ok && after_ok
}

/// Lowercase letters-only normalization used by the stop-word filter.
fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| {
            if c.is_ascii_alphabetic() {
                Some(c.to_ascii_lowercase())
            } else {
                None
            }
        })
        .collect()
}

/// Column-label tokens that leak into name cells.
const STOP_NAME_TOKENS: &[&str] = &[
    "tech",
    "technician",
    "technologist",
    "review",
    "reviewer",
    "reviewedby",
    "qc",
    "doqc",
    "qualitycontrol",
    "abnormalratio",
    "ratio",
    "tat",
    "case",
    "cases",
    "month",
    "total",
    "sum",
    "number",
    "stat",
    "averagetat",
    "tatforstatcases",
    "numberoffailures",
    "numberofstatcases",
    "karyotype",
    "karyotyping",
    "volume",
];

const BANNED_SUBSTRINGS: &[&str] = &[
    "ratio", "tat", "case", "abnormal", "total", "number", "stat",
];

/// Heuristic filter for reviewer/QC name lists, rejecting column-label
/// leakage. Primary technician lists are trusted and not filtered.
pub fn is_likely_person_name(raw: &str) -> bool {
    let token = normalize_token(raw);
    if token.is_empty() || token.len() == 1 {
        return false;
    }
    if STOP_NAME_TOKENS.contains(&token.as_str()) {
        return false;
    }
    !BANNED_SUBSTRINGS.iter().any(|b| token.contains(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_all_separators() {
        assert_eq!(
            extract_names("Smith, J. / Doe, A. and Lee"),
            vec!["Smith, J.", "Doe, A.", "Lee"]
        );
        assert_eq!(extract_names("A; B & C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn and_inside_a_name_is_not_a_separator() {
        assert_eq!(extract_names("Anderson / Sandy"), vec!["Anderson", "Sandy"]);
        assert_eq!(extract_names("Ray AND Kay"), vec!["Ray", "Kay"]);
    }

    #[test]
    fn dedupes_case_insensitively_preserving_first_casing() {
        assert_eq!(
            extract_names("Smith, J. / smith, j. / Lee"),
            vec!["Smith, J.", "Lee"]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract_names("").is_empty());
        assert!(extract_names("  /  ; ").is_empty());
    }

    #[test]
    fn person_name_filter() {
        assert!(is_likely_person_name("Smith, J."));
        assert!(is_likely_person_name("Mary-Anne"));
        assert!(!is_likely_person_name("Tech"));
        assert!(!is_likely_person_name("Tech Abnormal Ratio"));
        assert!(!is_likely_person_name("Number of STAT cases"));
        assert!(!is_likely_person_name("Karyotype"));
        assert!(!is_likely_person_name("Q"));
        assert!(!is_likely_person_name("--"));
    }
}

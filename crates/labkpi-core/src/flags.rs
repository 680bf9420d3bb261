//! Free-text flag detection over result/status/notes fields.

use labkpi_model::TestRecord;

/// Markers scraped from a record's free-text fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFlags {
    pub abnormal: bool,
    pub positive: bool,
    pub negative: bool,
    pub failure: bool,
    pub stat: bool,
}

/// Scans the free-text fields for abnormal/positive/negative/failure/STAT
/// markers. Positive and negative suppress each other when both appear.
pub fn detect_flags(record: &TestRecord) -> RecordFlags {
    let text = [
        record.result.as_deref(),
        record.status.as_deref(),
        record.notes.as_deref(),
    ]
    .iter()
    .flatten()
    .map(|s| s.to_lowercase())
    .collect::<Vec<_>>()
    .join(" ");

    let has_positive = contains_word(&text, "positive");
    let has_negative = contains_word(&text, "negative");
    let failure = ["fail", "cancel", "no growth", "unsat", "inadequate"]
        .iter()
        .any(|m| text.contains(m))
        || contains_word(&text, "qns");

    RecordFlags {
        abnormal: contains_word(&text, "abnormal"),
        positive: has_positive && !has_negative,
        negative: has_negative && !has_positive,
        failure,
        stat: contains_word(&text, "stat"),
    }
}

/// Substring match bounded by non-alphanumeric characters on both sides.
fn contains_word(text: &str, word: &str) -> bool {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(pos) = text[from..].find(word) {
        let start = from + pos;
        let end = start + word.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        from = start + 1;
    }
    false
}

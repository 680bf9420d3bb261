//! Forward-fill, the one order-dependent stage of the pipeline.

/// Propagates the last non-blank value down through subsequent blanks.
///
/// Implemented as an explicit left fold so the order dependency stays
/// isolated here; every other mapping stage is a stateless per-row map.
pub fn forward_fill(values: impl IntoIterator<Item = Option<String>>) -> Vec<Option<String>> {
    values
        .into_iter()
        .scan(None::<String>, |last, value| {
            let filled = match value {
                Some(v) if !v.trim().is_empty() => {
                    *last = Some(v.clone());
                    Some(v)
                }
                _ => last.clone(),
            };
            Some(filled)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(values: &[&str]) -> Vec<Option<String>> {
        forward_fill(values.iter().map(|v| {
            if v.is_empty() {
                None
            } else {
                Some((*v).to_string())
            }
        }))
    }

    #[test]
    fn blanks_inherit_last_seen_value() {
        assert_eq!(
            fill(&["2024-01-05", "", "", "2024-01-06"]),
            vec![
                Some("2024-01-05".to_string()),
                Some("2024-01-05".to_string()),
                Some("2024-01-05".to_string()),
                Some("2024-01-06".to_string()),
            ]
        );
    }

    #[test]
    fn leading_blanks_stay_empty() {
        assert_eq!(
            fill(&["", "2024-01-05", ""]),
            vec![
                None,
                Some("2024-01-05".to_string()),
                Some("2024-01-05".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_counts_as_blank() {
        assert_eq!(
            forward_fill(vec![Some("a".to_string()), Some("   ".to_string())]),
            vec![Some("a".to_string()), Some("a".to_string())]
        );
    }
}

//! Text helpers

/// Keep at most `max_chars` characters, never splitting a UTF-8 sequence
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncate to `max_chars` characters and mark the cut with `...`
///
/// The marker is appended unconditionally, matching how the report prompt
/// presents the business summary.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    format!("{}...", truncate_chars(text, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_chars("Apple", 10), "Apple");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "Nestlé S.A. food";
        assert_eq!(truncate_chars(text, 6), "Nestlé");
        assert_eq!(truncate_chars("日本株式会社", 2), "日本");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
        assert_eq!(truncate_with_ellipsis("ab", 3), "ab...");
    }
}

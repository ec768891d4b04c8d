//! String utilities for the domain layer.

/// Shorten an upstream response body for log and error messages (UTF-8 safe).
///
/// `max_len` is a byte budget; the cut lands on a character boundary and
/// the result ends in `...` when anything was dropped.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Case-insensitive substring test used by text filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_title_unchanged() {
        assert_eq!(truncate("Buy milk", 20), "Buy milk");
    }

    #[test]
    fn test_truncate_long_title() {
        assert_eq!(truncate("Write quarterly report", 10), "Write q...");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // "é" is two bytes; a cut inside it backs up one byte
        assert_eq!(truncate("ééééé", 6), "é...");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Call the Dentist", "dentist"));
        assert!(contains_ignore_case("call", "CALL"));
        assert!(!contains_ignore_case("Email Bob", "alice"));
    }
}

//! Middle truncation for file contents under a character budget.

/// Marker inserted between the kept head and tail of an over-budget file.
pub const TRUNCATION_MARKER: &str = "\n\n...\n\n";

/// Middle-truncate `content` so at most `max_chars` characters survive on
/// each side of the marker.
///
/// A budget of zero disables truncation entirely. Content at or under
/// `2 * max_chars` characters passes through unchanged. Counts are
/// characters, not bytes, so multibyte content never splits inside a
/// code point.
///
/// Re-truncating an already truncated string with the same budget keeps
/// exactly the same head and tail, so the operation is idempotent.
pub fn truncate_middle(content: &str, max_chars: usize) -> (String, bool) {
    if max_chars == 0 {
        return (content.to_string(), false);
    }

    let total = content.chars().count();
    if total <= max_chars * 2 {
        return (content.to_string(), false);
    }

    let head: String = content.chars().take(max_chars).collect();
    let tail: String = content.chars().skip(total - max_chars).collect();
    (format!("{head}{TRUNCATION_MARKER}{tail}"), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_truncation_when_under_budget() {
        let (result, truncated) = truncate_middle("hello world", 100);
        assert_eq!(result, "hello world");
        assert!(!truncated);
    }

    #[test]
    fn boundary_length_passes_through() {
        let content = "abcdefghij";
        let (result, truncated) = truncate_middle(content, 5);
        assert_eq!(result, content);
        assert!(!truncated);
    }

    #[test]
    fn keeps_head_and_tail_around_the_marker() {
        let content = "abcdefghijk";
        let (result, truncated) = truncate_middle(content, 5);
        assert!(truncated);
        assert_eq!(result, format!("abcde{TRUNCATION_MARKER}ghijk"));
    }

    #[test]
    fn truncated_length_is_twice_budget_plus_marker() {
        let content = "x".repeat(10_000);
        let (result, truncated) = truncate_middle(&content, 300);
        assert!(truncated);
        assert_eq!(result.chars().count(), 600 + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn idempotent_under_re_truncation() {
        let content = "0123456789".repeat(50);
        let (once, _) = truncate_middle(&content, 40);
        let (twice, _) = truncate_middle(&once, 40);
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_budget_disables_truncation() {
        let content = "a".repeat(5_000);
        let (result, truncated) = truncate_middle(&content, 0);
        assert_eq!(result, content);
        assert!(!truncated);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Three bytes per character; byte-based slicing would panic here.
        let content = "日本語テキスト".repeat(100);
        let (result, truncated) = truncate_middle(&content, 10);
        assert!(truncated);
        assert_eq!(result.chars().count(), 20 + TRUNCATION_MARKER.chars().count());
        assert!(result.starts_with("日本語テキスト日本語"));
    }
}

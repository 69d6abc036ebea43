

/// Keeps at most `max_chars` chars, marking the cut with `...`.
pub fn safe_truncate_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Largest prefix of `s` that fits in `max_bytes` without cutting a code point.
/// Always takes at least one char so callers make progress.
pub fn take_bytes_at_char_boundary(s: &str, max_bytes: usize) -> (&str, &str) {
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let next = idx + c.len_utf8();
        if next > max_bytes {
            break;
        }
        end = next;
    }
    if end == 0 {
        end = s.chars().next().map(char::len_utf8).unwrap_or(0);
    }
    s.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate_ellipsis() {
        assert_eq!(safe_truncate_ellipsis("hello world", 5), "hello...");
        assert_eq!(safe_truncate_ellipsis("hello", 5), "hello");
        assert_eq!(safe_truncate_ellipsis("hi", 10), "hi");
    }

    #[test]
    fn test_safe_truncate_ellipsis_multibyte() {
        assert_eq!(safe_truncate_ellipsis("Привет мир", 6), "Привет...");
    }

    #[test]
    fn test_take_bytes_ascii() {
        assert_eq!(take_bytes_at_char_boundary("1234567890", 5), ("12345", "67890"));
        assert_eq!(take_bytes_at_char_boundary("abc", 10), ("abc", ""));
    }

    #[test]
    fn test_take_bytes_multibyte() {
        // "é" is two bytes; three of them do not fit in five bytes
        assert_eq!(take_bytes_at_char_boundary("ééé", 5), ("éé", "é"));
        // a char wider than the budget is still taken whole
        assert_eq!(take_bytes_at_char_boundary("😀a", 2), ("😀", "a"));
    }
}

//! Utility functions and helpers.

pub mod http;
#[cfg(feature = "cli")]
pub mod logging;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Truncate to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://zealy.io/cw/alpha/questboard").unwrap();
        assert_eq!(
            resolve_url(&base, "quest/42"),
            "https://zealy.io/cw/alpha/quest/42"
        );
        assert_eq!(
            resolve_url(&base, "/cw/alpha/questboard/q/7"),
            "https://zealy.io/cw/alpha/questboard/q/7"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("퀘스트 완료", 3), "퀘스트");
        assert_eq!(truncate_chars("", 0), "");
    }
}

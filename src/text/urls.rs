use once_cell::sync::Lazy;
use regex::Regex;

/// Bare-URL pattern: `http(s)://` followed by non-whitespace.
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("Invalid URL regex"));

/// Trailing run of colons, semicolons, and whitespace.
static TRAILER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[:;\s]+$").expect("Invalid trailer regex"));

/// Find all bare URLs in a piece of text, in order.
#[must_use]
pub fn find_urls(text: &str) -> Vec<&str> {
    URL_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Strip or placeholder-replace raw URLs in cast text for display.
///
/// A URL at the (whitespace-trimmed) end of the text is removed entirely,
/// so a "commentary + trailing link" cast reads as clean commentary. An
/// inline URL is replaced with the literal `[link]`. Trailing `:`/`;`
/// runs and surrounding whitespace are stripped afterwards.
///
/// Idempotent: re-running on the result is a no-op.
#[must_use]
pub fn clean_text(input: &str) -> String {
    let urls: Vec<String> = find_urls(input).iter().map(ToString::to_string).collect();

    let mut text = input.to_string();
    for url in &urls {
        if text.trim_end().ends_with(url.as_str()) {
            text = text.replacen(url.as_str(), "", 1);
        } else {
            text = text.replacen(url.as_str(), "[link]", 1);
        }
    }

    TRAILER_RE.replace(&text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_url_removed() {
        assert_eq!(
            clean_text("check this out https://x.com/a"),
            "check this out"
        );
    }

    #[test]
    fn test_inline_url_replaced() {
        assert_eq!(
            clean_text("see https://x.com/a for info"),
            "see [link] for info"
        );
    }

    #[test]
    fn test_trailing_punctuation_stripped() {
        assert_eq!(
            clean_text("breaking news: https://example.com/story"),
            "breaking news"
        );
    }

    #[test]
    fn test_multiple_urls() {
        assert_eq!(
            clean_text("a https://one.com/x b https://two.com/y"),
            "a [link] b"
        );
    }

    #[test]
    fn test_url_only_text() {
        assert_eq!(clean_text("https://example.com/a"), "");
    }

    #[test]
    fn test_no_urls_passthrough() {
        assert_eq!(clean_text("just some words"), "just some words");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "check this out https://x.com/a",
            "see https://x.com/a for info",
            "plain text;; ",
            "https://solo.example.com",
            "a https://one.com b https://two.com",
        ];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_find_urls() {
        assert_eq!(
            find_urls("a https://one.com and http://two.com/x"),
            vec!["https://one.com", "http://two.com/x"]
        );
        assert!(find_urls("no links here").is_empty());
    }
}

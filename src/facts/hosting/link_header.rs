//! Parsing of RFC 8288 `Link` headers as returned by the REST API.

use regex::Regex;
use std::sync::LazyLock;

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]*)>\s*;\s*rel="?([^";]+)"?"#).expect("link pattern should compile"));

/// Returns the target of the `rel="next"` link, if any.
#[must_use]
pub fn next_link(header: &str) -> Option<&str> {
    header.split(',').find_map(|part| {
        let captures = LINK_PATTERN.captures(part.trim())?;
        let rels = captures.get(2)?.as_str();
        rels.split_whitespace()
            .any(|rel| rel.eq_ignore_ascii_case("next"))
            .then(|| captures.get(1).map(|m| m.as_str()))
            .flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_among_several() {
        let header = r#"<https://api.github.com/user/repos?page=3&per_page=100>; rel="next", <https://api.github.com/user/repos?page=50&per_page=100>; rel="last""#;
        assert_eq!(next_link(header), Some("https://api.github.com/user/repos?page=3&per_page=100"));
    }

    #[test]
    fn test_next_not_first() {
        let header = r#"<https://x/?page=1>; rel="prev", <https://x/?page=3>; rel="next""#;
        assert_eq!(next_link(header), Some("https://x/?page=3"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let header = r#"<https://x/?page=1>; rel="first", <https://x/?page=2>; rel="prev""#;
        assert_eq!(next_link(header), None);
    }

    #[test]
    fn test_garbage_header() {
        assert_eq!(next_link("not a link header"), None);
        assert_eq!(next_link(""), None);
    }
}

//! Path composition.
//!
//! Joins slug segments into one absolute path:
//!
//! ```text
//! ["products", "widget"]           -> /products/widget
//! []                               -> /
//! ["site", "a", "b"] - "/site"     -> /a/b
//! ```

use crate::core::SEPARATOR;

/// Join segments into an absolute path and strip `base_prefix`.
///
/// - The result always starts with exactly one separator added by the join
/// - `base_prefix` is matched literally at the start, not as a pattern
/// - No trailing-separator normalization and no collapsing of separators
pub fn compose<S: AsRef<str>>(segments: &[S], base_prefix: Option<&str>) -> String {
    let mut path = String::with_capacity(
        segments.iter().map(|s| s.as_ref().len() + 1).sum::<usize>().max(1),
    );
    for segment in segments {
        path.push(SEPARATOR);
        path.push_str(segment.as_ref());
    }
    if path.is_empty() {
        path.push(SEPARATOR);
    }

    match base_prefix {
        Some(prefix) if !prefix.is_empty() => strip_base(path, prefix),
        _ => path,
    }
}

/// Strip a literal prefix, re-adding the leading separator if it went with it.
pub fn strip_base(path: String, prefix: &str) -> String {
    let Some(rest) = path.strip_prefix(prefix) else {
        return path;
    };
    if rest.starts_with(SEPARATOR) {
        rest.to_string()
    } else {
        format!("{SEPARATOR}{rest}")
    }
}

/// Every segment of a composed path except the last.
///
/// `/products/widget` -> `["products"]`, `/widget` -> `[]`, `/` -> `[]`
pub fn ancestor_segments(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path.split(SEPARATOR).skip(1).collect();
    parts.pop();
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_segments() {
        assert_eq!(compose(&["products", "widget"], None), "/products/widget");
        assert_eq!(compose(&["widget"], None), "/widget");
    }

    #[test]
    fn test_compose_empty_is_root() {
        let empty: [&str; 0] = [];
        assert_eq!(compose(&empty, None), "/");
        assert_eq!(compose(&empty, Some("/site")), "/");
    }

    #[test]
    fn test_strip_matching_prefix() {
        assert_eq!(compose(&["site", "a", "b"], Some("/site")), "/a/b");
    }

    #[test]
    fn test_strip_non_matching_prefix() {
        assert_eq!(compose(&["other", "a"], Some("/site")), "/other/a");
    }

    #[test]
    fn test_strip_re_adds_separator() {
        // Literal match: "/site" also matches the start of "/sitemap"
        assert_eq!(compose(&["sitemap"], Some("/site")), "/map");
        // A prefix ending in a separator eats the leading one
        assert_eq!(compose(&["site", "a"], Some("/site/")), "/a");
        // Prefix equal to the whole path leaves the root
        assert_eq!(compose(&["site"], Some("/site")), "/");
    }

    #[test]
    fn test_prefix_is_not_a_pattern() {
        assert_eq!(compose(&["s.te", "a"], Some("/s.te")), "/a");
        assert_eq!(compose(&["site", "a"], Some("/s.te")), "/site/a");
    }

    #[test]
    fn test_empty_prefix_ignored() {
        assert_eq!(compose(&["a"], Some("")), "/a");
    }

    #[test]
    fn test_ancestor_segments() {
        assert_eq!(ancestor_segments("/products/widget"), vec!["products"]);
        assert_eq!(ancestor_segments("/a/b/c"), vec!["a", "b"]);
        assert!(ancestor_segments("/widget").is_empty());
        assert!(ancestor_segments("/").is_empty());
    }
}

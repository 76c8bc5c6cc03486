//! Segment-based path matching.
//!
//! One predicate serves both the router and the side menu, so a pattern
//! highlights in the menu exactly when the router would match it.
//!
//! # Rules
//!
//! - Paths are split on `/`; empty segments are ignored.
//! - Literal pattern segments must equal the path segment.
//! - `:name` pattern segments capture any single path segment.
//! - An **exact** match must consume the whole path; a **prefix** match may
//!   leave trailing segments (on a segment boundary, so `/cluster` never
//!   matches `/clusters`).

use crate::params::RouteParams;
use std::borrow::Cow;

/// Result of matching a path against a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Captured dynamic segments.
    pub params: RouteParams,
    /// Number of path segments consumed by the pattern.
    pub consumed: usize,
    /// `true` if the pattern consumed the whole path.
    pub is_exact: bool,
}

/// Match `path` against `pattern`.
///
/// # Examples
///
/// ```
/// use console_navigator::match_pattern;
///
/// let m = match_pattern("/cluster/:clusterId", "/cluster/42", true).unwrap();
/// assert_eq!(m.params.get("clusterId"), Some(&"42".to_string()));
///
/// assert!(match_pattern("/cluster", "/cluster/42", true).is_none());
/// assert!(match_pattern("/cluster", "/cluster/42", false).is_some());
/// assert!(match_pattern("/cluster", "/clusters", false).is_none());
/// ```
pub fn match_pattern(pattern: &str, path: &str, exact: bool) -> Option<PatternMatch> {
    let pattern_segments = split_path(pattern);
    let path_segments = split_path(path);

    if pattern_segments.len() > path_segments.len() {
        return None;
    }
    if exact && pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (pattern_seg, path_seg) in pattern_segments.iter().zip(path_segments.iter()) {
        if let Some(name) = param_name(pattern_seg) {
            params.insert(name.to_string(), (*path_seg).to_string());
        } else if pattern_seg != path_seg {
            return None;
        }
    }

    Some(PatternMatch {
        params,
        consumed: pattern_segments.len(),
        is_exact: pattern_segments.len() == path_segments.len(),
    })
}

/// Match a single pattern segment against a single path segment.
///
/// Returns the captured `(name, value)` for dynamic segments.
pub(crate) fn match_segment<'a>(
    pattern_seg: &'a str,
    path_seg: &str,
) -> Option<Option<(&'a str, String)>> {
    match param_name(pattern_seg) {
        Some(name) => Some(Some((name, path_seg.to_string()))),
        None if pattern_seg == path_seg => Some(None),
        None => None,
    }
}

/// Split a path into its non-empty segments.
///
/// ```
/// use console_navigator::split_path;
///
/// assert_eq!(split_path("/cluster/42"), vec!["cluster", "42"]);
/// assert_eq!(split_path("/"), Vec::<&str>::new());
/// assert_eq!(split_path("cluster//hosts/"), vec!["cluster", "hosts"]);
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Normalize a path to a leading slash and no trailing slash.
///
/// Returns `Cow` so already-normal paths are not reallocated.
///
/// ```
/// use console_navigator::normalize_path;
///
/// assert_eq!(normalize_path("/cluster"), "/cluster");
/// assert_eq!(normalize_path("cluster/"), "/cluster");
/// assert_eq!(normalize_path("//cluster//hosts"), "/cluster/hosts");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path == "/" {
        return Cow::Borrowed(path);
    }
    let is_normal = path.starts_with('/')
        && !path.ends_with('/')
        && !path.contains("//");
    if is_normal {
        return Cow::Borrowed(path);
    }

    let segments = split_path(path);
    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

/// Append one public segment to a parent pattern.
///
/// An empty segment (an index page) leaves the parent path unchanged.
pub fn join_path(parent: &str, segment: &str) -> String {
    if segment.is_empty() {
        return parent.to_string();
    }
    let parent = parent.trim_end_matches('/');
    format!("{}/{}", parent, segment)
}

/// Parameter name of a `:name` pattern segment.
pub fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_prefix() {
        assert!(match_pattern("/dashboard", "/dashboard", true).is_some());
        assert!(match_pattern("/dashboard", "/dashboard/x", true).is_none());

        let prefix = match_pattern("/dashboard", "/dashboard/x", false).unwrap();
        assert_eq!(prefix.consumed, 1);
        assert!(!prefix.is_exact);
    }

    #[test]
    fn test_root_pattern() {
        let m = match_pattern("/", "/cluster", false).unwrap();
        assert_eq!(m.consumed, 0);
        assert!(match_pattern("/", "/cluster", true).is_none());
        assert!(match_pattern("/", "/", true).is_some());
    }

    #[test]
    fn test_dynamic_capture() {
        let m = match_pattern("/cluster/:clusterId/hosts", "/cluster/abc/hosts", true).unwrap();
        assert_eq!(m.params.get("clusterId"), Some(&"abc".to_string()));
        assert!(match_pattern("/cluster/:clusterId/hosts", "/cluster/abc/backups", true).is_none());
    }

    #[test]
    fn test_match_segment() {
        assert_eq!(match_segment("cluster", "cluster"), Some(None));
        assert_eq!(match_segment("cluster", "host"), None);
        assert_eq!(
            match_segment(":id", "7"),
            Some(Some(("id", "7".to_string())))
        );
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "cluster"), "/cluster");
        assert_eq!(join_path("/cluster", ":clusterId"), "/cluster/:clusterId");
        assert_eq!(join_path("/cluster", ""), "/cluster");
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name(":clusterId"), Some("clusterId"));
        assert_eq!(param_name("cluster"), None);
        assert_eq!(param_name(":"), None);
    }
}

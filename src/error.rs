//! Error and outcome types.
//!
//! - [`ConfigurationError`]: a static authoring mistake in the page table
//!   (bad ordering prefix, duplicate sibling, ambiguous dynamic segment).
//!   Raised only while building the trees, never during navigation.
//! - [`NavigationResult`]: where a navigation settled after redirects were
//!   followed.
//!
//! # Examples
//!
//! ```
//! use console_navigator::{resolve_location, ConfigurationError};
//!
//! let err = resolve_location("[x]cluster").unwrap_err();
//! assert!(matches!(err, ConfigurationError::InvalidOrderPrefix { .. }));
//! assert_eq!(
//!     err.to_string(),
//!     "Invalid ordering prefix in segment '[x]cluster' of '[x]cluster': expected [<integer>]"
//! );
//! ```

use std::fmt;

// ============================================================================
// ConfigurationError
// ============================================================================

/// A malformed page table.
///
/// Every variant names the offending location so the mistake can be found
/// without a debugger. None of these are recoverable: the application should
/// refuse to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A segment carries a prefix that is not `[<integer>]`.
    InvalidOrderPrefix { location: String, segment: String },

    /// A location has an empty segment (`a//b`, leading or trailing `/`).
    EmptySegment { location: String },

    /// A segment name is empty or contains characters outside `[A-Za-z0-9._-]`.
    InvalidSegmentName { location: String, segment: String },

    /// The same dynamic parameter appears twice in one location.
    DuplicateParameter { location: String, name: String },

    /// Two pages resolve to the same public path.
    DuplicateSibling { path: String },

    /// Two dynamic segments compete at the same depth under one parent.
    AmbiguousDynamicSegment {
        parent: String,
        first: String,
        second: String,
    },

    /// One directory was given two different ordering prefixes.
    ConflictingOrder {
        path: String,
        first: i32,
        second: i32,
    },

    /// A static redirect target is not an absolute path.
    InvalidRedirectTarget { path: String, target: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidOrderPrefix { location, segment } => write!(
                f,
                "Invalid ordering prefix in segment '{}' of '{}': expected [<integer>]",
                segment, location
            ),
            ConfigurationError::EmptySegment { location } => {
                write!(f, "Empty segment in page location '{}'", location)
            }
            ConfigurationError::InvalidSegmentName { location, segment } => write!(
                f,
                "Invalid segment name '{}' in page location '{}'",
                segment, location
            ),
            ConfigurationError::DuplicateParameter { location, name } => write!(
                f,
                "Dynamic parameter '{}' appears more than once in '{}'",
                name, location
            ),
            ConfigurationError::DuplicateSibling { path } => {
                write!(f, "More than one page resolves to '{}'", path)
            }
            ConfigurationError::AmbiguousDynamicSegment {
                parent,
                first,
                second,
            } => write!(
                f,
                "Ambiguous dynamic segments under '{}': ':{}' and ':{}'",
                parent, first, second
            ),
            ConfigurationError::ConflictingOrder {
                path,
                first,
                second,
            } => write!(
                f,
                "Conflicting ordering prefixes for '{}': [{}] and [{}]",
                path, first, second
            ),
            ConfigurationError::InvalidRedirectTarget { path, target } => write!(
                f,
                "Redirect on '{}' must target an absolute path, got '{}'",
                path, target
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

// ============================================================================
// NavigationResult
// ============================================================================

/// Where a navigation settled.
///
/// Redirects issued along the way are not failures; they are followed and
/// recorded in `redirects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// A page was resolved for `path` and is ready to mount.
    Rendered { path: String, redirects: usize },

    /// No route matches `path`.
    NotFound { path: String, redirects: usize },

    /// Navigation stopped without a renderable destination.
    Blocked { path: String, reason: String },
}

impl NavigationResult {
    /// Check if a page was resolved.
    pub fn is_rendered(&self) -> bool {
        matches!(self, NavigationResult::Rendered { .. })
    }

    /// Check if the final path matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was stopped.
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// The path the navigation ended on.
    pub fn path(&self) -> &str {
        match self {
            NavigationResult::Rendered { path, .. }
            | NavigationResult::NotFound { path, .. }
            | NavigationResult::Blocked { path, .. } => path,
        }
    }

    /// Number of redirects followed before settling.
    pub fn redirects(&self) -> usize {
        match self {
            NavigationResult::Rendered { redirects, .. }
            | NavigationResult::NotFound { redirects, .. } => *redirects,
            NavigationResult::Blocked { .. } => 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_sibling_display() {
        let error = ConfigurationError::DuplicateSibling {
            path: "/cluster".to_string(),
        };
        assert_eq!(error.to_string(), "More than one page resolves to '/cluster'");
    }

    #[test]
    fn test_ambiguous_display() {
        let error = ConfigurationError::AmbiguousDynamicSegment {
            parent: "/cluster".to_string(),
            first: "clusterId".to_string(),
            second: "name".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Ambiguous dynamic segments under '/cluster': ':clusterId' and ':name'"
        );
    }

    #[test]
    fn test_navigation_result_accessors() {
        let result = NavigationResult::Rendered {
            path: "/cluster".to_string(),
            redirects: 1,
        };
        assert!(result.is_rendered());
        assert!(!result.is_blocked());
        assert_eq!(result.path(), "/cluster");
        assert_eq!(result.redirects(), 1);

        let blocked = NavigationResult::Blocked {
            path: "/a".to_string(),
            reason: "loop".to_string(),
        };
        assert!(blocked.is_blocked());
        assert_eq!(blocked.redirects(), 0);
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&ConfigurationError::EmptySegment {
            location: "a//b".to_string(),
        });
    }
}

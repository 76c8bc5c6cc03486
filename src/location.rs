//! Page location resolution.
//!
//! A page location is a `/`-separated list of segments written in the page
//! table's naming convention:
//!
//! | Written        | Meaning                                           |
//! |----------------|---------------------------------------------------|
//! | `cluster`      | static segment `cluster`                          |
//! | `[2]cluster`   | static segment, sorted by `2` among its siblings  |
//! | `_clusterId`   | dynamic segment, URL pattern `:clusterId`         |
//! | `[-1]login`    | sorted before its siblings, hidden from the menu  |
//! | `.../index`    | the index page of the enclosing directory         |
//!
//! Prefixes never reach the URL. Siblings sort ascending by prefix; entries
//! without a prefix come after every prefixed one, in declaration order.
//!
//! ```
//! use console_navigator::{resolve_location, SortKey};
//!
//! let resolved = resolve_location("[2]cluster/_clusterId/[1]hosts").unwrap();
//! assert_eq!(resolved.public_path, "/cluster/:clusterId/hosts");
//! assert_eq!(resolved.id, "cluster._clusterId.hosts");
//! assert_eq!(resolved.order, SortKey::Ordered(1));
//! assert!(resolved.is_menu_visible);
//! ```

use crate::error::ConfigurationError;
use crate::matching::join_path;
use std::cmp::Ordering;

/// Name of the segment that denotes a directory's own page.
pub const INDEX_SEGMENT: &str = "index";

// ============================================================================
// SortKey
// ============================================================================

/// Sibling ordering derived from a segment's `[<int>]` prefix.
///
/// `Ordered` keys sort ascending (negative first); `Unordered` sorts after
/// every `Ordered` key. Ties are broken by declaration order, which the tree
/// assembler tracks separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Ordered(i32),
    Unordered,
}

impl SortKey {
    /// Build a key from an optional prefix.
    pub fn from_prefix(prefix: Option<i32>) -> Self {
        prefix.map_or(SortKey::Unordered, SortKey::Ordered)
    }

    /// Integer value of the prefix; `0` when absent.
    pub fn value(self) -> i32 {
        match self {
            SortKey::Ordered(n) => n,
            SortKey::Unordered => 0,
        }
    }

    /// `true` for a negative prefix, which hides a page from the menu.
    pub fn is_negative(self) -> bool {
        matches!(self, SortKey::Ordered(n) if n < 0)
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Ordered(a), SortKey::Ordered(b)) => a.cmp(b),
            (SortKey::Ordered(_), SortKey::Unordered) => Ordering::Less,
            (SortKey::Unordered, SortKey::Ordered(_)) => Ordering::Greater,
            (SortKey::Unordered, SortKey::Unordered) => Ordering::Equal,
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Segment
// ============================================================================

/// One parsed location segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Name with prefix and dynamic marker stripped.
    pub name: String,
    /// The `[<int>]` prefix, if written.
    pub prefix: Option<i32>,
    /// Written with a leading underscore.
    pub dynamic: bool,
    /// The trailing `index` segment of a location.
    pub index: bool,
}

impl Segment {
    /// Parse one raw segment of `location`.
    pub fn parse(location: &str, raw: &str) -> Result<Self, ConfigurationError> {
        if raw.is_empty() {
            return Err(ConfigurationError::EmptySegment {
                location: location.to_string(),
            });
        }

        let invalid_prefix = || ConfigurationError::InvalidOrderPrefix {
            location: location.to_string(),
            segment: raw.to_string(),
        };

        let (prefix, rest) = if let Some(after_open) = raw.strip_prefix('[') {
            let close = after_open.find(']').ok_or_else(invalid_prefix)?;
            let value = after_open[..close]
                .trim()
                .parse::<i32>()
                .map_err(|_| invalid_prefix())?;
            (Some(value), &after_open[close + 1..])
        } else {
            (None, raw)
        };

        if rest.contains(['[', ']']) {
            return Err(invalid_prefix());
        }

        let (dynamic, name) = match rest.strip_prefix('_') {
            Some(name) => (true, name),
            None => (false, rest),
        };

        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid_name {
            return Err(ConfigurationError::InvalidSegmentName {
                location: location.to_string(),
                segment: raw.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            prefix,
            dynamic,
            index: false,
        })
    }

    /// URL pattern form: `name`, `:name`, or empty for an index page.
    pub fn public(&self) -> String {
        if self.index {
            String::new()
        } else if self.dynamic {
            format!(":{}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Identifier form: the written name without its prefix.
    pub fn id_part(&self) -> String {
        if self.dynamic {
            format!("_{}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Sibling ordering of this segment.
    pub fn sort_key(&self) -> SortKey {
        SortKey::from_prefix(self.prefix)
    }
}

// ============================================================================
// ResolvedLocation
// ============================================================================

/// A page location resolved into its public URL pattern and identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// URL pattern with prefixes stripped and `_name` turned into `:name`.
    pub public_path: String,
    /// Dotted identifier, also the i18n namespace of the page.
    pub id: String,
    /// Ordering of the last segment among its siblings.
    pub order: SortKey,
    /// `false` iff the last segment's prefix is negative.
    pub is_menu_visible: bool,
    /// Every parsed segment, outermost first.
    pub segments: Vec<Segment>,
}

impl ResolvedLocation {
    /// Integer prefix of the last segment; `0` when absent.
    pub fn sort_key(&self) -> i32 {
        self.order.value()
    }

    /// `true` if this location names a directory's index page.
    pub fn is_index(&self) -> bool {
        self.segments.last().is_some_and(|s| s.index)
    }

    /// Names of the dynamic parameters along the location.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.dynamic)
            .map(|s| s.name.as_str())
    }
}

/// Resolve a page location into `{public_path, id, order, is_menu_visible}`.
///
/// A single leading or trailing `/` is tolerated. Errors describe authoring
/// mistakes and are meant to stop the application from starting.
pub fn resolve_location(location: &str) -> Result<ResolvedLocation, ConfigurationError> {
    let trimmed = location.strip_prefix('/').unwrap_or(location);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let raw_segments: Vec<&str> = trimmed.split('/').collect();
    let last = raw_segments.len() - 1;

    let mut segments = Vec::with_capacity(raw_segments.len());
    for (position, raw) in raw_segments.iter().enumerate() {
        let mut segment = Segment::parse(location, raw)?;
        segment.index = position == last && !segment.dynamic && segment.name == INDEX_SEGMENT;

        if segment.dynamic
            && segments
                .iter()
                .any(|s: &Segment| s.dynamic && s.name == segment.name)
        {
            return Err(ConfigurationError::DuplicateParameter {
                location: location.to_string(),
                name: segment.name,
            });
        }
        segments.push(segment);
    }

    let public_path = segments
        .iter()
        .fold(String::from("/"), |path, s| join_path(&path, &s.public()));
    let id = segments
        .iter()
        .map(Segment::id_part)
        .collect::<Vec<_>>()
        .join(".");

    let order = segments
        .last()
        .map_or(SortKey::Unordered, Segment::sort_key);

    Ok(ResolvedLocation {
        public_path,
        id,
        order,
        is_menu_visible: !order.is_negative(),
        segments,
    })
}

// ============================================================================
// Tests
// ============================================================================

//! Route parameters extracted from dynamic segments.
//!
//! A page location segment `_clusterId` becomes the pattern segment
//! `:clusterId`; matching `/cluster/42` against `/cluster/:clusterId` yields
//! `{clusterId: "42"}`.
//!
//! ```
//! use console_navigator::RouteParams;
//!
//! let mut params = RouteParams::new();
//! params.insert("clusterId".to_string(), "42".to_string());
//! assert_eq!(params.get("clusterId"), Some(&"42".to_string()));
//! assert_eq!(params.get_as::<u32>("clusterId"), Some(42));
//! ```

use std::collections::BTreeMap;

/// Parameters captured while matching a path against a route pattern.
///
/// Backed by a sorted map so that two matches of the same path compare and
/// print identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RouteParams {
    params: BTreeMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by name.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as `T`.
    ///
    /// Returns `None` if the parameter is missing or does not parse.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given name is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

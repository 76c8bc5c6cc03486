//! Match chain caching.
//!
//! [`MatchCache`] remembers, per pathname, which chain of route nodes the
//! path matched, so repeated visits skip the tree walk. It is gated behind
//! the `cache` feature flag and uses the [`lru`] crate internally.
//!
//! Chains are stored as sibling positions plus accumulated parameters
//! (see [`MatchStack::to_indices`](crate::MatchStack::to_indices)); the
//! route tree is immutable, so a cached chain never goes stale. Misses are
//! cached too, as `None`.
//!
//! # Examples
//!
//! ```
//! use console_navigator::cache::MatchCache;
//! use console_navigator::RouteParams;
//!
//! let mut cache = MatchCache::new(16);
//! cache.insert("/cluster/7".to_string(), Some(vec![(1, RouteParams::new())]));
//!
//! assert!(cache.get("/cluster/7").is_some());
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::{trace_log, RouteParams};
use lru::LruCache;
use std::num::NonZeroUsize;

/// A cached match: sibling positions below the root, or `None` for a path
/// that matched nothing.
pub type CachedChain = Option<Vec<(usize, RouteParams)>>;

/// Hit and miss counters.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from pathname to matched chain.
///
/// A capacity of zero disables caching: every lookup misses and nothing is
/// stored.
#[derive(Debug)]
pub struct MatchCache {
    entries: Option<LruCache<String, CachedChain>>,
    stats: CacheStats,
}

impl MatchCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
            stats: CacheStats::default(),
        }
    }

    /// Look up the cached chain for `path`. Updates hit/miss stats.
    pub fn get(&mut self, path: &str) -> Option<CachedChain> {
        match self.entries.as_mut().and_then(|entries| entries.get(path)) {
            Some(chain) => {
                self.stats.hits += 1;
                trace_log!("Match cache hit for path: '{}'", path);
                Some(chain.clone())
            }
            None => {
                self.stats.misses += 1;
                trace_log!("Match cache miss for path: '{}'", path);
                None
            }
        }
    }

    /// Remember the chain matched by `path`.
    pub fn insert(&mut self, path: String, chain: CachedChain) {
        if let Some(entries) = self.entries.as_mut() {
            entries.push(path, chain);
        }
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_miss_then_hit() {
        let mut cache = MatchCache::new(4);
        assert!(cache.get("/dashboard").is_none());
        assert_eq!(cache.stats().misses, 1);

        cache.insert("/dashboard".to_string(), Some(vec![(0, RouteParams::new())]));
        let cached = cache.get("/dashboard").unwrap();
        assert_eq!(cached.unwrap().len(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_not_found_is_cached() {
        let mut cache = MatchCache::new(4);
        cache.insert("/nowhere".to_string(), None);
        assert_eq!(cache.get("/nowhere"), Some(None));
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = MatchCache::new(2);
        cache.insert("/a".to_string(), None);
        cache.insert("/b".to_string(), None);
        cache.insert("/c".to_string(), None);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("/a").is_none());
    }

    #[test]
    fn test_zero_capacity_disables() {
        let mut cache = MatchCache::new(0);
        assert!(!cache.is_enabled());
        cache.insert("/a".to_string(), None);
        assert!(cache.is_empty());
        assert!(cache.get("/a").is_none());
    }

    #[test]
    fn test_hit_rate() {
        let mut cache = MatchCache::new(8);
        cache.get("/a");
        cache.get("/b");
        cache.get("/c");
        cache.insert("/a".to_string(), None);
        cache.insert("/b".to_string(), None);
        cache.get("/a");
        cache.get("/b");

        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 3);
        assert!((cache.stats().hit_rate() - 0.4).abs() < 0.001);
        assert_eq!(cache.len(), 2);
    }
}
